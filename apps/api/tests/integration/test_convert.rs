use super::helpers::{
    Part, expect_status, file_part, flight_kml, point_kml, read_json, send, spawn_app,
    spawn_app_with, upload_request,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use geojson::FeatureCollection;
use kml_api::domain::conversion::{
    converter::Converter, document::GeoJsonDocument, errors::ConversionError,
};
use serde_json::{Value, json};
use std::{io::Read, path::Path, sync::Arc};

#[tokio::test]
async fn single_point_placemark_round_trips() {
    let app = spawn_app();
    let kml = point_kml("A", 10.0, 20.0);

    let res = send(&app.app, upload_request(&[file_part(kml.as_bytes())], None)).await;
    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;

    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().expect("features array");
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[0]["geometry"]["coordinates"], json!([10.0, 20.0]));
    assert_eq!(features[0]["properties"]["name"], "A");
}

#[tokio::test]
async fn track_placemark_exposes_coordinates_and_times() {
    let app = spawn_app();

    let res = send(
        &app.app,
        upload_request(&[file_part(flight_kml().as_bytes())], None),
    )
    .await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;

    assert_eq!(body["name"], "Flight log");
    let features = body["features"].as_array().expect("features array");
    assert_eq!(features.len(), 2);

    let track = &features[0];
    assert_eq!(track["geometry"]["type"], "LineString");
    assert_eq!(track["geometry"]["coordinates"][0], json!([30.51, 50.45, 180.0]));
    assert_eq!(
        track["properties"]["times"].as_array().map(Vec::len),
        Some(3)
    );
    assert_eq!(features[1]["geometry"]["type"], "Polygon");
}

#[tokio::test]
async fn latin1_upload_is_decoded() {
    let app = spawn_app();
    let kml: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
        <kml><Placemark><name>M\xFCnchen</name>\
        <Point><coordinates>11.58,48.14</coordinates></Point></Placemark></kml>";

    let res = send(&app.app, upload_request(&[file_part(kml)], None)).await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;

    assert_eq!(body["features"][0]["properties"]["name"], "M\u{fc}nchen");
}

#[tokio::test]
async fn extra_form_fields_are_ignored() {
    let app = spawn_app();
    let kml = point_kml("B", 1.0, 2.0);

    let parts = [
        file_part(kml.as_bytes()),
        Part {
            name: "body",
            filename: None,
            content: b"",
        },
    ];
    let res = send(&app.app, upload_request(&parts, None)).await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body["features"][0]["properties"]["name"], "B");
}

#[tokio::test]
async fn request_without_file_part_is_client_error() {
    let app = spawn_app();
    let parts = [Part {
        name: "body",
        filename: None,
        content: b"nothing here",
    }];

    let res = send(&app.app, upload_request(&parts, None)).await;
    let res = expect_status(res, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["kind"], "malformed_input");
    assert_eq!(body["error"], "Missing file");
}

#[tokio::test]
async fn non_multipart_body_is_client_error() {
    let app = spawn_app();
    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .expect("failed to build request");

    let res = send(&app.app, req).await;
    assert!(res.status().is_client_error(), "got {}", res.status());
}

#[tokio::test]
async fn two_file_parts_are_rejected() {
    let app = spawn_app();
    let kml = point_kml("A", 10.0, 20.0);

    let parts = [file_part(kml.as_bytes()), file_part(kml.as_bytes())];
    let res = send(&app.app, upload_request(&parts, None)).await;
    expect_status(res, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn arbitrary_text_is_server_error() {
    let app = spawn_app();

    let res = send(
        &app.app,
        upload_request(&[file_part(b"definitely not a kml file")], None),
    )
    .await;
    let res = expect_status(res, StatusCode::INTERNAL_SERVER_ERROR).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["kind"], "conversion_failed");
}

#[tokio::test]
async fn empty_file_is_server_error() {
    let app = spawn_app();
    let res = send(&app.app, upload_request(&[file_part(b"")], None)).await;
    let res = expect_status(res, StatusCode::INTERNAL_SERVER_ERROR).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Uploaded file is empty");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = spawn_app();
    let huge = vec![b' '; 128 * 1024];

    let res = send(&app.app, upload_request(&[file_part(&huge)], None)).await;
    expect_status(res, StatusCode::PAYLOAD_TOO_LARGE).await;
}

#[tokio::test]
async fn no_artifacts_are_left_by_default() {
    let app = spawn_app();
    let kml = point_kml("A", 10.0, 20.0);

    let res = send(&app.app, upload_request(&[file_part(kml.as_bytes())], None)).await;
    expect_status(res, StatusCode::OK).await;

    let entries = std::fs::read_dir(app.work_dir.path())
        .expect("work dir readable")
        .count();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn concurrent_requests_receive_their_own_results() {
    let app = spawn_app();

    let requests = (0..8).map(|i| {
        let app = app.app.clone();
        let name = format!("P{}", i);
        let kml = point_kml(&name, i as f64, -(i as f64));
        async move {
            let res = send(&app, upload_request(&[file_part(kml.as_bytes())], None)).await;
            let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
            (name, i, body)
        }
    });

    let handles: Vec<_> = requests.map(tokio::spawn).collect();
    for handle in handles {
        let (name, i, body) = handle.await.expect("task panicked");
        let feature = &body["features"][0];
        assert_eq!(feature["properties"]["name"], name.as_str());
        assert_eq!(
            feature["geometry"]["coordinates"],
            json!([i as f64, -(i as f64)])
        );
    }
}

/// Converter double that answers with a fixed feature count and never parses.
struct StubConverter;

impl Converter for StubConverter {
    fn convert(
        &self,
        source: &mut dyn Read,
        _work_dir: &Path,
    ) -> Result<GeoJsonDocument, ConversionError> {
        let mut buf = String::new();
        source.read_to_string(&mut buf).map_err(ConversionError::Read)?;
        if buf == "fail" {
            return Err(ConversionError::InvalidCoordinates("stubbed".into()));
        }
        Ok(GeoJsonDocument::new(FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        }))
    }
}

#[tokio::test]
async fn handler_returns_converter_output_unchanged() {
    let app = spawn_app_with(Arc::new(StubConverter));

    let res = send(&app.app, upload_request(&[file_part(b"anything")], None)).await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body, json!({ "type": "FeatureCollection", "features": [] }));
}

#[tokio::test]
async fn handler_maps_converter_failure_to_server_error() {
    let app = spawn_app_with(Arc::new(StubConverter));

    let res = send(&app.app, upload_request(&[file_part(b"fail")], None)).await;
    let res = expect_status(res, StatusCode::INTERNAL_SERVER_ERROR).await;
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Invalid coordinates: stubbed");
    assert_eq!(body["kind"], "conversion_failed");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = spawn_app();
    let kml = point_kml("A", 10.0, 20.0);

    let res = send(&app.app, upload_request(&[file_part(kml.as_bytes())], None)).await;
    let headers = res.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
}
