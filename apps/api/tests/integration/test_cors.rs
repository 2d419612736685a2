use super::helpers::{
    ALLOWED_ORIGIN, expect_status, file_part, point_kml, read_json, send, spawn_app,
    upload_request,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;

#[tokio::test]
async fn preflight_from_allowed_origin_is_permissive() {
    let app = spawn_app();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-custom")
        .body(Body::empty())
        .expect("failed to build preflight");

    let res = send(&app.app, req).await;
    assert!(res.status().is_success(), "preflight status {}", res.status());

    let headers = res.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "content-type,x-custom"
    );
}

#[tokio::test]
async fn simple_request_from_allowed_origin_gets_cors_headers() {
    let app = spawn_app();
    let kml = point_kml("A", 10.0, 20.0);

    let res = send(
        &app.app,
        upload_request(&[file_part(kml.as_bytes())], Some(ALLOWED_ORIGIN)),
    )
    .await;
    let res = expect_status(res, StatusCode::OK).await;
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn other_origins_get_no_allow_origin_but_same_result() {
    let app = spawn_app();
    let kml = point_kml("A", 10.0, 20.0);

    let allowed = send(
        &app.app,
        upload_request(&[file_part(kml.as_bytes())], Some(ALLOWED_ORIGIN)),
    )
    .await;
    let allowed: Value = read_json(expect_status(allowed, StatusCode::OK).await).await;

    let foreign = send(
        &app.app,
        upload_request(&[file_part(kml.as_bytes())], Some("https://evil.example.com")),
    )
    .await;
    let foreign = expect_status(foreign, StatusCode::OK).await;
    assert!(
        !foreign
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
    let foreign: Value = read_json(foreign).await;

    assert_eq!(allowed, foreign);
}
