use crate::{
    application::convert_kml::dto::ConvertKmlRequest,
    domain::conversion::document::GeoJsonDocument,
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Multipart, State},
};

/// Multipart field carrying the KML upload.
pub const FILE_FIELD: &str = "file";

/// `POST /` — convert one uploaded KML file to a GeoJSON FeatureCollection.
///
/// Fields other than `file` are ignored.
pub async fn convert_kml(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GeoJsonDocument>, AppError> {
    let mut upload: Option<ConvertKmlRequest> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::MalformedInput(
                "Only one file may be uploaded per request".into(),
            ));
        }

        let filename = field.file_name().map(str::to_owned);
        let content = field.bytes().await?;
        upload = Some(ConvertKmlRequest { filename, content });
    }

    let request = upload.ok_or_else(|| AppError::MalformedInput("Missing file".into()))?;
    let document = state.convert_kml.execute(request).await?;
    Ok(Json(document))
}
