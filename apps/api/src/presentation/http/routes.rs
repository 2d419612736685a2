use super::{
    cors::cors_layer,
    handlers::convert,
    middleware::{logging::logging_middleware, request_id::request_id_middleware},
    state::AppState,
};
use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};
use http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(convert::convert_kml))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Router plus the cross-cutting layers: body limit, CORS and security headers.
///
/// # Errors
///
/// Returns an error if the CORS configuration contains invalid values.
pub fn create_app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors)?;
    let body_limit = state.config.max_upload_bytes;

    Ok(create_router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        )))
}
