use crate::config::{AllowList, CorsConfig};
use anyhow::Context;
use http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

/// Build the CORS layer from configuration.
///
/// `*` cannot be combined with credentials, so a wildcard turns into mirroring
/// the request's origin, method or headers when credentials are allowed.
///
/// # Errors
///
/// Returns an error if an origin, method or header name is not valid.
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let credentials = config.allow_credentials;

    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        if credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    let methods = match &config.allowed_methods {
        AllowList::Any if credentials => AllowMethods::mirror_request(),
        AllowList::Any => AllowMethods::any(),
        AllowList::List(items) => AllowMethods::list(
            items
                .iter()
                .map(|m| {
                    Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                        .with_context(|| format!("Invalid CORS method: {}", m))
                })
                .collect::<anyhow::Result<Vec<_>>>()?,
        ),
    };

    let headers = match &config.allowed_headers {
        AllowList::Any if credentials => AllowHeaders::mirror_request(),
        AllowList::Any => AllowHeaders::any(),
        AllowList::List(items) => AllowHeaders::list(
            items
                .iter()
                .map(|h| {
                    HeaderName::from_bytes(h.as_bytes())
                        .with_context(|| format!("Invalid CORS header: {}", h))
                })
                .collect::<anyhow::Result<Vec<_>>>()?,
        ),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
        .max_age(PREFLIGHT_MAX_AGE))
}
