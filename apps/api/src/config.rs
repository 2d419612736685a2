//! Application configuration loading from environment variables.
//!
//! All configuration is loaded from the environment at startup. A `.env` file is
//! honoured through `dotenvy` before this module is consulted.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: "info,kml_api=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "127.0.0.1")
//! - `PORT`: Server port (default: 8000)
//! - `CORS_ALLOWED_ORIGINS`: Comma separated origins (default: "http://127.0.0.1:4200")
//! - `CORS_ALLOW_CREDENTIALS`: Let cookies and auth headers through (default: true)
//! - `CORS_ALLOWED_METHODS`: `*` or comma separated methods (default: "*")
//! - `CORS_ALLOWED_HEADERS`: `*` or comma separated header names (default: "*")
//! - `WORK_DIR`: Scratch directory handed to the converter (default: ".")
//! - `WRITE_ARTIFACTS`: Write each converted collection into `WORK_DIR` (default: false)
//! - `MAX_UPLOAD_BYTES`: Request body limit (default: 20 MiB)

use serde::Deserialize;
use std::{convert::Infallible, path::PathBuf, str::FromStr};

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Cross-origin policy applied to every route
    pub cors: CorsConfig,

    /// Directory the converter may use for transient files
    pub work_dir: PathBuf,

    /// Persist every converted collection as `<uuid>.geojson` inside `work_dir`
    pub write_artifacts: bool,

    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
}

/// Cross-origin resource sharing policy.
///
/// Browsers enforce it; the server only advertises it. Functional behaviour of
/// the endpoint does not depend on the request origin.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser. `*` allows any origin.
    pub allowed_origins: Vec<String>,

    /// Whether credentials (cookies, authorization headers) may be sent
    pub allow_credentials: bool,

    /// Methods advertised in preflight responses
    pub allowed_methods: AllowList,

    /// Request headers advertised in preflight responses
    pub allowed_headers: AllowList,
}

/// Either a wildcard or an explicit list of values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum AllowList {
    Any,
    List(Vec<String>),
}

impl FromStr for AllowList {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let items = split_list(s);
        if items.iter().any(|item| item == "*") {
            Ok(Self::Any)
        } else {
            Ok(Self::List(items))
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://127.0.0.1:4200".to_string()],
            allow_credentials: true,
            allowed_methods: AllowList::Any,
            allowed_headers: AllowList::Any,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors: CorsConfig::default(),
            work_dir: PathBuf::from("."),
            write_artifacts: false,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed to the
    /// expected type. Unset variables fall back to [`Config::default`].
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let cors = CorsConfig {
            allowed_origins: match std::env::var("CORS_ALLOWED_ORIGINS") {
                Ok(raw) => split_list(&raw),
                Err(_) => defaults.cors.allowed_origins,
            },
            allow_credentials: env_or("CORS_ALLOW_CREDENTIALS", defaults.cors.allow_credentials)?,
            allowed_methods: env_or("CORS_ALLOWED_METHODS", defaults.cors.allowed_methods)?,
            allowed_headers: env_or("CORS_ALLOWED_HEADERS", defaults.cors.allowed_headers)?,
        };

        Ok(Self {
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            cors,
            work_dir: env_or("WORK_DIR", defaults.work_dir)?,
            write_artifacts: env_or("WRITE_ARTIFACTS", defaults.write_artifacts)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
