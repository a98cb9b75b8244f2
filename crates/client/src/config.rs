//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `OMNIORDER_API_URL` - Backend base URL (default: `/v1`, resolved against the origin)
//! - `OMNIORDER_ORIGIN` - Origin used to resolve a relative base URL (default: `http://127.0.0.1:8000`)
//! - `OMNIORDER_TOKEN_PATH` - File holding the persisted access token
//!   (default: `<data dir>/omniorder/token`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::token::TOKEN_STORAGE_KEY;

/// Base URL used when `OMNIORDER_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "/v1";

/// Origin a relative base URL is resolved against.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

/// Directory name under the platform data directory.
const APP_DIR: &str = "omniorder";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory available; set OMNIORDER_TOKEN_PATH")]
    NoDataDir,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Absolute backend base URL; endpoint paths are appended to it.
    pub api_base_url: Url,
    /// Where the access token is persisted between runs.
    pub token_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable holds an unusable value or no token
    /// location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("OMNIORDER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let origin = lookup("OMNIORDER_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_owned());
        let api_base_url = resolve_base_url(&api_url, &origin)?;

        let token_path = match lookup("OMNIORDER_TOKEN_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_token_path().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            api_base_url,
            token_path,
        })
    }
}

/// Default token file: `<data dir>/omniorder/token`.
#[must_use]
pub fn default_token_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(TOKEN_STORAGE_KEY))
}

/// Resolve the configured base URL, treating non-absolute values as paths on `origin`.
fn resolve_base_url(api_url: &str, origin: &str) -> Result<Url, ConfigError> {
    if let Ok(url) = Url::parse(api_url) {
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "OMNIORDER_API_URL".to_string(),
                format!("expected an http(s) URL or a path, got {api_url}"),
            ));
        }
        return Ok(url);
    }

    let origin = Url::parse(origin).map_err(|e| {
        ConfigError::InvalidEnvVar("OMNIORDER_ORIGIN".to_string(), e.to_string())
    })?;
    if !matches!(origin.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "OMNIORDER_ORIGIN".to_string(),
            format!("expected an http(s) origin, got {origin}"),
        ));
    }

    origin
        .join(api_url)
        .map_err(|e| ConfigError::InvalidEnvVar("OMNIORDER_API_URL".to_string(), e.to_string()))
}
