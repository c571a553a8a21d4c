use thiserror::Error;
use url::Url;

use crate::config_env::{optional_trimmed_env, parse_u64_env, require_env};

const DEFAULT_QUERY_DATABASE: &str = "sampledb";
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct QueryServiceConfig {
    pub endpoint_url: String,
    pub database: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build query service http client: {0}")]
    HttpClient(String),
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

impl QueryServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint_url = validate_endpoint_url(&require_env("QUERY_SERVICE_URL")?)?;

        Ok(Self {
            endpoint_url,
            database: optional_trimmed_env("QUERY_DATABASE")
                .unwrap_or_else(|| DEFAULT_QUERY_DATABASE.to_string()),
            api_key: optional_trimmed_env("QUERY_SERVICE_API_KEY"),
            timeout_ms: parse_u64_env("QUERY_SERVICE_TIMEOUT_MS", DEFAULT_QUERY_TIMEOUT_MS)?,
        })
    }
}

/// Loads `.env` when present; a missing file is not an error.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}

pub(crate) fn validate_endpoint_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|err| {
        ConfigError::InvalidConfiguration(format!("QUERY_SERVICE_URL is not a valid URL: {err}"))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidConfiguration(
            "QUERY_SERVICE_URL must start with http:// or https://".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}
