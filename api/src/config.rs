use thiserror::Error;

pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GENERATION_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingKey(&'static str),
}

/// Deployment configuration with enumerated required keys, resolved once at
/// startup. A missing key fails fast with the variable's name instead of
/// surfacing deep inside a request.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the identity provider; bearer assertions are exchanged at
    /// `{identity_provider_url}/auth/v1/user`.
    pub identity_provider_url: String,
    /// Anonymous API key forwarded alongside the caller's assertion.
    pub identity_anon_key: String,
    /// Postgres connection string for the spark store.
    pub database_url: String,
    /// API key for the generation provider.
    pub generation_api_key: String,
    /// Model id sent to the generation provider.
    pub generation_model: String,
    /// Generation provider base URL, overridable for local stubs.
    pub generation_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            identity_provider_url: require("IDENTITY_PROVIDER_URL")?,
            identity_anon_key: require("IDENTITY_ANON_KEY")?,
            database_url: require("DATABASE_URL")?,
            generation_api_key: require("GENERATION_API_KEY")?,
            generation_model: optional("GENERATION_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            generation_api_url: optional("GENERATION_API_URL")
                .unwrap_or_else(|| DEFAULT_GENERATION_API_URL.to_string()),
        })
    }
}

/// Blank values count as unset.
fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::MissingKey(key))
}
