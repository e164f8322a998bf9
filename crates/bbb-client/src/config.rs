//! Connection configuration.
//!
//! A [`ConnectionConfig`] is normalized and validated once at construction and
//! is immutable afterward. It can be built directly or loaded from environment
//! variables. The shared secret is redacted in Debug output.

use crate::checksum::HashAlgorithm;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Path segment every API base URL ends with.
pub const API_PATH_SEGMENT: &str = "api/";

/// Default HTTP request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default hash algorithm name.
pub const DEFAULT_HASH_ALGORITHM: &str = "SHA256";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL '{0}': it should look like https://example.com/api/")]
    InvalidBaseUrl(String),

    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid HTTP timeout configuration: {0}")]
    InvalidHttpTimeout(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Normalize an API base URL.
///
/// The scheme must be `http://` or `https://`. A trailing `/` is added if
/// missing, then `api/` unless the URL already ends with it. Normalizing an
/// already-normalized URL returns it unchanged.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` for any other scheme.
pub fn normalize(base_url: &str) -> Result<String, ConfigError> {
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
    }

    let mut normalized = base_url.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    if !normalized.ends_with(API_PATH_SEGMENT) {
        normalized.push_str(API_PATH_SEGMENT);
    }

    Ok(normalized)
}

/// Connection settings for a BigBlueButton server.
#[derive(Clone)]
pub struct ConnectionConfig {
    base_url: String,
    secret: SecretString,
    hash_algorithm: HashAlgorithm,
    http_timeout: Duration,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("secret", &"[REDACTED]")
            .field("hash_algorithm", &self.hash_algorithm)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a configuration with the default HTTP timeout.
    ///
    /// `hash_algorithm` is resolved with [`HashAlgorithm::from_name`], so an
    /// unrecognized name silently selects SHA256.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL is not http(s).
    pub fn new(
        base_url: &str,
        secret: SecretString,
        hash_algorithm: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize(base_url)?,
            secret,
            hash_algorithm: HashAlgorithm::from_name(hash_algorithm),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        })
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// See [`ConnectionConfig::from_vars`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// Reads `BBB_API_URL` and `BBB_SECRET` (required), `BBB_HASH_ALGORITHM`
    /// and `BBB_HTTP_TIMEOUT_SECONDS` (optional).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when a required variable is unset,
    /// `ConfigError::InvalidHttpTimeout` for a timeout that is not a positive
    /// integer and `ConfigError::InvalidBaseUrl` for a non-http(s) URL.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let base_url = vars
            .get("BBB_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("BBB_API_URL".to_string()))?;

        let secret = vars
            .get("BBB_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("BBB_SECRET".to_string()))?;

        let hash_algorithm = vars
            .get("BBB_HASH_ALGORITHM")
            .map_or(DEFAULT_HASH_ALGORITHM, String::as_str);

        let http_timeout = if let Some(value_str) = vars.get("BBB_HTTP_TIMEOUT_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidHttpTimeout(format!(
                    "BBB_HTTP_TIMEOUT_SECONDS must be a valid positive integer, got '{value_str}': {e}"
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidHttpTimeout(
                    "BBB_HTTP_TIMEOUT_SECONDS must be greater than 0".to_string(),
                ));
            }

            Duration::from_secs(value)
        } else {
            DEFAULT_HTTP_TIMEOUT
        };

        Ok(Self::new(base_url, SecretString::from(secret.clone()), hash_algorithm)?
            .with_http_timeout(http_timeout))
    }

    /// Normalized base URL, always ending in `api/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared secret used for checksums.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Effective hash algorithm after fallback.
    #[must_use]
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    /// HTTP request timeout.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}
