//! Client configuration: backend base URL and request timeout.
//!
//! Values come from code, the environment, or a TOML file:
//!
//! ```toml
//! base_url = "https://api-tp41.xyz"
//! timeout_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ApiError;

/// Backend used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api-tp41.xyz";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "PARKING_API_BASE_URL";

/// Environment variable holding the timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "PARKING_API_TIMEOUT_SECS";

/// Immutable client configuration.
///
/// The base URL is stored without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Creates a configuration. Trailing slashes on `base_url` are removed.
    ///
    /// Values are not checked here; [`Self::validate`] runs when a client
    /// is built from the configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Returns a copy with a different base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `base_url` is not an absolute URL.
    pub fn with_base_url(self, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let config = Self::new(base_url, self.timeout);
        config.validate()?;
        Ok(config)
    }

    /// Returns a copy with a different timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `timeout` is zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ApiError> {
        self.timeout = timeout;
        self.validate()?;
        Ok(self)
    }

    /// Checks that the base URL is absolute and the timeout is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ApiError> {
        reqwest::Url::parse(&self.base_url).map_err(|e| ApiError::Config {
            message: format!("Invalid base URL {:?}: {e}", self.base_url),
        })?;
        if self.timeout.is_zero() {
            return Err(ApiError::Config {
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Reads [`BASE_URL_ENV`] and [`TIMEOUT_ENV`], falling back to the
    /// defaults for unset or empty variables.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if either variable holds an invalid
    /// value.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = non_empty(TIMEOUT_ENV)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| ApiError::Config {
                    message: format!("{TIMEOUT_ENV}={raw:?} is not a whole number of seconds: {e}"),
                })
            })
            .transpose()?;

        Self::from_parts(non_empty(BASE_URL_ENV), timeout_secs)
    }

    /// Parses a TOML configuration. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the TOML is malformed or holds an
    /// invalid value.
    pub fn from_toml_str(source: &str) -> Result<Self, ApiError> {
        let file: ConfigFile = toml::de::from_str(source).map_err(|e| ApiError::Config {
            message: format!("Invalid client config: {e}"),
        })?;
        Self::from_parts(file.base_url, file.timeout_secs)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ApiError> {
        let source = std::fs::read_to_string(path).map_err(|e| ApiError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&source)
    }

    fn from_parts(base_url: Option<String>, timeout_secs: Option<u64>) -> Result<Self, ApiError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match timeout_secs {
            Some(0) => {
                return Err(ApiError::Config {
                    message: "timeout must be at least one second".to_string(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let config = Self::new(base_url, timeout);
        config.validate()?;
        Ok(config)
    }
}
