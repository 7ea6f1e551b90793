#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typed HTTP client for the parking finder backend.
//!
//! The client is a stateless request/response translator:
//!
//! 1. **Request builders** ([`payload`]) turn a [`LocationQuery`] into a
//!    JSON body, dropping `max_walk_time` when it matches the server
//!    default.
//! 2. **The dispatcher** ([`http`]) joins paths onto the configured base
//!    URL, bounds every call with a timeout, and folds failures into
//!    [`ApiError`].
//! 3. **Endpoint wrappers** ([`parking`], [`insights`]) decode responses
//!    into the model types, exposing both list-only and envelope forms for
//!    the nearby endpoints.
//!
//! There is no global state. Build a [`ClientConfig`] (from defaults, the
//! environment, or a TOML file) and hand it to [`ParkingClient::new`].

pub mod config;
pub mod http;
pub mod insights;
pub mod parking;
pub mod payload;
pub mod url;

#[cfg(test)]
mod test_server;

use std::time::Duration;

use thiserror::Error;

pub use config::ClientConfig;
pub use http::Dispatcher;
pub use parking_finder_insights_models as insights_models;
pub use parking_finder_parking_models as parking_models;
pub use parking_finder_parking_models::LocationQuery;
pub use reqwest::Method;

/// Errors from parking API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or its body could not be read
    /// (connection refused, DNS failure, reset).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No response arrived within the configured window.
    #[error("Request timed out after {}ms", timeout.as_millis())]
    Timeout {
        /// The window that elapsed.
        timeout: Duration,
    },

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// Response status code.
        status: u16,
        /// Message from the error body, or the status line.
        message: String,
    },

    /// A 2xx response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}

/// Client for every parking and insight endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ParkingClient {
    http: Dispatcher,
}

impl ParkingClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `config` is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: Dispatcher::new(config)?,
        })
    }

    /// Creates a client configured from `PARKING_API_BASE_URL` and
    /// `PARKING_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the environment holds an invalid
    /// value.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// The underlying dispatcher, for endpoints without a typed wrapper.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.http
    }

    /// Fetches any path as untyped JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.http.get(path).await
    }
}
