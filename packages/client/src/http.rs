//! HTTP dispatch with a bounded wait and uniform error mapping.
//!
//! Every call runs under its own [`tokio::time::timeout`]. When the window
//! elapses the in-flight request future is dropped, which aborts the
//! connection and releases the timer; a late response is never read. The
//! timer is likewise released when the call completes normally.

use std::time::Instant;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::url::join_url;
use crate::{ApiError, ClientConfig};

/// Error body shapes the backend uses: `{"error": ...}` from the parking
/// and insight views, `{"detail": ...}` from framework-level rejections.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    detail: Option<String>,
}

/// Sends requests to the configured backend.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    config: ClientConfig,
}

impl Dispatcher {
    /// Creates a dispatcher for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `config` is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    /// The configuration requests are sent with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `method path` with an optional JSON body and decodes a 2xx
    /// response as `T`.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] if the connection fails.
    /// * [`ApiError::Timeout`] if no full response arrives in time.
    /// * [`ApiError::Http`] for a non-2xx status.
    /// * [`ApiError::Parse`] if a 2xx body does not decode as `T`.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let bytes = self.send(method, path, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET path`, decoding the response as `T`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    /// `POST path` with a JSON body, decoding the response as `T`.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = join_url(self.config.base_url(), path);
        let timeout = self.config.timeout();

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        log::debug!("{method} {url}");
        let started = Instant::now();

        match tokio::time::timeout(timeout, execute(builder)).await {
            Ok(Ok(bytes)) => {
                log::debug!(
                    "{method} {url} completed in {}ms ({} bytes)",
                    started.elapsed().as_millis(),
                    bytes.len()
                );
                Ok(bytes)
            }
            Ok(Err(ApiError::Network(e))) if e.is_timeout() => {
                log::warn!("{method} {url} timed out in transport: {e}");
                Err(ApiError::Timeout { timeout })
            }
            Ok(Err(e)) => {
                log::warn!("{method} {url} failed: {e}");
                Err(e)
            }
            Err(_) => {
                log::warn!("{method} {url} timed out after {}ms", timeout.as_millis());
                Err(ApiError::Timeout { timeout })
            }
        }
    }
}

async fn execute(builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
    let resp = builder.send().await?;
    let status = resp.status();

    if !status.is_success() {
        // An unreadable error body still yields the status.
        let body = resp.bytes().await.unwrap_or_default();
        return Err(ApiError::Http {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    Ok(resp.bytes().await?.to_vec())
}

/// Picks the human-readable message out of an error body, falling back to
/// the status line when the body is not a recognised JSON shape.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message).or(b.detail))
        .unwrap_or_else(|| format!("HTTP {status}"))
}
