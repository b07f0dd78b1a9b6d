//! HTTP client for the encryption service
//!
//! The service exposes four endpoints (see [`paths`]). Failures are split into
//! two kinds:
//! - **Service**: the server answered with a non-2xx status, optionally with a
//!   `{ "detail": "..." }` body
//! - **Transport**: the request never produced a usable answer (connection
//!   refused, timeout, malformed JSON)
//!
//! Controllers depend on the [`CryptoService`] trait rather than on reqwest so
//! they can be driven by an in-memory double in tests.

pub mod models;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

use models::ErrorBody;

/// Endpoint paths relative to the configured base URL
pub mod paths {
    pub const ROOT: &str = "/";
    pub const GENERATE_KEY: &str = "/generate-key";
    pub const ENCRYPT: &str = "/encrypt";
    pub const DECRYPT: &str = "/decrypt";
}

/// Errors returned by the service client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx response
    Service { status: u16, detail: Option<String> },
    /// Network failure, timeout or undecodable body
    Transport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service {
                detail: Some(detail),
                ..
            } => write!(f, "{}", detail),
            Self::Service {
                status,
                detail: None,
            } => write!(f, "HTTP error, status {}", status),
            Self::Transport(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// The remote encryption service as seen by the controllers
pub trait CryptoService: Send + Sync + 'static {
    /// POST a JSON body and decode the JSON answer
    fn post<B, R>(
        &self,
        path: &'static str,
        body: &B,
    ) -> impl Future<Output = Result<R, ApiError>> + Send
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send;

    /// Lightweight reachability check against the service root
    fn probe(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// reqwest-backed implementation of [`CryptoService`]
#[derive(Debug, Clone)]
pub struct HttpService {
    client: reqwest::Client,
    base_url: String,
    probe_timeout: Duration,
}

impl HttpService {
    /// Build a client for `base_url`
    ///
    /// `request_timeout` of `None` means requests may wait forever; the
    /// loading indicator then stays up until the server answers.
    pub fn new(
        base_url: &str,
        request_timeout: Option<Duration>,
        probe_timeout: Duration,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        tracing::info!(
            "Service client ready: {} (request timeout: {:?})",
            base_url,
            request_timeout
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            probe_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl CryptoService for HttpService {
    async fn post<B, R>(&self, path: &'static str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Body may be missing, non-JSON or carry a non-string or blank detail
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.detail)
                .filter(|d| !d.trim().is_empty());
            tracing::debug!("POST {} failed with {} (detail: {:?})", url, status, detail);
            return Err(ApiError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    async fn probe(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.url(paths::ROOT))
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Service {
                status: status.as_u16(),
                detail: None,
            })
        }
    }
}
