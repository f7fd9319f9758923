//! HTTP transport seam.
//!
//! # Responsibilities
//! - Execute one [`ApiRequest`] and decode the JSON [`Envelope`]
//! - Classify failures (timeout, HTTP status, connection, decode)
//! - Apply connect/request timeouts and Basic credentials from config

use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::api::envelope::Envelope;
use crate::api::request::ApiRequest;
use crate::config::{AuthConfig, TimeoutConfig};

/// Why an HTTP exchange produced no usable envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("no Tokio runtime available")]
    NoRuntime,
}

impl TransportFailure {
    /// XHR-style status text: "timeout", "parsererror" or "error".
    pub fn status_text(&self) -> &'static str {
        match self {
            TransportFailure::Timeout => "timeout",
            TransportFailure::Decode(_) => "parsererror",
            TransportFailure::Status(_)
            | TransportFailure::Connect(_)
            | TransportFailure::NoRuntime => "error",
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportFailure::Timeout
        } else if e.is_decode() {
            TransportFailure::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            TransportFailure::Status(status.as_u16())
        } else {
            TransportFailure::Connect(e.to_string())
        }
    }
}

/// Sends admin API requests. Implementations must be shareable across tasks.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Envelope, TransportFailure>> + Send;
}

/// Production transport over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    auth: Option<AuthConfig>,
}

impl HttpTransport {
    pub fn new(timeouts: &TimeoutConfig, auth: Option<AuthConfig>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()?;

        Ok(Self { client, auth })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Envelope, TransportFailure> {
        let mut builder = self.client.request(request.method, request.url);

        if let Some(auth) = &self.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, body.content_type)
                .body(body.content);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<Envelope>(&bytes)
            .map_err(|e| TransportFailure::Decode(e.to_string()))
    }
}
