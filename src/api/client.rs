//! Admin API client: property reads, property writes, and events.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use url::Url;

use crate::api::error::{ApiError, ApiResult, Operation};
use crate::api::request::{build_api_url, ApiRequest, QueryParams, RequestBody, ValueEncoding};
use crate::api::transport::{HttpTransport, Transport, TransportFailure};
use crate::config::ClientConfig;

/// Errors building an [`AdminClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("base URL '{0}' cannot carry a path")]
    CannotBeABase(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the admin API, generic over its transport.
pub struct AdminClient<T = HttpTransport> {
    transport: Arc<T>,
    base_url: Url,
}

impl<T> Clone for AdminClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url: self.base_url.clone(),
        }
    }
}

impl AdminClient<HttpTransport> {
    /// Build a client over HTTP using the base URL, timeouts and credentials in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientBuildError> {
        let transport = HttpTransport::new(&config.timeouts, config.auth.clone())?;
        Self::with_transport(&config.base_url, transport)
    }
}

impl<T: Transport> AdminClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::CannotBeABase(base_url.to_string()));
        }

        Ok(Self {
            transport: Arc::new(transport),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Read a property (`GET api/<name>`).
    pub async fn get_property(&self, property_name: &str) -> ApiResult<Value> {
        self.execute(Operation::GetProperty, property_name, None).await
    }

    /// Write a property (`PUT api/<name>`), raw or wrapped as `{"value": ...}`.
    pub async fn set_property(
        &self,
        property_name: &str,
        property_value: &str,
        encoding: ValueEncoding,
    ) -> ApiResult<Value> {
        let body = RequestBody::encode(property_value, encoding);
        self.execute(Operation::SetProperty, property_name, Some(body))
            .await
    }

    /// Trigger an event (`POST api/<name>`); the body is always wrapped.
    pub async fn trigger_event(&self, property_name: &str, event_type: &str) -> ApiResult<Value> {
        let body = RequestBody::wrapped(event_type);
        self.execute(Operation::TriggerEvent, property_name, Some(body))
            .await
    }

    /// Spawn [`get_property`](Self::get_property) and hand its outcome to `callback` once.
    ///
    /// Outside a Tokio runtime nothing is sent: `callback` runs immediately with a
    /// transport error and `None` is returned.
    pub fn get_property_with<F>(
        &self,
        property_name: impl Into<String>,
        callback: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(ApiResult<Value>) + Send + 'static,
    {
        let client = self.clone();
        let property_name = property_name.into();
        spawn_with(
            Operation::GetProperty,
            async move { client.get_property(&property_name).await },
            callback,
        )
    }

    /// Spawn [`set_property`](Self::set_property) and hand its outcome to `callback` once.
    ///
    /// Runtime handling as in [`get_property_with`](Self::get_property_with).
    pub fn set_property_with<F>(
        &self,
        property_name: impl Into<String>,
        property_value: impl Into<String>,
        encoding: ValueEncoding,
        callback: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(ApiResult<Value>) + Send + 'static,
    {
        let client = self.clone();
        let property_name = property_name.into();
        let property_value = property_value.into();
        spawn_with(
            Operation::SetProperty,
            async move {
                client
                    .set_property(&property_name, &property_value, encoding)
                    .await
            },
            callback,
        )
    }

    /// Spawn [`trigger_event`](Self::trigger_event) and hand its outcome to `callback` once.
    ///
    /// Runtime handling as in [`get_property_with`](Self::get_property_with).
    pub fn trigger_event_with<F>(
        &self,
        property_name: impl Into<String>,
        event_type: impl Into<String>,
        callback: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(ApiResult<Value>) + Send + 'static,
    {
        let client = self.clone();
        let property_name = property_name.into();
        let event_type = event_type.into();
        spawn_with(
            Operation::TriggerEvent,
            async move { client.trigger_event(&property_name, &event_type).await },
            callback,
        )
    }

    async fn execute(
        &self,
        operation: Operation,
        property_name: &str,
        body: Option<RequestBody>,
    ) -> ApiResult<Value> {
        let url = build_api_url(&self.base_url, property_name, &QueryParams::new())
            .inspect_err(|e| tracing::warn!(error = %e, "Refusing admin API request"))?;
        let request = ApiRequest {
            method: operation.method(),
            url,
            body,
        };

        tracing::debug!(method = %request.method, url = %request.url, "Sending admin API request");

        match self.transport.send(request).await {
            Ok(envelope) if envelope.is_success() => {
                tracing::debug!(property = property_name, "Admin API request succeeded");
                Ok(envelope.result)
            }
            Ok(envelope) => {
                tracing::debug!(
                    property = property_name,
                    code = envelope.code,
                    "Admin API returned application error"
                );
                Err(ApiError::Application {
                    code: envelope.code,
                    result: envelope.result,
                })
            }
            Err(failure) => {
                tracing::warn!(property = property_name, error = %failure, "Admin API request failed");
                Err(ApiError::transport(operation, &failure))
            }
        }
    }
}

fn spawn_with<Fut, F>(operation: Operation, request: Fut, callback: F) -> Option<JoinHandle<()>>
where
    Fut: Future<Output = ApiResult<Value>> + Send + 'static,
    F: FnOnce(ApiResult<Value>) + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => Some(handle.spawn(async move { callback(request.await) })),
        Err(_) => {
            tracing::warn!(?operation, "No Tokio runtime, admin API request not sent");
            callback(Err(ApiError::transport(operation, &TransportFailure::NoRuntime)));
            None
        }
    }
}
