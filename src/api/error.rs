//! Error taxonomy surfaced to callers of the admin API client.

use serde_json::Value;
use thiserror::Error;

use crate::api::transport::TransportFailure;

/// Code reported for every transport-level failure.
pub const TRANSPORT_ERROR_CODE: i64 = 500;

/// Code reported when a request is refused before it is sent.
pub const INVALID_REQUEST_CODE: i64 = 400;

/// The admin API operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetProperty,
    SetProperty,
    TriggerEvent,
}

impl Operation {
    pub fn method(self) -> reqwest::Method {
        match self {
            Operation::GetProperty => reqwest::Method::GET,
            Operation::SetProperty => reqwest::Method::PUT,
            Operation::TriggerEvent => reqwest::Method::POST,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Operation::GetProperty => "getting property",
            Operation::SetProperty => "setting property",
            Operation::TriggerEvent => "triggering event",
        }
    }
}

/// Failure outcome of an admin API call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered with a nonzero envelope code.
    #[error("Admin API error {code}: {}", render(.result))]
    Application { code: i64, result: Value },

    /// The HTTP exchange itself failed.
    #[error("{message}")]
    Transport { message: String },

    /// The property name contains a `.` or `..` path segment.
    #[error("Invalid property name '{name}'")]
    InvalidPropertyName { name: String },
}

/// Strings print bare, anything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Result type for admin API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn transport(operation: Operation, failure: &TransportFailure) -> Self {
        ApiError::Transport {
            message: format!(
                "Unexpected error {}: {}",
                operation.describe(),
                failure.status_text()
            ),
        }
    }

    /// Numeric code: the envelope code, or 500 for transport failures.
    pub fn code(&self) -> i64 {
        match self {
            ApiError::Application { code, .. } => *code,
            ApiError::Transport { .. } => TRANSPORT_ERROR_CODE,
            ApiError::InvalidPropertyName { .. } => INVALID_REQUEST_CODE,
        }
    }

    /// Detail payload: the envelope result, or the synthesized message.
    pub fn detail(&self) -> Value {
        match self {
            ApiError::Application { result, .. } => result.clone(),
            ApiError::Transport { message } => Value::String(message.clone()),
            ApiError::InvalidPropertyName { .. } => Value::String(self.to_string()),
        }
    }

    /// [`detail`](Self::detail) as display text, with strings unquoted.
    pub fn detail_text(&self) -> String {
        render(&self.detail())
    }
}
