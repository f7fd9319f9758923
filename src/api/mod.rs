//! Admin API client.
//!
//! # Data Flow
//! ```text
//! get_property / set_property / trigger_event
//!     → request.rs (URL + body construction)
//!     → transport.rs (HTTP exchange, JSON envelope decode)
//!     → envelope.rs (code == 0 → Ok(result), else ApiError::Application)
//!     → error.rs (transport failures → ApiError::Transport, legacy code 500)
//! ```
//!
//! # Design Decisions
//! - The transport is injected so tests can stub the server
//! - Every outcome is returned to the caller; there is no shared last-response slot
//! - Nothing is retried at this layer

pub mod client;
pub mod envelope;
pub mod error;
pub mod request;
pub mod transport;

pub use client::{AdminClient, ClientBuildError};
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult, Operation, INVALID_REQUEST_CODE, TRANSPORT_ERROR_CODE};
pub use request::{ApiRequest, QueryParams, RequestBody, ValueEncoding};
pub use transport::{HttpTransport, Transport, TransportFailure};
