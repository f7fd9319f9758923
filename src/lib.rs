//! ConnectBox admin API client library.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller ──▶ AdminClient ──▶ ApiRequest ──▶ Transport ──▶ admin API
//!                 (api::client)   (api::url)     (reqwest)     GET/PUT/POST api/<name>
//!                      ▲                              │
//!                      └──── Result<Value, ApiError> ◀┘  Envelope { code, result }
//!
//!     config (TOML) ──▶ HttpTransport timeouts + credentials
//!     observability ──▶ tracing subscriber
//! ```

pub mod api;
pub mod config;
pub mod observability;

pub use api::{AdminClient, ApiError, ApiResult, ValueEncoding};
pub use config::ClientConfig;
