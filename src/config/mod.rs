//! Client configuration.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → HttpTransport (base URL, timeouts, credentials)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AuthConfig, ClientConfig, ObservabilityConfig, TimeoutConfig};
