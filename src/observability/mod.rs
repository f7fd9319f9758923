//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! api::client, config::loader
//!     → tracing events (request, outcome, failures)
//!     → logging.rs subscriber (stderr, filtered by RUST_LOG or config)
//! ```

pub mod logging;

pub use logging::init_logging;
