//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base_url '{url}' is not a valid URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("base_url scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("auth.username must not be empty")]
    EmptyUsername,
}

pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if let Some(auth) = &config.auth {
        if auth.username.trim().is_empty() {
            errors.push(ValidationError::EmptyUsername);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
