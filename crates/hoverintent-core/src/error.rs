#![forbid(unsafe_code)]

//! Error type for debouncer configuration.
//!
//! Only configuration can fail. Raw-event handling, muting and timer
//! cancellation are total.

use std::fmt;

/// Errors reported synchronously by configuration entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverIntentError {
    /// A configuration value was rejected.
    InvalidConfig {
        /// Name of the offending field or environment variable.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl HoverIntentError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for HoverIntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config for `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for HoverIntentError {}

/// Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, HoverIntentError>;
