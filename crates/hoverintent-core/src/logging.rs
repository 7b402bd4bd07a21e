#![forbid(unsafe_code)]

//! Logging support for the debouncer.
//!
//! With the `tracing` feature enabled the usual `tracing` macros are
//! re-exported. Without it, no-op macros with the same names are provided so
//! the state machine can log unconditionally at zero cost.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns an error if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
}
