#![forbid(unsafe_code)]

//! Core: debounced hover-intent detection.
//!
//! A host feeds raw pointer enter/leave transitions into a
//! [`HoverIntentDebouncer`](debouncer::HoverIntentDebouncer) and receives
//! settled signals once a transition has stood undisturbed for its
//! configured delay. The core is clock-free and single-threaded; see
//! `hoverintent-runtime` for a thread-backed driver.

pub mod config;
pub mod debouncer;
pub mod error;
pub mod event;
pub mod logging;

pub use config::{DebounceConfig, HoverIntentOptions};
pub use debouncer::{DebouncerStats, HoverIntentDebouncer, SettledHooks};
pub use error::{HoverIntentError, Result};
pub use event::{DebounceState, HoverKind, SettledSignal};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
