#![forbid(unsafe_code)]

//! Hover-intent runtime.
//!
//! Ties the clock-free [`hoverintent_core`] state machine to real time.
//!
//! # Key Components
//!
//! - [`HoverIntentDriver`] - timer thread plus settled-signal channel
//! - [`HoverIntentHandle`] - cloneable, thread-safe input handle
//! - [`TimelineSimulator`] - deterministic virtual-clock replay for tests

pub mod driver;
pub mod simulator;

pub use driver::{HoverIntentDriver, HoverIntentHandle};
pub use simulator::{HostInput, SettledAt, TimelineSimulator};

pub use hoverintent_core::{
    DebounceConfig, DebounceState, HoverIntentError, HoverIntentOptions, HoverKind,
    SettledHooks, SettledSignal,
};
