#![forbid(unsafe_code)]

//! Debounce configuration and environment overrides.
//!
//! Delays are plain [`Duration`]s. Entry points that accept signed
//! millisecond values reject negatives with
//! [`HoverIntentError::InvalidConfig`]; zero is accepted and settles on the
//! first poll at or after the raw event.

use std::time::Duration;

use crate::error::{HoverIntentError, Result};
use crate::event::HoverKind;

/// Environment variable overriding the enter delay (milliseconds).
pub const ENV_ENTER_MS: &str = "HOVER_INTENT_ENTER_MS";
/// Environment variable overriding the leave delay (milliseconds).
pub const ENV_LEAVE_MS: &str = "HOVER_INTENT_LEAVE_MS";
/// Environment variable overriding the initial mute flag (`1/0/true/false`).
pub const ENV_MUTED: &str = "HOVER_INTENT_MUTED";

/// Default delay before an ENTER settles.
pub const DEFAULT_ENTER_DELAY: Duration = Duration::from_millis(500);
/// Default delay before a LEAVE settles.
pub const DEFAULT_LEAVE_DELAY: Duration = Duration::from_millis(2000);

/// Per-direction debounce delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Quiet period required before an ENTER settles.
    /// Default: 500ms
    pub enter_delay: Duration,

    /// Quiet period required before a LEAVE settles.
    /// Default: 2000ms
    pub leave_delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            enter_delay: DEFAULT_ENTER_DELAY,
            leave_delay: DEFAULT_LEAVE_DELAY,
        }
    }
}

impl DebounceConfig {
    /// Build a config from signed millisecond values.
    pub fn from_millis(enter_ms: i64, leave_ms: i64) -> Result<Self> {
        Ok(Self {
            enter_delay: delay_from_millis("enter_delay", enter_ms)?,
            leave_delay: delay_from_millis("leave_delay", leave_ms)?,
        })
    }

    #[must_use]
    pub fn with_enter_delay(mut self, delay: Duration) -> Self {
        self.enter_delay = delay;
        self
    }

    #[must_use]
    pub fn with_leave_delay(mut self, delay: Duration) -> Self {
        self.leave_delay = delay;
        self
    }

    /// Delay applied to a raw event of `kind`.
    #[inline]
    #[must_use]
    pub fn delay_for(&self, kind: HoverKind) -> Duration {
        match kind {
            HoverKind::Enter => self.enter_delay,
            HoverKind::Leave => self.leave_delay,
        }
    }
}

/// Host-supplied inputs: delays plus the initial mute flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverIntentOptions {
    pub config: DebounceConfig,
    /// Default: false
    pub muted: bool,
}

impl HoverIntentOptions {
    /// Defaults overridden by `HOVER_INTENT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom lookup (for tests).
    ///
    /// Unset variables keep their defaults. A set but malformed variable is
    /// an error rather than being silently ignored.
    pub fn from_env_with<F>(get_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        if let Some(value) = get_env(ENV_ENTER_MS) {
            opts.config.enter_delay = delay_from_str(ENV_ENTER_MS, &value)?;
        }
        if let Some(value) = get_env(ENV_LEAVE_MS) {
            opts.config.leave_delay = delay_from_str(ENV_LEAVE_MS, &value)?;
        }
        if let Some(value) = get_env(ENV_MUTED) {
            opts.muted = parse_bool(&value).ok_or_else(|| {
                HoverIntentError::invalid(ENV_MUTED, format!("expected a boolean, got {value:?}"))
            })?;
        }
        Ok(opts)
    }

    #[must_use]
    pub fn with_config(mut self, config: DebounceConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }
}

pub(crate) fn delay_from_millis(field: &'static str, ms: i64) -> Result<Duration> {
    if ms < 0 {
        crate::warn!(field = field, ms = ms, "rejecting negative debounce delay");
        return Err(HoverIntentError::invalid(
            field,
            format!("must not be negative (got {ms} ms)"),
        ));
    }
    Ok(Duration::from_millis(ms.unsigned_abs()))
}

fn delay_from_str(field: &'static str, value: &str) -> Result<Duration> {
    let ms: i64 = value.trim().parse().map_err(|_| {
        HoverIntentError::invalid(field, format!("expected milliseconds, got {value:?}"))
    })?;
    delay_from_millis(field, ms)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
