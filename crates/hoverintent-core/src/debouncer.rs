#![forbid(unsafe_code)]

//! Hover-intent debouncing.
//!
//! Pointers cross element boundaries far more often than users mean to.
//! [`HoverIntentDebouncer`] reduces a stream of raw ENTER/LEAVE transitions
//! to "settled" signals: a kind settles only after it has remained the most
//! recent raw event for its full configured delay.
//!
//! # State machine
//!
//! ```text
//!            raw ENTER                         raw LEAVE
//!   Idle ─────────────► PendingEnter ◄──────────────────► PendingLeave
//!    ▲                      │          raw ENTER / LEAVE       │
//!    │   deadline reached   │   (restart, any kind)            │
//!    └──── emit ENTER ──────┘                                  │
//!    └──────────────────────────── emit LEAVE ─────────────────┘
//! ```
//!
//! - Every accepted raw event cancels the pending timer, whatever its kind,
//!   and starts a new one of `enter_delay` or `leave_delay`.
//! - A raw event arriving while muted is dropped before scheduling. Muting
//!   never cancels a timer that is already running.
//! - [`stop`](HoverIntentDebouncer::stop) cancels the pending timer and
//!   drops raw events until the next [`start`](HoverIntentDebouncer::start).
//!
//! # Time
//!
//! The debouncer owns no clock and no thread. Every time-dependent call has
//! an `_at(now)` form; hosts drive delivery by calling
//! [`poll_at`](HoverIntentDebouncer::poll_at) at or after
//! [`next_deadline`](HoverIntentDebouncer::next_deadline). Identical input
//! sequences therefore yield identical output.
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use hoverintent_core::debouncer::HoverIntentDebouncer;
//! use hoverintent_core::config::DebounceConfig;
//! use hoverintent_core::event::HoverKind;
//!
//! let mut hover = HoverIntentDebouncer::new(DebounceConfig::default());
//! hover.start();
//!
//! let t0 = Instant::now();
//! hover.on_raw_enter_at(t0);
//! assert!(hover.poll_at(t0 + Duration::from_millis(499)).is_none());
//!
//! let settled = hover.poll_at(t0 + Duration::from_millis(500)).unwrap();
//! assert_eq!(settled.kind, HoverKind::Enter);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{DebounceConfig, HoverIntentOptions, delay_from_millis};
use crate::error::Result;
use crate::event::{DebounceState, HoverKind, SettledSignal};

/// Callback invoked with a settled signal.
pub type OnSettled = Box<dyn Fn(&SettledSignal) + Send + Sync>;

/// Optional callbacks fired when a signal settles.
///
/// Hooks run inside [`HoverIntentDebouncer::poll_at`], after the state
/// machine has returned to idle.
#[derive(Default)]
pub struct SettledHooks {
    on_settled_enter: Option<OnSettled>,
    on_settled_leave: Option<OnSettled>,
}

impl fmt::Debug for SettledHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettledHooks")
            .field("on_settled_enter", &self.on_settled_enter.is_some())
            .field("on_settled_leave", &self.on_settled_leave.is_some())
            .finish()
    }
}

impl SettledHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set callback for settled ENTER signals.
    #[must_use]
    pub fn on_settled_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SettledSignal) + Send + Sync + 'static,
    {
        self.on_settled_enter = Some(Box::new(callback));
        self
    }

    /// Set callback for settled LEAVE signals.
    #[must_use]
    pub fn on_settled_leave<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SettledSignal) + Send + Sync + 'static,
    {
        self.on_settled_leave = Some(Box::new(callback));
        self
    }

    pub fn has_settled_enter(&self) -> bool {
        self.on_settled_enter.is_some()
    }

    pub fn has_settled_leave(&self) -> bool {
        self.on_settled_leave.is_some()
    }

    fn fire(&self, signal: &SettledSignal) {
        let hook = match signal.kind {
            HoverKind::Enter => &self.on_settled_enter,
            HoverKind::Leave => &self.on_settled_leave,
        };
        if let Some(cb) = hook {
            cb(signal);
        }
    }
}

/// Diagnostic counters. Not cleared by `stop()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebouncerStats {
    /// Raw events that (re)started the timer.
    pub accepted: u64,
    /// Raw events dropped because the mute flag was set.
    pub muted_drops: u64,
    /// Raw events dropped because the debouncer was stopped.
    pub inactive_drops: u64,
    /// Pending timers replaced by a newer raw event.
    pub superseded: u64,
    pub settled_enter: u64,
    pub settled_leave: u64,
    /// Pending timers discarded by `stop()`.
    pub cancelled_by_stop: u64,
}

impl DebouncerStats {
    /// Total settled signals emitted.
    #[must_use]
    pub fn settled(&self) -> u64 {
        self.settled_enter + self.settled_leave
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    kind: HoverKind,
    raised_at: Instant,
    /// `None` when `raised_at + delay` is not representable; such a timer
    /// never elapses.
    deadline: Option<Instant>,
}

/// Debounced hover-intent detector for a single element.
///
/// # Thread Safety
///
/// Not internally synchronized. Share it across threads behind one mutex so
/// that cancel-then-schedule stays atomic.
#[derive(Debug)]
pub struct HoverIntentDebouncer {
    config: DebounceConfig,
    muted: bool,
    active: bool,
    pending: Option<PendingTimer>,
    hooks: SettledHooks,
    stats: DebouncerStats,
}

impl Default for HoverIntentDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

impl HoverIntentDebouncer {
    /// Create an inactive, unmuted debouncer.
    #[must_use]
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            muted: false,
            active: false,
            pending: None,
            hooks: SettledHooks::default(),
            stats: DebouncerStats::default(),
        }
    }

    /// Create an inactive debouncer from host options.
    #[must_use]
    pub fn with_options(options: HoverIntentOptions) -> Self {
        let mut this = Self::new(options.config);
        this.muted = options.muted;
        this
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: SettledHooks) -> Self {
        self.hooks = hooks;
        self
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Set both delays from signed milliseconds.
    ///
    /// Negative values are rejected and leave the current config untouched.
    /// A running timer keeps the deadline it was scheduled with.
    pub fn configure(&mut self, enter_delay_ms: i64, leave_delay_ms: i64) -> Result<()> {
        let enter_delay = delay_from_millis("enter_delay", enter_delay_ms)?;
        let leave_delay = delay_from_millis("leave_delay", leave_delay_ms)?;
        self.set_config(DebounceConfig {
            enter_delay,
            leave_delay,
        });
        Ok(())
    }

    /// Replace the config. Applies to timers started afterwards.
    pub fn set_config(&mut self, config: DebounceConfig) {
        crate::debug!(
            enter_ms = config.enter_delay.as_millis() as u64,
            leave_ms = config.leave_delay.as_millis() as u64,
            "hover intent reconfigured"
        );
        self.config = config;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Begin accepting raw events. No-op when already active.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        crate::trace!("hover intent started");
    }

    /// Stop accepting raw events and cancel the pending timer.
    ///
    /// After this returns, no settled signal is produced until `start()` is
    /// called and a new raw event fully elapses. No-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(_cancelled) = self.pending.take() {
            self.stats.cancelled_by_stop += 1;
            crate::debug!(
                kind = _cancelled.kind.as_str(),
                "pending hover timer cancelled by stop"
            );
        }
        if self.active {
            self.active = false;
            crate::trace!("hover intent stopped");
        }
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    // -----------------------------------------------------------------------
    // Mute
    // -----------------------------------------------------------------------

    /// Update the mute flag.
    ///
    /// Only raw events arriving while muted are affected; a timer already
    /// running still delivers.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    #[inline]
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    // -----------------------------------------------------------------------
    // Raw events
    // -----------------------------------------------------------------------

    /// Feed a raw transition observed at `now`.
    ///
    /// Returns `true` if the event (re)started the timer, `false` if it was
    /// dropped because the debouncer is stopped or muted.
    pub fn on_raw_at(&mut self, kind: HoverKind, now: Instant) -> bool {
        if !self.active {
            self.stats.inactive_drops += 1;
            return false;
        }
        if self.muted {
            self.stats.muted_drops += 1;
            crate::trace!(kind = kind.as_str(), "raw hover event dropped while muted");
            return false;
        }

        let delay = self.config.delay_for(kind);
        let next = PendingTimer {
            kind,
            raised_at: now,
            deadline: now.checked_add(delay),
        };
        if let Some(_previous) = self.pending.replace(next) {
            self.stats.superseded += 1;
            crate::debug!(
                previous = _previous.kind.as_str(),
                next = kind.as_str(),
                "pending hover timer superseded"
            );
        }
        self.stats.accepted += 1;
        crate::trace!(
            kind = kind.as_str(),
            delay_ms = delay.as_millis() as u64,
            "raw hover event accepted"
        );
        true
    }

    pub fn on_raw_enter_at(&mut self, now: Instant) -> bool {
        self.on_raw_at(HoverKind::Enter, now)
    }

    pub fn on_raw_leave_at(&mut self, now: Instant) -> bool {
        self.on_raw_at(HoverKind::Leave, now)
    }

    /// Feed a raw transition observed now.
    pub fn on_raw(&mut self, kind: HoverKind) -> bool {
        self.on_raw_at(kind, Instant::now())
    }

    pub fn on_raw_enter(&mut self) -> bool {
        self.on_raw(HoverKind::Enter)
    }

    pub fn on_raw_leave(&mut self) -> bool {
        self.on_raw(HoverKind::Leave)
    }

    // -----------------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------------

    /// Deliver the pending timer if its deadline is at or before `now`.
    ///
    /// Fires the matching hook and returns the signal. The state machine is
    /// idle afterwards, so each timer is delivered at most once.
    pub fn poll_at(&mut self, now: Instant) -> Option<SettledSignal> {
        let timer = self.pending?;
        let deadline = timer.deadline?;
        if now < deadline {
            return None;
        }
        self.pending = None;

        let signal = SettledSignal {
            kind: timer.kind,
            raised_at: timer.raised_at,
            settled_at: deadline,
        };
        match signal.kind {
            HoverKind::Enter => self.stats.settled_enter += 1,
            HoverKind::Leave => self.stats.settled_leave += 1,
        }
        crate::debug!(
            kind = signal.kind.as_str(),
            delay_ms = signal.delay().as_millis() as u64,
            "hover intent settled"
        );
        self.hooks.fire(&signal);
        Some(signal)
    }

    /// [`poll_at`](Self::poll_at) with the current time.
    pub fn poll(&mut self) -> Option<SettledSignal> {
        self.poll_at(Instant::now())
    }

    /// Instant at which the pending timer elapses.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.and_then(|p| p.deadline)
    }

    /// Time left until the pending timer elapses (zero if already due).
    #[must_use]
    pub fn time_until_settle(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> DebounceState {
        match self.pending {
            Some(p) => DebounceState::pending(p.kind),
            None => DebounceState::Idle,
        }
    }

    #[inline]
    #[must_use]
    pub fn pending_kind(&self) -> Option<HoverKind> {
        self.pending.map(|p| p.kind)
    }

    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> DebouncerStats {
        self.stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
