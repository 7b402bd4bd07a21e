#![forbid(unsafe_code)]

//! Deterministic timeline simulator.
//!
//! `TimelineSimulator` replays a script of timed host inputs against a
//! [`HoverIntentDebouncer`] on a virtual clock. No threads and no sleeping:
//! every pending deadline that falls before the next step is delivered at
//! exactly its deadline, so results are reproducible to the millisecond.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use hoverintent_core::{HoverIntentOptions, HoverKind};
//! use hoverintent_runtime::simulator::{HostInput, TimelineSimulator};
//!
//! let ms = Duration::from_millis;
//! let mut sim = TimelineSimulator::new(HoverIntentOptions::default());
//! sim.run(&[
//!     (ms(0), HostInput::Enter),
//!     (ms(100), HostInput::Leave),
//!     (ms(700), HostInput::Enter),
//! ]);
//! sim.finish();
//!
//! assert_eq!(sim.settled().len(), 1);
//! assert_eq!(sim.settled()[0].kind, HoverKind::Enter);
//! assert_eq!(sim.settled()[0].at, ms(1200));
//! ```

use std::time::{Duration, Instant};

use hoverintent_core::{
    HoverIntentDebouncer, HoverIntentError, HoverIntentOptions, HoverKind, SettledSignal,
};

/// A host action at a point on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    /// Raw pointer enter.
    Enter,
    /// Raw pointer leave.
    Leave,
    /// Set the mute flag.
    Mute(bool),
    /// Attach: begin accepting raw events.
    Start,
    /// Detach: cancel and stop accepting raw events.
    Stop,
    /// Reconfigure delays in signed milliseconds.
    Configure(i64, i64),
}

/// A settled signal positioned on the virtual timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledAt {
    pub kind: HoverKind,
    /// Offset from the simulation start.
    pub at: Duration,
}

/// Replays host inputs against a debouncer on a virtual clock.
#[derive(Debug)]
pub struct TimelineSimulator {
    hover: HoverIntentDebouncer,
    base: Instant,
    now: Duration,
    settled: Vec<SettledAt>,
    errors: Vec<(Duration, HoverIntentError)>,
}

impl TimelineSimulator {
    /// Create a simulator whose debouncer is already started.
    #[must_use]
    pub fn new(options: HoverIntentOptions) -> Self {
        let mut hover = HoverIntentDebouncer::with_options(options);
        hover.start();
        Self::with_debouncer(hover)
    }

    /// Wrap an existing debouncer as-is (active or not).
    #[must_use]
    pub fn with_debouncer(hover: HoverIntentDebouncer) -> Self {
        Self {
            hover,
            base: Instant::now(),
            now: Duration::ZERO,
            settled: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward to `at`, delivering every deadline on the way.
    ///
    /// Times earlier than the current clock are treated as "now".
    pub fn advance_to(&mut self, at: Duration) {
        let target = at.max(self.now);
        while let Some(deadline) = self.hover.next_deadline() {
            let offset = deadline.saturating_duration_since(self.base);
            if offset > target {
                break;
            }
            match self.hover.poll_at(deadline) {
                Some(signal) => self.record(&signal),
                None => break,
            }
        }
        self.now = target;
    }

    /// Apply one input at the current virtual time.
    pub fn apply(&mut self, input: HostInput) {
        let now = self.base + self.now;
        match input {
            HostInput::Enter => {
                self.hover.on_raw_enter_at(now);
            }
            HostInput::Leave => {
                self.hover.on_raw_leave_at(now);
            }
            HostInput::Mute(muted) => self.hover.set_muted(muted),
            HostInput::Start => self.hover.start(),
            HostInput::Stop => self.hover.stop(),
            HostInput::Configure(enter_ms, leave_ms) => {
                if let Err(err) = self.hover.configure(enter_ms, leave_ms) {
                    self.errors.push((self.now, err));
                }
            }
        }
    }

    /// Replay `(offset, input)` steps. Offsets are measured from the start.
    pub fn run(&mut self, script: &[(Duration, HostInput)]) -> &[SettledAt] {
        for &(at, input) in script {
            self.advance_to(at);
            self.apply(input);
        }
        &self.settled
    }

    /// Advance until nothing is pending.
    pub fn finish(&mut self) -> &[SettledAt] {
        if let Some(deadline) = self.hover.next_deadline() {
            let offset = deadline.saturating_duration_since(self.base);
            self.advance_to(offset);
        }
        &self.settled
    }

    #[must_use]
    pub fn settled(&self) -> &[SettledAt] {
        &self.settled
    }

    /// Configuration errors raised by `Configure` steps, with their time.
    #[must_use]
    pub fn errors(&self) -> &[(Duration, HoverIntentError)] {
        &self.errors
    }

    #[must_use]
    pub fn debouncer(&self) -> &HoverIntentDebouncer {
        &self.hover
    }

    fn record(&mut self, signal: &SettledSignal) {
        self.settled.push(SettledAt {
            kind: signal.kind,
            at: signal.settled_at.saturating_duration_since(self.base),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoverintent_core::DebounceState;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn sim() -> TimelineSimulator {
        TimelineSimulator::new(HoverIntentOptions::default())
    }

    #[test]
    fn lone_enter() {
        let mut sim = sim();
        sim.run(&[(ms(0), HostInput::Enter)]);
        assert_eq!(
            sim.finish(),
            &[SettledAt {
                kind: HoverKind::Enter,
                at: ms(500)
            }]
        );
    }

    #[test]
    fn deadline_between_steps_is_delivered_exactly() {
        let mut sim = sim();
        sim.run(&[(ms(0), HostInput::Enter), (ms(900), HostInput::Leave)]);
        assert_eq!(sim.settled().len(), 1);
        assert_eq!(sim.settled()[0].at, ms(500));
        sim.finish();
        assert_eq!(sim.settled()[1].kind, HoverKind::Leave);
        assert_eq!(sim.settled()[1].at, ms(2900));
    }

    #[test]
    fn step_at_deadline_sees_settled_first() {
        let mut sim = sim();
        sim.run(&[(ms(0), HostInput::Enter), (ms(500), HostInput::Leave)]);
        assert_eq!(sim.settled().len(), 1);
        assert_eq!(sim.debouncer().state(), DebounceState::PendingLeave);
    }

    #[test]
    fn mute_and_stop_steps() {
        let mut sim = sim();
        sim.run(&[
            (ms(0), HostInput::Mute(true)),
            (ms(10), HostInput::Enter),
            (ms(20), HostInput::Mute(false)),
            (ms(30), HostInput::Leave),
            (ms(40), HostInput::Stop),
            (ms(50), HostInput::Enter),
        ]);
        assert!(sim.finish().is_empty());
        assert!(!sim.debouncer().is_active());

        sim.run(&[(ms(60), HostInput::Start), (ms(70), HostInput::Enter)]);
        assert_eq!(sim.finish()[0].at, ms(570));
    }

    #[test]
    fn configure_errors_are_recorded() {
        let mut sim = sim();
        sim.run(&[
            (ms(0), HostInput::Configure(-1, 10)),
            (ms(5), HostInput::Configure(10, 20)),
            (ms(5), HostInput::Leave),
        ]);
        assert_eq!(sim.errors().len(), 1);
        assert_eq!(sim.errors()[0].0, ms(0));
        assert_eq!(sim.finish()[0].at, ms(25));
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut sim = sim();
        sim.advance_to(ms(100));
        sim.advance_to(ms(50));
        assert_eq!(sim.now(), ms(100));
    }
}
