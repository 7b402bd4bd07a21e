#![forbid(unsafe_code)]

//! Hover event types.
//!
//! A host reports raw pointer transitions as [`HoverKind`] values. The
//! debouncer answers with [`SettledSignal`]s once a kind has stayed the most
//! recent one for its full configured delay.

use std::fmt;
use std::time::{Duration, Instant};

/// Kind of a raw hover transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverKind {
    /// Pointer entered the element.
    Enter,
    /// Pointer left the element.
    Leave,
}

impl HoverKind {
    /// Stable uppercase name (`"ENTER"` / `"LEAVE"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "ENTER",
            Self::Leave => "LEAVE",
        }
    }
}

impl fmt::Display for HoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A debounced hover signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledSignal {
    /// Kind that settled.
    pub kind: HoverKind,
    /// When the raw event that started the winning timer arrived.
    pub raised_at: Instant,
    /// Deadline at which the timer elapsed.
    pub settled_at: Instant,
}

impl SettledSignal {
    /// Delay that was applied to this signal.
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.settled_at.saturating_duration_since(self.raised_at)
    }
}

/// Observable state of the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// No timer pending.
    #[default]
    Idle,
    /// An ENTER timer is running.
    PendingEnter,
    /// A LEAVE timer is running.
    PendingLeave,
}

impl DebounceState {
    pub(crate) const fn pending(kind: HoverKind) -> Self {
        match kind {
            HoverKind::Enter => Self::PendingEnter,
            HoverKind::Leave => Self::PendingLeave,
        }
    }

    /// Kind of the pending timer, if any.
    #[must_use]
    pub const fn pending_kind(self) -> Option<HoverKind> {
        match self {
            Self::Idle => None,
            Self::PendingEnter => Some(HoverKind::Enter),
            Self::PendingLeave => Some(HoverKind::Leave),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PendingEnter => "pending_enter",
            Self::PendingLeave => "pending_leave",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_wire_form() {
        assert_eq!(HoverKind::Enter.as_str(), "ENTER");
        assert_eq!(HoverKind::Leave.to_string(), "LEAVE");
    }

    #[test]
    fn state_pending_kind_roundtrip() {
        assert_eq!(DebounceState::Idle.pending_kind(), None);
        for kind in [HoverKind::Enter, HoverKind::Leave] {
            assert_eq!(DebounceState::pending(kind).pending_kind(), Some(kind));
        }
        assert_eq!(DebounceState::default(), DebounceState::Idle);
    }

    #[test]
    fn signal_delay_is_deadline_minus_raise() {
        let t = Instant::now();
        let sig = SettledSignal {
            kind: HoverKind::Enter,
            raised_at: t,
            settled_at: t + Duration::from_millis(500),
        };
        assert_eq!(sig.delay(), Duration::from_millis(500));
    }
}
