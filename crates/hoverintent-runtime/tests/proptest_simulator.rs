//! Property-based tests for timeline replay.
//!
//! 1. Replaying a random host script settles exactly the accepted raw events
//!    that stay the most recent one for their full delay, at their deadline.
//!    Mute, stop/start and reconfiguration steps are mixed in.
//! 2. Replay is deterministic: the same script yields the same timeline.

use std::time::Duration;

use hoverintent_runtime::{
    DebounceConfig, HostInput, HoverIntentOptions, HoverKind, SettledAt, TimelineSimulator,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn input_strategy() -> impl Strategy<Value = HostInput> {
    prop_oneof![
        6 => Just(HostInput::Enter),
        6 => Just(HostInput::Leave),
        2 => any::<bool>().prop_map(HostInput::Mute),
        1 => Just(HostInput::Start),
        1 => Just(HostInput::Stop),
        1 => (-50i64..1500, -50i64..3000).prop_map(|(e, l)| HostInput::Configure(e, l)),
    ]
}

/// (gap before step in ms, input)
fn script_strategy() -> impl Strategy<Value = Vec<(u64, HostInput)>> {
    prop::collection::vec((0u64..2500, input_strategy()), 0..50)
}

fn options_strategy() -> impl Strategy<Value = HoverIntentOptions> {
    (0u64..1500, 0u64..3000).prop_map(|(e, l)| {
        HoverIntentOptions::default().with_config(
            DebounceConfig::default()
                .with_enter_delay(Duration::from_millis(e))
                .with_leave_delay(Duration::from_millis(l)),
        )
    })
}

/// Turn gaps into absolute offsets.
fn timeline(script: &[(u64, HostInput)]) -> Vec<(Duration, HostInput)> {
    let mut now_ms = 0u64;
    script
        .iter()
        .map(|&(gap, input)| {
            now_ms += gap;
            (Duration::from_millis(now_ms), input)
        })
        .collect()
}

/// Reference model: one pending `(kind, deadline)` slot, replaced by every
/// accepted raw event, cleared by stop, delivered when the clock reaches it.
fn expected(options: HoverIntentOptions, steps: &[(Duration, HostInput)]) -> Vec<SettledAt> {
    let mut config = options.config;
    let mut muted = options.muted;
    let mut active = true;
    let mut pending: Option<(HoverKind, Duration)> = None;
    let mut out = Vec::new();

    for &(at, input) in steps {
        if let Some((kind, deadline)) = pending
            && deadline <= at
        {
            out.push(SettledAt { kind, at: deadline });
            pending = None;
        }
        match input {
            HostInput::Enter | HostInput::Leave => {
                let kind = if input == HostInput::Enter {
                    HoverKind::Enter
                } else {
                    HoverKind::Leave
                };
                if active && !muted {
                    pending = Some((kind, at + config.delay_for(kind)));
                }
            }
            HostInput::Mute(m) => muted = m,
            HostInput::Start => active = true,
            HostInput::Stop => {
                active = false;
                pending = None;
            }
            HostInput::Configure(e, l) => {
                if let Ok(next) = DebounceConfig::from_millis(e, l) {
                    config = next;
                }
            }
        }
    }
    if let Some((kind, deadline)) = pending {
        out.push(SettledAt { kind, at: deadline });
    }
    out
}

fn replay(options: HoverIntentOptions, steps: &[(Duration, HostInput)]) -> Vec<SettledAt> {
    let mut sim = TimelineSimulator::new(options);
    sim.run(steps);
    sim.finish().to_vec()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Replay matches the last-accepted-event-wins model
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_matches_model(options in options_strategy(), script in script_strategy()) {
        let steps = timeline(&script);
        prop_assert_eq!(replay(options, &steps), expected(options, &steps));
    }

    #[test]
    fn rejected_configure_steps_are_recorded(
        options in options_strategy(),
        script in script_strategy(),
    ) {
        let steps = timeline(&script);
        let mut sim = TimelineSimulator::new(options);
        sim.run(&steps);

        let rejected: Vec<Duration> = steps
            .iter()
            .filter(|(_, input)| matches!(input, HostInput::Configure(e, l) if *e < 0 || *l < 0))
            .map(|(at, _)| *at)
            .collect();
        let recorded: Vec<Duration> = sim.errors().iter().map(|(at, _)| *at).collect();
        prop_assert_eq!(recorded, rejected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replay_is_deterministic(options in options_strategy(), script in script_strategy()) {
        let steps = timeline(&script);
        let first = replay(options, &steps);
        let second = replay(options, &steps);
        prop_assert_eq!(first.clone(), second);
        for pair in first.windows(2) {
            prop_assert!(pair[0].at <= pair[1].at, "settled out of order: {:?}", pair);
        }
    }
}
