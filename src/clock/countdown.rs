//! One-second countdown.
//!
//! The countdown only does arithmetic on [`SessionState::remaining_seconds`].
//! Scheduling the next tick is the controller's job; it stops doing so once
//! [`Countdown::tick`] reports anything other than `Running`.

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::core::{Outcome, SessionState};

/// Milliseconds between ticks.
pub const TICK_MS: u64 = 1000;

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// One second elapsed; more remain.
    Running { remaining: u32 },
    /// The countdown just hit zero and ended the session.
    Expired,
    /// The session was already terminal; nothing changed.
    Stopped,
}

impl TickOutcome {
    /// Whether another tick should be scheduled.
    #[must_use]
    pub fn keeps_running(self) -> bool {
        matches!(self, TickOutcome::Running { .. })
    }
}

/// Countdown configuration for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    starting_seconds: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(starting_seconds: u32) -> Self {
        Self { starting_seconds }
    }

    #[must_use]
    pub fn starting_seconds(&self) -> u32 {
        self.starting_seconds
    }

    /// Restore the starting value.
    pub fn rearm(&self, state: &mut SessionState) {
        state.remaining_seconds = self.starting_seconds;
    }

    /// Consume one second.
    pub fn tick(&self, state: &mut SessionState) -> TickOutcome {
        if state.is_terminal() {
            return TickOutcome::Stopped;
        }
        state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
        if state.remaining_seconds > 0 {
            trace!(remaining = state.remaining_seconds, "tick");
            return TickOutcome::Running {
                remaining: state.remaining_seconds,
            };
        }
        state.outcome = Some(Outcome::TimedOut);
        state.input_locked = true;
        info!(matched = state.matched_pairs, total = state.total_pairs, "time's up");
        TickOutcome::Expired
    }
}
