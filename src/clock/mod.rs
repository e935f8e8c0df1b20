//! Countdown clock.

pub mod countdown;

pub use countdown::{Countdown, TickOutcome, TICK_MS};
