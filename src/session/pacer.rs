//! Wall-clock driver for a [`SessionController`].
//!
//! The controller runs on virtual time. A real-time front end keeps a
//! `Pacer` next to it and calls [`Pacer::pump`] from its frame or idle
//! callback; the pacer forwards the wall-clock time since the last pump.
//! Sleeping for [`SessionController::next_deadline`] between pumps is
//! enough to hit every timer on time.

use std::time::{Duration, Instant};

use super::controller::SessionController;

#[derive(Clone, Copy, Debug)]
pub struct Pacer {
    last: Instant,
}

impl Pacer {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    #[must_use]
    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    /// Forward the time since the last pump. Returns how much was forwarded.
    pub fn pump(&mut self, session: &mut SessionController) -> Duration {
        self.pump_at(session, Instant::now())
    }

    /// Forward time up to `now`. A `now` earlier than the last pump forwards
    /// nothing.
    pub fn pump_at(&mut self, session: &mut SessionController, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        if now > self.last {
            self.last = now;
        }
        session.advance(elapsed);
        elapsed
    }

    /// Forget time that passed while the game was not being driven, e.g.
    /// right after a reset.
    pub fn resync(&mut self) {
        self.last = Instant::now();
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}
