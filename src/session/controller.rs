//! Session controller: one game, its clock and its timers.
//!
//! The controller is the only thing that mutates a [`SessionState`]. Three
//! kinds of input reach it:
//! - `select_card`: a click on a card slot
//! - `advance`: virtual time moving forward, firing due timers
//! - `reset_session` / `shutdown`: lifecycle
//!
//! Each input runs to completion before the next is accepted. Timers are
//! owned as cancellable handles and torn down on reset, on a terminal
//! outcome, and on shutdown. Fired timers from an earlier epoch are dropped,
//! so a callback can never touch a superseded deck.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::clock::{Countdown, TickOutcome, TICK_MS};
use crate::core::{Difficulty, GameRng, Outcome, Palette, SessionConfig, SessionState};
use crate::deck::{DeckBuilder, DeckSource};
use crate::error::Result;
use crate::timers::{FiredTimer, TimerHandle, TimerKind, TimerQueue};
use crate::turn::{SelectOutcome, TurnResolver};

use super::view::SessionView;

const NANOS_PER_MS: u128 = 1_000_000;

/// Something that happened in a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A fresh deck was dealt (construction or reset).
    Started { cards: usize, pairs: u32, seconds: u32 },
    /// A selection changed the board.
    Selected(SelectOutcome),
    /// A mismatched pair flipped back.
    RolledBack,
    /// The countdown moved.
    Ticked { remaining: u32 },
    /// The session ended.
    Finished(Outcome),
    /// The previous game was abandoned.
    Reset,
}

/// Receives session events. Both methods default to doing nothing.
///
/// The difficulty menu implements `on_exit_requested` to take the player
/// back to level selection.
pub trait SessionObserver {
    fn on_event(&mut self, _event: &SessionEvent) {}

    fn on_exit_requested(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Builder for creating a [`SessionController`].
pub struct SessionBuilder {
    config: SessionConfig,
    palette: Palette,
    source: Option<DeckSource>,
    seed: Option<u64>,
    observer: Box<dyn SessionObserver>,
}

impl SessionBuilder {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            palette: Palette::default(),
            source: None,
            seed: None,
            observer: Box::new(NoopObserver),
        }
    }

    /// Start from a difficulty preset.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.config())
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Deal from an explicit source instead of the palette.
    pub fn deck(mut self, source: DeckSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Make shuffles reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Validate everything and deal the first deck.
    pub fn build(self) -> Result<SessionController> {
        let source = match self.source {
            Some(source) => {
                self.config.validate_timing()?;
                source
            }
            None => {
                self.config.validate()?;
                self.palette.validate(self.config.required_symbols())?;
                DeckSource::Generated {
                    total_cards: self.config.total_cards,
                }
            }
        };
        let rng = match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let builder = DeckBuilder::new(self.palette).with_odd_policy(self.config.odd_policy);
        let countdown = Countdown::new(self.config.starting_seconds);

        let mut controller = SessionController {
            config: self.config,
            source,
            builder,
            rng,
            countdown,
            state: SessionState::new(Default::default(), countdown.starting_seconds()),
            timers: TimerQueue::new(),
            carry_ns: 0,
            tick_handle: None,
            rollback_handle: None,
            epoch: 0,
            observer: self.observer,
        };
        controller.deal()?;
        Ok(controller)
    }
}

/// Owns a session and drives it.
pub struct SessionController {
    config: SessionConfig,
    source: DeckSource,
    builder: DeckBuilder,
    rng: GameRng,
    countdown: Countdown,
    state: SessionState,
    timers: TimerQueue,
    /// Sub-millisecond time not yet forwarded to `timers`.
    carry_ns: u32,
    tick_handle: Option<TimerHandle>,
    rollback_handle: Option<TimerHandle>,
    epoch: u64,
    observer: Box<dyn SessionObserver>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("now_ms", &self.timers.now_ms())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Build a session from a config and palette with an entropy seed.
    pub fn new(config: SessionConfig, palette: Palette) -> Result<Self> {
        SessionBuilder::new(config).palette(palette).build()
    }

    // === Read access ===

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        SessionView::of(&self.state)
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Increments on every reset and on shutdown.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Virtual time since construction.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.timers.now_ms()) + Duration::from_nanos(u64::from(self.carry_ns))
    }

    /// Time until the next timer fires, if any is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .next_due_ms()
            .map(|due| {
                Duration::from_millis(due.saturating_sub(self.timers.now_ms()))
                    .saturating_sub(Duration::from_nanos(u64::from(self.carry_ns)))
            })
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.tick_handle.is_some_and(|h| self.timers.is_pending(h))
    }

    #[must_use]
    pub fn has_pending_rollback(&self) -> bool {
        self.rollback_handle.is_some_and(|h| self.timers.is_pending(h))
    }

    // === Input ===

    /// Click on the card at `position`.
    pub fn select_card(&mut self, position: usize) -> SelectOutcome {
        let outcome = TurnResolver::select(&mut self.state, position);
        if let SelectOutcome::Ignored(reason) = outcome {
            trace!(position, ?reason, "selection ignored");
            return outcome;
        }
        if let SelectOutcome::Mismatched { .. } = outcome {
            let handle =
                self.timers
                    .schedule(self.config.mismatch_delay_ms, TimerKind::Rollback, self.epoch);
            self.rollback_handle = Some(handle);
        }
        self.emit(SessionEvent::Selected(outcome.clone()));
        if let SelectOutcome::Matched { won: true, .. } = outcome {
            self.finish(Outcome::Won);
        }
        outcome
    }

    /// Move virtual time forward by `elapsed`, firing every timer that
    /// falls due, in order.
    ///
    /// Timers run on whole milliseconds. The fraction of a step is carried
    /// into the next call, so many small steps add up exactly.
    pub fn advance(&mut self, elapsed: Duration) {
        let total = elapsed.as_nanos() + u128::from(self.carry_ns);
        let step = u64::try_from(total / NANOS_PER_MS).unwrap_or(u64::MAX);
        self.carry_ns = (total % NANOS_PER_MS) as u32;
        let until = self.timers.now_ms().saturating_add(step);
        while let Some(fired) = self.timers.pop_due(until) {
            self.dispatch(fired);
        }
        self.timers.advance_to(until);
    }

    /// Abandon the current game and deal a new one.
    pub fn reset_session(&mut self) {
        self.cancel_timers();
        self.epoch += 1;
        info!(epoch = self.epoch, "session reset");
        self.emit(SessionEvent::Reset);
        if let Err(err) = self.deal() {
            // Sources are validated at construction. Freeze the old deck.
            warn!(%err, "could not deal a new deck");
            self.state.input_locked = true;
        }
    }

    /// Ask the menu to take over. Session state is left alone.
    pub fn request_exit_to_menu(&mut self) {
        debug!("exit to menu requested");
        self.observer.on_exit_requested();
    }

    /// Tear down: cancel every timer and refuse further input.
    pub fn shutdown(&mut self) {
        self.cancel_timers();
        self.epoch += 1;
        self.state.input_locked = true;
        debug!("session shut down");
    }

    // === Internals ===

    fn deal(&mut self) -> Result<()> {
        let mut rng = self.rng.fork();
        let deck = self.builder.build(&self.source, &mut rng)?;
        self.state = SessionState::new(deck, self.countdown.starting_seconds());
        self.countdown.rearm(&mut self.state);
        self.tick_handle = Some(self.timers.schedule(TICK_MS, TimerKind::Tick, self.epoch));

        info!(
            cards = self.state.deck.len(),
            pairs = self.state.total_pairs,
            seconds = self.state.remaining_seconds,
            "session started"
        );
        self.emit(SessionEvent::Started {
            cards: self.state.deck.len(),
            pairs: self.state.total_pairs,
            seconds: self.state.remaining_seconds,
        });
        Ok(())
    }

    fn dispatch(&mut self, fired: FiredTimer) {
        if fired.epoch != self.epoch {
            warn!(kind = ?fired.kind, epoch = fired.epoch, current = self.epoch, "dropping stale timer");
            return;
        }
        match fired.kind {
            TimerKind::Tick => {
                self.tick_handle = None;
                match self.countdown.tick(&mut self.state) {
                    TickOutcome::Running { remaining } => {
                        self.tick_handle =
                            Some(self.timers.schedule(TICK_MS, TimerKind::Tick, self.epoch));
                        self.emit(SessionEvent::Ticked { remaining });
                    }
                    TickOutcome::Expired => {
                        self.emit(SessionEvent::Ticked { remaining: 0 });
                        self.finish(Outcome::TimedOut);
                    }
                    TickOutcome::Stopped => {}
                }
            }
            TimerKind::Rollback => {
                self.rollback_handle = None;
                if TurnResolver::rollback(&mut self.state) {
                    self.emit(SessionEvent::RolledBack);
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.cancel_timers();
        self.emit(SessionEvent::Finished(outcome));
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.timers.cancel(handle);
        }
        if let Some(handle) = self.rollback_handle.take() {
            self.timers.cancel(handle);
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.observer.on_event(&event);
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TurnPhase;
    use crate::error::ConfigError;

    fn two_pairs(seconds: u32) -> SessionController {
        SessionBuilder::new(SessionConfig::new(seconds, 4))
            .deck(DeckSource::pairs(["A", "B"]))
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_schedules_first_tick() {
        let session = two_pairs(60);
        assert!(session.is_ticking());
        assert_eq!(session.next_deadline(), Some(Duration::from_secs(1)));
        assert_eq!(session.state().remaining_seconds, 60);
        assert_eq!(session.state().total_pairs, 2);
    }

    #[test]
    fn test_build_fails_fast() {
        let err = SessionBuilder::new(SessionConfig::new(60, 30)).build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::PaletteTooSmall {
                required: 15,
                available: 12
            }
        );
        let err = SessionBuilder::new(SessionConfig::new(0, 4)).build().unwrap_err();
        assert_eq!(err, ConfigError::NoTime);
    }

    #[test]
    fn test_mismatch_schedules_rollback() {
        let mut session = two_pairs(60);
        let a = session.state().positions_of("A")[0];
        let b = session.state().positions_of("B")[0];

        session.select_card(a);
        session.select_card(b);
        assert!(session.has_pending_rollback());

        session.advance(Duration::from_millis(999));
        assert_eq!(session.state().phase(), TurnPhase::Evaluating);

        session.advance(Duration::from_millis(1));
        assert_eq!(session.state().phase(), TurnPhase::Idle);
        assert!(!session.has_pending_rollback());
    }

    #[test]
    fn test_shutdown_cancels_timers() {
        let mut session = two_pairs(60);
        session.shutdown();
        assert!(!session.is_ticking());
        assert_eq!(session.next_deadline(), None);
        session.advance(Duration::from_secs(5));
        assert_eq!(session.state().remaining_seconds, 60);
    }

    #[test]
    fn test_elapsed_tracks_virtual_time() {
        let mut session = two_pairs(60);
        session.advance(Duration::from_millis(2500));
        assert_eq!(session.elapsed(), Duration::from_millis(2500));
        assert_eq!(session.state().remaining_seconds, 58);
        assert_eq!(session.next_deadline(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_sub_millisecond_steps_accumulate() {
        let mut session = two_pairs(60);
        for _ in 0..2000 {
            session.advance(Duration::from_micros(900));
        }
        assert_eq!(session.elapsed(), Duration::from_millis(1800));
        assert_eq!(session.state().remaining_seconds, 59);
        assert_eq!(session.next_deadline(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn test_fractional_carry_reaches_deadline() {
        let mut session = two_pairs(60);
        session.advance(Duration::from_micros(999_600));
        assert_eq!(session.state().remaining_seconds, 60);
        assert_eq!(session.next_deadline(), Some(Duration::from_micros(400)));

        session.advance(Duration::from_micros(400));
        assert_eq!(session.state().remaining_seconds, 59);
    }

    #[test]
    fn test_same_seed_same_deals_across_resets() {
        let mut a = SessionBuilder::for_difficulty(Difficulty::Normal).seed(77).build().unwrap();
        let mut b = SessionBuilder::for_difficulty(Difficulty::Normal).seed(77).build().unwrap();
        let symbols = |s: &SessionController| -> Vec<String> {
            s.state().deck.iter().map(|c| c.symbol.clone()).collect()
        };
        assert_eq!(symbols(&a), symbols(&b));

        a.reset_session();
        b.reset_session();
        assert_eq!(symbols(&a), symbols(&b));
    }
}
