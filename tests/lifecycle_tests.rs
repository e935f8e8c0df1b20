//! Reset, teardown and observer tests.
//!
//! These tests verify that no timer from an earlier game can reach the
//! current one, and that the observer sees the session's lifecycle.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use memory_match::{
    Card, CardId, ConfigError, DeckSource, Difficulty, OddDeckPolicy, Outcome, Palette,
    SelectOutcome, SessionBuilder, SessionConfig, SessionController, SessionEvent,
    SessionObserver, TurnPhase,
};

#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<SessionEvent>>>,
    exits: Rc<RefCell<u32>>,
}

impl SessionObserver for Recorder {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }

    fn on_exit_requested(&mut self) {
        *self.exits.borrow_mut() += 1;
    }
}

fn session_with(recorder: &Recorder, seconds: u32) -> SessionController {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    SessionBuilder::new(SessionConfig::new(seconds, 4))
        .deck(DeckSource::pairs(["A", "B"]))
        .seed(11)
        .observer(recorder.clone())
        .build()
        .unwrap()
}

fn ids(session: &SessionController) -> Vec<CardId> {
    session.state().deck.iter().map(|c| c.id).collect()
}

// =============================================================================
// Reset
// =============================================================================

/// Reset re-deals with fresh ids and re-arms the clock.
#[test]
fn test_reset_regenerates_everything() {
    let mut session = SessionBuilder::for_difficulty(Difficulty::Easy)
        .palette(Palette::animals())
        .seed(5)
        .build()
        .unwrap();
    let first_ids = ids(&session);

    let pos = session.state().positions_of("🐶");
    session.select_card(pos[0]);
    session.select_card(pos[1]);
    session.advance(Duration::from_secs(10));
    assert_eq!(session.state().matched_pairs, 1);
    assert_eq!(session.state().remaining_seconds, 80);

    session.reset_session();

    let state = session.state();
    assert_eq!(state.matched_pairs, 0);
    assert_eq!(state.remaining_seconds, 90);
    assert_eq!(state.phase(), TurnPhase::Idle);
    assert!(state.outcome.is_none());
    assert!(!state.input_locked);
    assert!(state.deck.iter().all(|c| !c.face_up()));
    assert_eq!(state.deck.len(), 12);

    let second_ids = ids(&session);
    assert!(second_ids.iter().all(|id| !first_ids.contains(id)));
    assert_eq!(session.epoch(), 1);
}

/// A rollback pending at reset time never fires.
#[test]
fn test_reset_cancels_pending_rollback() {
    let recorder = Recorder::default();
    let mut session = session_with(&recorder, 60);
    let a = session.state().positions_of("A")[0];
    let b = session.state().positions_of("B")[0];
    session.select_card(a);
    session.select_card(b);
    assert!(session.has_pending_rollback());

    session.reset_session();
    assert!(!session.has_pending_rollback());

    // Reveal one card in the new deck, then let the old delay elapse.
    session.select_card(0);
    session.advance(Duration::from_millis(1500));

    assert!(session.state().card(0).unwrap().revealed);
    assert_eq!(session.state().phase(), TurnPhase::OnePicked);
    assert!(!recorder
        .events
        .borrow()
        .iter()
        .any(|e| *e == SessionEvent::RolledBack));
}

/// Reset after a timeout makes the session playable again.
#[test]
fn test_reset_after_timeout() {
    let mut session = SessionBuilder::new(SessionConfig::new(1, 4))
        .deck(DeckSource::pairs(["A", "B"]))
        .seed(2)
        .build()
        .unwrap();
    session.advance(Duration::from_secs(1));
    assert_eq!(session.state().outcome, Some(Outcome::TimedOut));

    session.reset_session();
    assert!(session.state().outcome.is_none());
    assert_eq!(session.state().remaining_seconds, 1);
    assert!(session.is_ticking());
    assert!(matches!(session.select_card(0), SelectOutcome::FirstPick(_)));
}

/// Ticks after a reset count from the reset, not from the old schedule.
#[test]
fn test_reset_rearms_tick_phase() {
    let mut session = SessionBuilder::new(SessionConfig::new(30, 4))
        .deck(DeckSource::pairs(["A", "B"]))
        .seed(2)
        .build()
        .unwrap();
    session.advance(Duration::from_millis(700));
    session.reset_session();

    session.advance(Duration::from_millis(400));
    assert_eq!(session.state().remaining_seconds, 30);
    session.advance(Duration::from_millis(600));
    assert_eq!(session.state().remaining_seconds, 29);
}

// =============================================================================
// Teardown and menu
// =============================================================================

/// Shutdown cancels timers and refuses input.
#[test]
fn test_shutdown() {
    let mut session = SessionBuilder::new(SessionConfig::new(5, 4))
        .deck(DeckSource::pairs(["A", "B"]))
        .seed(2)
        .build()
        .unwrap();
    session.select_card(0);
    session.shutdown();

    session.advance(Duration::from_secs(30));
    assert_eq!(session.state().remaining_seconds, 5);
    assert!(session.select_card(1).is_ignored());
}

/// Exit-to-menu notifies the observer and leaves the game alone.
#[test]
fn test_exit_to_menu() {
    let recorder = Recorder::default();
    let mut session = session_with(&recorder, 60);
    session.select_card(0);
    let before = session.state().clone();

    session.request_exit_to_menu();

    assert_eq!(*recorder.exits.borrow(), 1);
    assert_eq!(session.state(), &before);
}

/// The observer sees start, picks, ticks and the end.
#[test]
fn test_observer_event_stream() {
    let recorder = Recorder::default();
    let mut session = session_with(&recorder, 60);
    for symbol in ["A", "B"] {
        let pos = session.state().positions_of(symbol);
        session.select_card(pos[0]);
        session.select_card(pos[1]);
    }

    let events = recorder.events.borrow();
    assert_eq!(
        events.first(),
        Some(&SessionEvent::Started {
            cards: 4,
            pairs: 2,
            seconds: 60
        })
    );
    assert_eq!(events.last(), Some(&SessionEvent::Finished(Outcome::Won)));
    let selections = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Selected(_)))
        .count();
    assert_eq!(selections, 4);
}

/// Each countdown second is reported.
#[test]
fn test_observer_sees_ticks() {
    let recorder = Recorder::default();
    let mut session = session_with(&recorder, 3);
    session.advance(Duration::from_secs(3));

    let ticks: Vec<u32> = recorder
        .events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Ticked { remaining } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![2, 1, 0]);
    assert_eq!(
        recorder.events.borrow().last(),
        Some(&SessionEvent::Finished(Outcome::TimedOut))
    );
}

// =============================================================================
// Odd decks
// =============================================================================

/// The wildcard flips without taking a pick slot and never blocks the win.
#[test]
fn test_wildcard_session() {
    let config = SessionConfig::new(60, 5).with_odd_policy(OddDeckPolicy::PadWithWildcard);
    let mut session = SessionBuilder::new(config).seed(9).build().unwrap();
    assert_eq!(session.state().total_pairs, 2);

    let wild = session
        .state()
        .deck
        .iter()
        .position(|c| c.wildcard)
        .expect("wildcard dealt");
    assert!(matches!(
        session.select_card(wild),
        SelectOutcome::WildcardRevealed { .. }
    ));
    assert_eq!(session.state().phase(), TurnPhase::Idle);
    assert!(session.select_card(wild).is_ignored());

    for symbol in &Palette::fruits().symbols[..2] {
        let pos = session.state().positions_of(symbol);
        session.select_card(pos[0]);
        session.select_card(pos[1]);
    }
    assert_eq!(session.state().outcome, Some(Outcome::Won));
}

/// A truncated odd deck counts only complete pairs toward the win.
#[test]
fn test_truncated_session() {
    let config = SessionConfig::new(60, 5).with_odd_policy(OddDeckPolicy::Truncate);
    let mut session = SessionBuilder::new(config).seed(4).build().unwrap();
    assert_eq!(session.state().deck.len(), 5);
    assert_eq!(session.state().total_pairs, 2);

    let symbols: Vec<String> = Palette::fruits().symbols[..3].to_vec();
    for symbol in &symbols {
        let pos = session.state().positions_of(symbol);
        if pos.len() == 2 {
            session.select_card(pos[0]);
            session.select_card(pos[1]);
        }
    }
    assert_eq!(session.state().outcome, Some(Outcome::Won));
}

// =============================================================================
// Explicit card decks
// =============================================================================

fn card_deck(symbols: &[&str]) -> DeckSource {
    DeckSource::Cards(
        symbols
            .iter()
            .enumerate()
            .map(|(i, s)| Card::new(CardId::new(i as u32 + 1), *s))
            .collect(),
    )
}

/// A supplied deck plays to a win and re-deals with ids never seen before.
#[test]
fn test_card_deck_session_and_reset() {
    let mut session = SessionBuilder::new(SessionConfig::new(60, 4))
        .deck(card_deck(&["A", "A", "B", "B"]))
        .seed(6)
        .build()
        .unwrap();
    let first_ids = ids(&session);
    let mut sorted = first_ids.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (1..=4).map(CardId::new).collect::<Vec<_>>());

    for symbol in ["A", "B"] {
        let pos = session.state().positions_of(symbol);
        session.select_card(pos[0]);
        session.select_card(pos[1]);
    }
    assert_eq!(session.state().outcome, Some(Outcome::Won));

    session.reset_session();
    let second_ids = ids(&session);
    assert_eq!(second_ids.len(), 4);
    assert!(second_ids.iter().all(|id| !first_ids.contains(id)));
    assert_eq!(session.state().positions_of("A").len(), 2);
    assert!(session.state().outcome.is_none());

    session.reset_session();
    let third_ids = ids(&session);
    assert!(third_ids
        .iter()
        .all(|id| !first_ids.contains(id) && !second_ids.contains(id)));
}

/// Supplied decks that cannot be played fail at build time.
#[test]
fn test_card_deck_rejected_at_build() {
    let build = |source: DeckSource| {
        SessionBuilder::new(SessionConfig::new(60, 4))
            .deck(source)
            .seed(1)
            .build()
            .unwrap_err()
    };

    assert_eq!(
        build(card_deck(&["A", "A", "A", "A", "B", "B"])),
        ConfigError::UnpairedSymbol {
            symbol: "A".into(),
            count: 4
        }
    );
    assert_eq!(
        build(card_deck(&["A", "A", "A", "A"])),
        ConfigError::UnpairedSymbol {
            symbol: "A".into(),
            count: 4
        }
    );
    assert_eq!(
        build(DeckSource::Cards(vec![
            Card::new(CardId::new(3), "A"),
            Card::new(CardId::new(3), "A"),
        ])),
        ConfigError::DuplicateCardId(CardId::new(3))
    );
    assert_eq!(
        build(DeckSource::Cards(vec![
            Card::new(CardId::new(1), "A"),
            Card::new(CardId::new(u32::MAX), "A"),
        ])),
        ConfigError::CardIdOverflow(CardId::new(u32::MAX))
    );
}

// =============================================================================
// Virtual time
// =============================================================================

/// Steps shorter than a millisecond still move the clock.
#[test]
fn test_sub_millisecond_advance_is_not_lost() {
    let recorder = Recorder::default();
    let mut session = session_with(&recorder, 60);
    for _ in 0..2000 {
        session.advance(Duration::from_micros(900));
    }
    assert_eq!(session.elapsed(), Duration::from_millis(1800));
    assert_eq!(session.state().remaining_seconds, 59);
}
