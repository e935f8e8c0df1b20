//! Session state: the deck, the current picks, and the scoreboard.
//!
//! `SessionState` is a plain value. The turn resolver and the countdown
//! mutate it; the controller owns exactly one and hands read-only views to
//! the presentation layer.
//!
//! The deck is an `im::Vector`, so cloning a state to keep a snapshot (for
//! undo in a UI, or for comparing before/after in tests) is O(1).

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardId};

/// A face-up card waiting to be paired.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// Position in the deck (display order).
    pub position: usize,
    pub id: CardId,
    pub symbol: String,
}

/// Zero, one or two picks.
pub type Selection = SmallVec<[Pick; 2]>;

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every pair was matched in time.
    Won,
    /// The countdown reached zero first.
    TimedOut,
}

impl Outcome {
    /// Banner text for the end-of-game screen.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Won => "Congratulations, you won!",
            Outcome::TimedOut => "Time's up! You lost.",
        }
    }
}

/// Turn-resolution phase, derived from the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No picks.
    Idle,
    /// One card chosen.
    OnePicked,
    /// Two cards chosen, input locked until resolved.
    Evaluating,
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Cards in display order.
    pub deck: Vector<Card>,

    /// Current picks.
    pub selection: Selection,

    /// Pairs found so far.
    pub matched_pairs: u32,

    /// Complete pairs in the deck (wildcard and orphans excluded).
    pub total_pairs: u32,

    /// Countdown value.
    pub remaining_seconds: u32,

    /// Rejects every selection while set.
    pub input_locked: bool,

    /// Set once the game is over; only a reset clears it.
    pub outcome: Option<Outcome>,
}

impl SessionState {
    /// Create a fresh state around a dealt deck.
    #[must_use]
    pub fn new(deck: Vector<Card>, starting_seconds: u32) -> Self {
        let total_pairs = count_pairs(&deck);
        Self {
            deck,
            selection: Selection::new(),
            matched_pairs: 0,
            total_pairs,
            remaining_seconds: starting_seconds,
            input_locked: false,
            outcome: None,
        }
    }

    /// Current turn phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        match self.selection.len() {
            0 => TurnPhase::Idle,
            1 => TurnPhase::OnePicked,
            _ => TurnPhase::Evaluating,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// End-of-game message, empty while the game is running.
    #[must_use]
    pub fn terminal_message(&self) -> &'static str {
        self.outcome.map_or("", Outcome::message)
    }

    #[must_use]
    pub fn card(&self, position: usize) -> Option<&Card> {
        self.deck.get(position)
    }

    #[must_use]
    pub fn first_pick(&self) -> Option<&Pick> {
        self.selection.first()
    }

    #[must_use]
    pub fn second_pick(&self) -> Option<&Pick> {
        self.selection.get(1)
    }

    /// Positions of every card showing `symbol`, in display order.
    #[must_use]
    pub fn positions_of(&self, symbol: &str) -> Vec<usize> {
        self.deck
            .iter()
            .enumerate()
            .filter(|(_, card)| card.symbol == symbol)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Position of the card with `id`, if it is in this deck.
    #[must_use]
    pub fn position_of_id(&self, id: CardId) -> Option<usize> {
        self.deck.iter().position(|card| card.id == id)
    }

    /// Cards that are face up as picks but not yet matched.
    #[must_use]
    pub fn pending_reveals(&self) -> usize {
        self.deck.iter().filter(|c| c.revealed && !c.matched).count()
    }
}

/// Count symbols that appear on exactly two non-wildcard cards.
fn count_pairs(deck: &Vector<Card>) -> u32 {
    let mut counts: FxHashMap<&str, u32> = FxHashMap::default();
    for card in deck.iter().filter(|c| !c.wildcard) {
        *counts.entry(card.symbol.as_str()).or_insert(0) += 1;
    }
    counts.values().filter(|&&n| n == 2).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(symbols: &[&str]) -> Vector<Card> {
        symbols
            .iter()
            .enumerate()
            .map(|(i, s)| Card::new(CardId::new(i as u32 + 1), *s))
            .collect()
    }

    #[test]
    fn test_new_state() {
        let state = SessionState::new(deck(&["A", "A", "B", "B"]), 60);
        assert_eq!(state.total_pairs, 2);
        assert_eq!(state.matched_pairs, 0);
        assert_eq!(state.remaining_seconds, 60);
        assert_eq!(state.phase(), TurnPhase::Idle);
        assert_eq!(state.terminal_message(), "");
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_pairs_ignore_wildcard_and_orphans() {
        let mut cards = deck(&["A", "A", "B"]);
        cards.push_back(Card::wildcard(CardId::new(10)));
        let state = SessionState::new(cards, 10);
        assert_eq!(state.total_pairs, 1);
    }

    #[test]
    fn test_positions_of() {
        let state = SessionState::new(deck(&["A", "B", "A", "B"]), 60);
        assert_eq!(state.positions_of("A"), vec![0, 2]);
        assert_eq!(state.positions_of("B"), vec![1, 3]);
        assert!(state.positions_of("C").is_empty());
        assert_eq!(state.position_of_id(CardId::new(4)), Some(3));
    }

    #[test]
    fn test_terminal_message() {
        let mut state = SessionState::new(deck(&["A", "A"]), 60);
        state.outcome = Some(Outcome::TimedOut);
        assert_eq!(state.terminal_message(), "Time's up! You lost.");
        state.outcome = Some(Outcome::Won);
        assert_eq!(state.terminal_message(), "Congratulations, you won!");
    }

    #[test]
    fn test_snapshot_is_independent() {
        let state = SessionState::new(deck(&["A", "A"]), 60);
        let mut next = state.clone();
        next.deck[0].revealed = true;
        assert!(!state.deck[0].revealed);
        assert!(next.deck[0].revealed);
    }

    #[test]
    fn test_state_serde() {
        let state = SessionState::new(deck(&["A", "A"]), 60);
        let json = serde_json::to_string(&state).unwrap();
        let restored: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
