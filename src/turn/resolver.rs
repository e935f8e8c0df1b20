//! Turn resolution: picks, pair comparison, rollback and win detection.
//!
//! ```text
//!   Idle --select--> OnePicked --select--> Evaluating
//!    ^                                       |   |
//!    +------------------ match --------------+   |
//!    +------------------ rollback <-- mismatch --+
//! ```
//!
//! A match resolves synchronously. A mismatch leaves the state in
//! `Evaluating` with input locked; whoever owns the clock calls
//! [`TurnResolver::rollback`] once the mismatch delay has elapsed.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{CardId, Outcome, Pick, SessionState};

/// Why a selection did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The session already ended.
    Terminal,
    /// A pair is being evaluated.
    Locked,
    /// No card at that position.
    OutOfRange,
    /// The card is already revealed or matched.
    FaceUp,
}

/// Result of a single selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// Defined no-op.
    Ignored(IgnoreReason),
    /// The wildcard flipped for good; picks are unchanged.
    WildcardRevealed { id: CardId },
    /// First card of a pair is face up.
    FirstPick(Pick),
    /// The pair matched and is now permanently face up.
    Matched { first: Pick, second: Pick, won: bool },
    /// The pair differs; a rollback is due after the mismatch delay.
    Mismatched { first: Pick, second: Pick },
}

impl SelectOutcome {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, SelectOutcome::Ignored(_))
    }
}

/// Comparison of the current two picks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchCheck {
    /// Fewer than two picks.
    Incomplete,
    Match,
    Mismatch,
}

/// Stateless turn logic over a [`SessionState`].
pub struct TurnResolver;

impl TurnResolver {
    /// Handle a click on the card at `position`.
    pub fn select(state: &mut SessionState, position: usize) -> SelectOutcome {
        if state.is_terminal() {
            return SelectOutcome::Ignored(IgnoreReason::Terminal);
        }
        if state.input_locked {
            return SelectOutcome::Ignored(IgnoreReason::Locked);
        }
        let Some(card) = state.deck.get(position) else {
            return SelectOutcome::Ignored(IgnoreReason::OutOfRange);
        };
        if !card.is_selectable() {
            return SelectOutcome::Ignored(IgnoreReason::FaceUp);
        }

        if card.wildcard {
            let card = &mut state.deck[position];
            card.revealed = true;
            card.matched = true;
            debug!(position, id = %card.id, "wildcard revealed");
            return SelectOutcome::WildcardRevealed { id: card.id };
        }

        let pick = Pick {
            position,
            id: card.id,
            symbol: card.symbol.clone(),
        };
        state.deck[position].revealed = true;
        state.selection.push(pick.clone());

        if state.selection.len() < 2 {
            debug!(position, id = %pick.id, "first pick");
            return SelectOutcome::FirstPick(pick);
        }

        state.input_locked = true;
        Self::evaluate(state)
    }

    /// Compare the two picks without changing anything.
    #[must_use]
    pub fn compare(state: &SessionState) -> MatchCheck {
        match (state.first_pick(), state.second_pick()) {
            (Some(a), Some(b)) if a.symbol == b.symbol => MatchCheck::Match,
            (Some(_), Some(_)) => MatchCheck::Mismatch,
            _ => MatchCheck::Incomplete,
        }
    }

    /// Resolve a complete selection.
    ///
    /// A match is applied immediately. A mismatch is reported and left
    /// pending for [`TurnResolver::rollback`].
    fn evaluate(state: &mut SessionState) -> SelectOutcome {
        let (first, second) = match (state.first_pick(), state.second_pick()) {
            (Some(a), Some(b)) => (a.clone(), b.clone()),
            _ => return SelectOutcome::Ignored(IgnoreReason::Locked),
        };

        match Self::compare(state) {
            MatchCheck::Match => {
                for card in state.deck.iter_mut() {
                    if !card.wildcard && card.symbol == first.symbol {
                        card.matched = true;
                        card.revealed = false;
                    }
                }
                state.matched_pairs += 1;
                debug_assert!(state.matched_pairs <= state.total_pairs);
                state.selection.clear();
                state.input_locked = false;
                debug!(symbol = %first.symbol, matched = state.matched_pairs, "pair matched");

                let won = Self::check_win(state);
                SelectOutcome::Matched { first, second, won }
            }
            MatchCheck::Mismatch => {
                debug!(first = %first.id, second = %second.id, "mismatch");
                SelectOutcome::Mismatched { first, second }
            }
            MatchCheck::Incomplete => SelectOutcome::Ignored(IgnoreReason::Locked),
        }
    }

    /// Flip a mismatched pair face down and unlock input.
    ///
    /// Returns `false` if there was nothing to roll back or the session is
    /// terminal; the state is then untouched.
    pub fn rollback(state: &mut SessionState) -> bool {
        if state.is_terminal() || Self::compare(state) != MatchCheck::Mismatch {
            return false;
        }
        for pick in state.selection.drain(..) {
            if let Some(card) = state.deck.get_mut(pick.position) {
                if card.id == pick.id {
                    card.revealed = false;
                }
            }
        }
        state.input_locked = false;
        debug!("mismatch rolled back");
        true
    }

    /// Declare a win once every pair is matched.
    ///
    /// Never fires for a deck without pairs or for a session that already
    /// ended.
    pub fn check_win(state: &mut SessionState) -> bool {
        if state.is_terminal() || state.total_pairs == 0 {
            return false;
        }
        if state.matched_pairs == state.total_pairs {
            state.outcome = Some(Outcome::Won);
            state.input_locked = true;
            info!(pairs = state.total_pairs, remaining = state.remaining_seconds, "session won");
            return true;
        }
        false
    }
}
