//! Read-only views for the presentation layer.
//!
//! A renderer needs, per card, a stable id for list identity, whether the
//! face is showing, and the symbol to draw when it is. Symbols of face-down
//! cards are withheld so a view can be handed to an untrusted front end.

use serde::Serialize;

use crate::core::{Card, CardId, SessionState};

/// One card slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardView<'a> {
    pub id: CardId,
    pub position: usize,
    pub face_up: bool,
    /// `None` while the card is face down.
    pub symbol: Option<&'a str>,
}

impl<'a> CardView<'a> {
    fn new(position: usize, card: &'a Card) -> Self {
        let face_up = card.face_up();
        Self {
            id: card.id,
            position,
            face_up,
            symbol: face_up.then_some(card.symbol.as_str()),
        }
    }
}

/// Everything a renderer draws for one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionView<'a> {
    pub cards: Vec<CardView<'a>>,
    pub remaining_seconds: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    /// Empty while the game is running.
    pub terminal_message: &'static str,
    pub input_locked: bool,
}

impl<'a> SessionView<'a> {
    #[must_use]
    pub fn of(state: &'a SessionState) -> Self {
        Self {
            cards: state
                .deck
                .iter()
                .enumerate()
                .map(|(pos, card)| CardView::new(pos, card))
                .collect(),
            remaining_seconds: state.remaining_seconds,
            matched_pairs: state.matched_pairs,
            total_pairs: state.total_pairs,
            terminal_message: state.terminal_message(),
            input_locked: state.input_locked,
        }
    }

    /// Score line, e.g. `3/8`.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.matched_pairs, self.total_pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use im::Vector;

    #[test]
    fn test_hidden_symbols_are_withheld() {
        let mut deck: Vector<Card> = vec![Card::new(CardId::new(1), "A"), Card::new(CardId::new(2), "A")]
            .into_iter()
            .collect();
        deck[1].revealed = true;
        let state = SessionState::new(deck, 30);

        let view = SessionView::of(&state);
        assert_eq!(view.cards[0].symbol, None);
        assert!(!view.cards[0].face_up);
        assert_eq!(view.cards[1].symbol, Some("A"));
        assert_eq!(view.cards[1].id, CardId::new(2));
        assert_eq!(view.score_label(), "0/1");
        assert_eq!(view.terminal_message, "");
    }

    #[test]
    fn test_view_serializes() {
        let deck: Vector<Card> = std::iter::once(Card::new(CardId::new(7), "A")).collect();
        let state = SessionState::new(deck, 30);
        let json = serde_json::to_value(SessionView::of(&state)).unwrap();
        assert_eq!(json["remaining_seconds"], 30);
        assert_eq!(json["cards"][0]["id"], 7);
        assert!(json["cards"][0]["symbol"].is_null());
    }
}
