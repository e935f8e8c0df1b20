//! Card identification and per-card state.
//!
//! Every card in a deck has a unique `CardId`. Ids are allocated by the
//! session controller from a counter that outlives resets, so a reset
//! never hands out an id that an earlier deck used.
//!
//! ```
//! use memory_match::core::{Card, CardId};
//!
//! let card = Card::new(CardId(1), "🍎");
//! assert!(!card.face_up());
//! assert!(card.is_selectable());
//! ```

use serde::{Deserialize, Serialize};

/// Symbol reserved for the solitary padding card of an odd deck.
///
/// Palettes may not contain it, so it can never form a pair.
pub const WILDCARD_SYMBOL: &str = "★";

/// Unique identifier for a card, stable for the lifetime of its deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique id within the controller's lifetime.
    pub id: CardId,

    /// Face content. Two cards share it per pair.
    pub symbol: String,

    /// Currently turned face up as a pick.
    pub revealed: bool,

    /// Permanently face up.
    pub matched: bool,

    /// Solitary padding card; never takes part in pair comparison.
    pub wildcard: bool,
}

impl Card {
    /// Create a face-down card.
    pub fn new(id: CardId, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            revealed: false,
            matched: false,
            wildcard: false,
        }
    }

    /// Create the face-down wildcard.
    #[must_use]
    pub fn wildcard(id: CardId) -> Self {
        Self {
            wildcard: true,
            ..Self::new(id, WILDCARD_SYMBOL)
        }
    }

    /// Whether the presentation layer should show the card's face.
    #[must_use]
    pub fn face_up(&self) -> bool {
        self.revealed || self.matched
    }

    /// A card can be picked only while it is face down.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.face_up()
    }

    /// Turn the card face down again, clearing any match.
    pub fn hide(&mut self) {
        self.revealed = false;
        self.matched = false;
    }
}
