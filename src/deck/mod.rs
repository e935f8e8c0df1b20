//! Deck building and shuffling.
//!
//! ## Key Types
//!
//! - `DeckBuilder`: Deals shuffled decks and allocates card ids
//! - `DeckSource`: Palette-generated, explicit pair symbols, or explicit cards
//! - `shuffle` / `shuffle_in_place`: Fisher-Yates permutation

pub mod builder;
pub mod shuffle;

pub use builder::{DeckBuilder, DeckSource};
pub use shuffle::{shuffle, shuffle_in_place};
