//! Core types: cards, RNG, configuration and session state.
//!
//! Everything here is plain data. Behaviour lives in `deck`, `turn`,
//! `clock` and `session`.

pub mod card;
pub mod rng;
pub mod config;
pub mod state;

pub use card::{Card, CardId, WILDCARD_SYMBOL};
pub use rng::GameRng;
pub use config::{Difficulty, OddDeckPolicy, Palette, SessionConfig, DEFAULT_MISMATCH_DELAY_MS};
pub use state::{Outcome, Pick, Selection, SessionState, TurnPhase};
