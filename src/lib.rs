//! # memory-match
//!
//! A headless engine for a single-player memory-matching card game.
//!
//! Cards are dealt face down. The player reveals two at a time: a matching
//! pair stays face up, a mismatch flips back after a short delay. Matching
//! every pair before the countdown runs out wins.
//!
//! ## Design Principles
//!
//! 1. **Explicit state**: All game state is one [`SessionState`] value owned
//!    by one [`SessionController`]. No globals, no render-driven effects.
//!
//! 2. **Virtual time**: The controller never sleeps. Front ends call
//!    [`SessionController::advance`] (or use a [`Pacer`]) and timers fire in
//!    order, each to completion.
//!
//! 3. **Cancellable timers**: The countdown tick and the mismatch rollback are
//!    handles owned by the controller, cancelled on reset, game over and
//!    shutdown.
//!
//! 4. **Fail fast, then total**: Bad configuration is rejected when the
//!    session is built. After that every input has a defined outcome.
//!
//! ## Modules
//!
//! - `core`: Cards, RNG, configuration, session state
//! - `deck`: Deck building and Fisher-Yates shuffle
//! - `turn`: Pick / compare / rollback state machine
//! - `clock`: Countdown
//! - `timers`: Cancellable timer queue
//! - `session`: Controller, observer, views, pacer
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use memory_match::{DeckSource, SessionBuilder, SessionConfig};
//!
//! let mut session = SessionBuilder::new(SessionConfig::new(60, 4))
//!     .deck(DeckSource::pairs(["A", "B"]))
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let a = session.state().positions_of("A");
//! session.select_card(a[0]);
//! session.select_card(a[1]);
//! assert_eq!(session.state().matched_pairs, 1);
//!
//! session.advance(Duration::from_secs(1));
//! assert_eq!(session.state().remaining_seconds, 59);
//! ```

pub mod core;
pub mod error;
pub mod deck;
pub mod turn;
pub mod clock;
pub mod timers;
pub mod session;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, WILDCARD_SYMBOL,
    GameRng,
    Difficulty, OddDeckPolicy, Palette, SessionConfig,
    Outcome, Pick, Selection, SessionState, TurnPhase,
};

pub use crate::error::{ConfigError, Result};

pub use crate::deck::{shuffle, shuffle_in_place, DeckBuilder, DeckSource};

pub use crate::turn::{IgnoreReason, MatchCheck, SelectOutcome, TurnResolver};

pub use crate::clock::{Countdown, TickOutcome};

pub use crate::timers::{TimerHandle, TimerKind, TimerQueue};

pub use crate::session::{
    CardView, NoopObserver, Pacer, SessionBuilder, SessionController, SessionEvent,
    SessionObserver, SessionView,
};
