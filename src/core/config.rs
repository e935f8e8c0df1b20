//! Session configuration supplied by the difficulty menu.
//!
//! The menu hands the engine two things when a game starts:
//! - `SessionConfig`: countdown length, deck size, odd-deck policy
//! - `Palette`: the ordered symbols cards are drawn from
//!
//! Both are immutable for the lifetime of a session. Validation happens
//! once, at construction, so a running session never sees a malformed deck.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::card::WILDCARD_SYMBOL;
use crate::error::{ConfigError, Result};

/// Delay before a mismatched pair flips back, in milliseconds.
pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 1000;

/// How to make an odd card count playable.
///
/// There is no default; an odd deck without a policy is a
/// configuration error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OddDeckPolicy {
    /// Add one solitary wildcard that flips but never scores.
    PadWithWildcard,
    /// Build the next even deck and drop one card after shuffling.
    Truncate,
}

/// Configuration for one session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Countdown start value.
    pub starting_seconds: u32,

    /// Number of cards dealt.
    pub total_cards: usize,

    /// Required when `total_cards` is odd.
    #[serde(default)]
    pub odd_policy: Option<OddDeckPolicy>,

    /// How long a mismatched pair stays visible.
    #[serde(default = "default_mismatch_delay")]
    pub mismatch_delay_ms: u64,
}

fn default_mismatch_delay() -> u64 {
    DEFAULT_MISMATCH_DELAY_MS
}

impl SessionConfig {
    /// Create a configuration with the standard one-second mismatch delay.
    #[must_use]
    pub fn new(starting_seconds: u32, total_cards: usize) -> Self {
        Self {
            starting_seconds,
            total_cards,
            odd_policy: None,
            mismatch_delay_ms: DEFAULT_MISMATCH_DELAY_MS,
        }
    }

    /// Set the policy used when `total_cards` is odd.
    #[must_use]
    pub fn with_odd_policy(mut self, policy: OddDeckPolicy) -> Self {
        self.odd_policy = Some(policy);
        self
    }

    /// Set the mismatch delay.
    #[must_use]
    pub fn with_mismatch_delay_ms(mut self, delay_ms: u64) -> Self {
        self.mismatch_delay_ms = delay_ms;
        self
    }

    /// Number of distinct symbols the deck draws from the palette.
    #[must_use]
    pub fn required_symbols(&self) -> usize {
        self.total_cards.div_ceil(2)
    }

    /// Check the countdown and mismatch delay only.
    ///
    /// Used on its own when the deck comes from an explicit card list and
    /// `total_cards` does not apply.
    pub fn validate_timing(&self) -> Result<()> {
        if self.starting_seconds == 0 {
            return Err(ConfigError::NoTime);
        }
        if self.mismatch_delay_ms == 0 {
            return Err(ConfigError::ZeroMismatchDelay);
        }
        Ok(())
    }

    /// Check the numeric fields.
    ///
    /// Palette size is checked separately by [`Palette::validate`], since the
    /// two come from different parts of the menu.
    pub fn validate(&self) -> Result<()> {
        if self.total_cards == 0 {
            return Err(ConfigError::EmptyDeck);
        }
        self.validate_timing()?;
        if self.total_cards % 2 == 1 && self.odd_policy.is_none() {
            return Err(ConfigError::UnresolvedOddDeck(self.total_cards));
        }
        Ok(())
    }
}

/// Difficulty presets offered by the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Countdown seconds and card count for this level.
    #[must_use]
    pub fn config(self) -> SessionConfig {
        match self {
            Difficulty::Easy => SessionConfig::new(90, 12),
            Difficulty::Normal => SessionConfig::new(60, 16),
            Difficulty::Hard => SessionConfig::new(45, 24),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Ordered set of symbols a deck is drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Human-readable name (for the menu).
    pub name: String,

    /// Symbols in draw order. The first `ceil(n / 2)` are used.
    pub symbols: Vec<String>,
}

impl Palette {
    /// Create a palette from any list of symbols.
    pub fn new<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn fruits() -> Self {
        Self::new(
            "Fruits",
            ["🍎", "🍌", "🍇", "🍉", "🍓", "🍑", "🥝", "🍍", "🍒", "🍋", "🥭", "🍐"],
        )
    }

    #[must_use]
    pub fn animals() -> Self {
        Self::new(
            "Animals",
            ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮"],
        )
    }

    #[must_use]
    pub fn food() -> Self {
        Self::new(
            "Food",
            ["🍔", "🍕", "🍟", "🌮", "🍦", "🎂", "🍿", "🍣", "🍱", "🍜", "🍝", "🥐"],
        )
    }

    #[must_use]
    pub fn sports() -> Self {
        Self::new(
            "Sports",
            ["⚽", "🏀", "🏈", "⚾", "🥎", "🎾", "🏐", "🏉", "🥏", "🎱", "🏓", "🏸"],
        )
    }

    /// Every built-in palette, in menu order.
    #[must_use]
    pub fn presets() -> Vec<Palette> {
        vec![Self::fruits(), Self::animals(), Self::food(), Self::sports()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Check that the palette can supply `required` distinct pair symbols.
    pub fn validate(&self, required: usize) -> Result<()> {
        validate_symbols(&self.symbols)?;
        if self.symbols.len() < required {
            return Err(ConfigError::PaletteTooSmall {
                required,
                available: self.symbols.len(),
            });
        }
        Ok(())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::fruits()
    }
}

/// Reject duplicates and the reserved wildcard symbol.
pub(crate) fn validate_symbols(symbols: &[String]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for symbol in symbols {
        if symbol == WILDCARD_SYMBOL {
            return Err(ConfigError::ReservedSymbol(symbol.clone()));
        }
        if !seen.insert(symbol.as_str()) {
            return Err(ConfigError::DuplicateSymbol(symbol.clone()));
        }
    }
    Ok(())
}
