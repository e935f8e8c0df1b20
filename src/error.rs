//! Construction-time errors.
//!
//! Only building a session can fail. Once a session is running every
//! operation has a defined outcome and invalid selections are no-ops.

use thiserror::Error;

use crate::core::CardId;

/// A session configuration or palette that cannot produce a playable deck.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a deck needs at least one card")]
    EmptyDeck,

    #[error("the countdown must start above zero seconds")]
    NoTime,

    #[error("the mismatch delay must be above zero milliseconds")]
    ZeroMismatchDelay,

    #[error("{0} cards is odd and no odd-deck policy was chosen")]
    UnresolvedOddDeck(usize),

    #[error("palette has {available} symbols but the deck needs {required}")]
    PaletteTooSmall { required: usize, available: usize },

    #[error("symbol {0:?} appears more than once")]
    DuplicateSymbol(String),

    #[error("symbol {0:?} is reserved for the wildcard")]
    ReservedSymbol(String),

    #[error("symbol {symbol:?} is on {count} cards, a pair needs exactly 2")]
    UnpairedSymbol { symbol: String, count: usize },

    #[error("{0} appears more than once")]
    DuplicateCardId(CardId),

    #[error("a deck holds at most one wildcard, found {0}")]
    ExtraWildcards(usize),

    #[error("{0} leaves no room for fresh ids")]
    CardIdOverflow(CardId),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConfigError::PaletteTooSmall {
            required: 8,
            available: 3,
        };
        assert_eq!(err.to_string(), "palette has 3 symbols but the deck needs 8");
        assert_eq!(
            ConfigError::DuplicateSymbol("🍎".into()).to_string(),
            "symbol \"🍎\" appears more than once"
        );
        assert_eq!(
            ConfigError::UnpairedSymbol {
                symbol: "A".into(),
                count: 3
            }
            .to_string(),
            "symbol \"A\" is on 3 cards, a pair needs exactly 2"
        );
        assert_eq!(
            ConfigError::DuplicateCardId(CardId::new(7)).to_string(),
            "Card(7) appears more than once"
        );
    }
}
