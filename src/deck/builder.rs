//! Deck construction.
//!
//! A deck is dealt from one of three sources:
//! - `Generated`: draw pair symbols from the session palette
//! - `PairSymbols`: an explicit symbol list, two cards each
//! - `Cards`: an explicit card list, validated and reshuffled
//!
//! The builder also owns card id allocation. Ids increase monotonically
//! for the builder's lifetime, so every deal gets ids no earlier deal used.
//! An explicit card list keeps its own ids on the first deal only.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::shuffle::shuffle_in_place;
use crate::core::config::validate_symbols;
use crate::core::{Card, CardId, GameRng, OddDeckPolicy, Palette, WILDCARD_SYMBOL};
use crate::error::{ConfigError, Result};

/// Where the cards of a deal come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckSource {
    /// Draw `total_cards` cards from the palette.
    Generated { total_cards: usize },
    /// Two cards per symbol, in any order; no padding.
    PairSymbols(Vec<String>),
    /// Use these cards as-is, face down, reshuffled.
    Cards(Vec<Card>),
}

impl DeckSource {
    /// Pair-symbol source from anything string-like.
    pub fn pairs<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DeckSource::PairSymbols(symbols.into_iter().map(Into::into).collect())
    }
}

/// Builds shuffled decks and allocates card ids.
#[derive(Clone, Debug)]
pub struct DeckBuilder {
    palette: Palette,
    odd_policy: Option<OddDeckPolicy>,
    next_id: u32,
}

impl DeckBuilder {
    /// Create a builder for the given palette.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            odd_policy: None,
            next_id: 1,
        }
    }

    /// Set the policy for odd card counts.
    #[must_use]
    pub fn with_odd_policy(mut self, policy: Option<OddDeckPolicy>) -> Self {
        self.odd_policy = policy;
        self
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Allocate a fresh card id.
    pub fn alloc_id(&mut self) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Deal a shuffled deck.
    pub fn build(&mut self, source: &DeckSource, rng: &mut GameRng) -> Result<Vector<Card>> {
        let cards = match source {
            DeckSource::Generated { total_cards } => self.generate(*total_cards, rng)?,
            DeckSource::PairSymbols(symbols) => self.from_pairs(symbols, rng)?,
            DeckSource::Cards(cards) => self.from_cards(cards, rng)?,
        };
        debug!(cards = cards.len(), "dealt deck");
        Ok(cards.into_iter().collect())
    }

    fn generate(&mut self, total_cards: usize, rng: &mut GameRng) -> Result<Vec<Card>> {
        if total_cards == 0 {
            return Err(ConfigError::EmptyDeck);
        }
        let required = total_cards.div_ceil(2);
        self.palette.validate(required)?;

        let odd = total_cards % 2 == 1;
        let policy = match (odd, self.odd_policy) {
            (false, _) => None,
            (true, Some(policy)) => Some(policy),
            (true, None) => return Err(ConfigError::UnresolvedOddDeck(total_cards)),
        };

        let pair_count = match policy {
            Some(OddDeckPolicy::PadWithWildcard) => total_cards / 2,
            _ => required,
        };
        let symbols: Vec<String> = self.palette.symbols[..pair_count].to_vec();
        let mut cards = self.pair_cards(&symbols);

        match policy {
            Some(OddDeckPolicy::PadWithWildcard) => {
                let id = self.alloc_id();
                cards.push(Card::wildcard(id));
                shuffle_in_place(&mut cards, rng);
            }
            Some(OddDeckPolicy::Truncate) => {
                shuffle_in_place(&mut cards, rng);
                cards.truncate(total_cards);
            }
            None => shuffle_in_place(&mut cards, rng),
        }
        Ok(cards)
    }

    fn from_pairs(&mut self, symbols: &[String], rng: &mut GameRng) -> Result<Vec<Card>> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptyDeck);
        }
        validate_symbols(symbols)?;
        let mut cards = self.pair_cards(symbols);
        shuffle_in_place(&mut cards, rng);
        Ok(cards)
    }

    fn from_cards(&mut self, supplied: &[Card], rng: &mut GameRng) -> Result<Vec<Card>> {
        validate_cards(supplied)?;

        // Supplied ids are kept only while none of them has been handed out;
        // every later deal of the same cards gets fresh ids.
        let keep_ids = supplied.iter().all(|c| c.id.raw() >= self.next_id);
        let mut cards: Vec<Card> = Vec::with_capacity(supplied.len());
        if keep_ids {
            if let Some(max) = supplied.iter().map(|c| c.id).max() {
                self.next_id = max.raw().checked_add(1).ok_or(ConfigError::CardIdOverflow(max))?;
            }
            cards.extend(supplied.iter().cloned());
        } else {
            for card in supplied {
                let mut card = card.clone();
                card.id = self.alloc_id();
                cards.push(card);
            }
        }
        for card in &mut cards {
            card.hide();
        }
        shuffle_in_place(&mut cards, rng);
        Ok(cards)
    }

    fn pair_cards(&mut self, symbols: &[String]) -> Vec<Card> {
        let mut cards = Vec::with_capacity(symbols.len() * 2);
        for symbol in symbols {
            for _ in 0..2 {
                let id = self.alloc_id();
                cards.push(Card::new(id, symbol.clone()));
            }
        }
        cards
    }
}

/// Check an explicit card list: unique ids, at most one wildcard, and
/// every other symbol on exactly two cards.
fn validate_cards(cards: &[Card]) -> Result<()> {
    if cards.is_empty() {
        return Err(ConfigError::EmptyDeck);
    }

    let mut ids = FxHashSet::default();
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    let mut wildcards = 0;
    for card in cards {
        if !ids.insert(card.id) {
            return Err(ConfigError::DuplicateCardId(card.id));
        }
        if card.wildcard {
            wildcards += 1;
        } else if card.symbol == WILDCARD_SYMBOL {
            return Err(ConfigError::ReservedSymbol(card.symbol.clone()));
        } else {
            *counts.entry(card.symbol.as_str()).or_insert(0) += 1;
        }
    }
    if wildcards > 1 {
        return Err(ConfigError::ExtraWildcards(wildcards));
    }

    // First offender in deck order.
    for card in cards.iter().filter(|c| !c.wildcard) {
        let count = counts[card.symbol.as_str()];
        if count != 2 {
            return Err(ConfigError::UnpairedSymbol {
                symbol: card.symbol.clone(),
                count,
            });
        }
    }
    Ok(())
}
