//! Session bindings for Python.

use std::time::Duration;

use pyo3::prelude::*;

use crate::core::{OddDeckPolicy, Palette, SessionConfig};
use crate::deck::DeckSource;
use crate::error::ConfigError;
use crate::session::{SessionBuilder, SessionController};
use crate::turn::SelectOutcome;

fn config_err(err: ConfigError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{}", err))
}

fn parse_policy(name: &str) -> PyResult<OddDeckPolicy> {
    match name {
        "wildcard" | "pad" => Ok(OddDeckPolicy::PadWithWildcard),
        "truncate" => Ok(OddDeckPolicy::Truncate),
        other => Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "unknown odd-deck policy {:?}, expected \"wildcard\" or \"truncate\"",
            other
        ))),
    }
}

/// Python wrapper for SessionController.
///
/// Time is virtual: call `advance(ms)` from the UI loop.
#[pyclass(name = "Session", unsendable)]
pub struct PySession {
    inner: SessionController,
}

#[pymethods]
impl PySession {
    /// Create a new session.
    ///
    /// # Arguments
    /// - seconds: Countdown start
    /// - cards: Number of cards dealt from the palette
    /// - palette: Symbols to draw from (default: fruits)
    /// - pairs: Explicit pair symbols; overrides `cards` and `palette`
    /// - odd_policy: "wildcard" or "truncate", required for odd `cards`
    /// - seed: RNG seed for a reproducible deal
    #[new]
    #[pyo3(signature = (
        seconds = 60,
        cards = 16,
        palette = None,
        pairs = None,
        odd_policy = None,
        seed = None
    ))]
    fn new(
        seconds: u32,
        cards: usize,
        palette: Option<Vec<String>>,
        pairs: Option<Vec<String>>,
        odd_policy: Option<&str>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let mut config = SessionConfig::new(seconds, cards);
        if let Some(name) = odd_policy {
            config = config.with_odd_policy(parse_policy(name)?);
        }
        let mut builder = SessionBuilder::new(config);
        if let Some(symbols) = palette {
            builder = builder.palette(Palette::new("custom", symbols));
        }
        if let Some(symbols) = pairs {
            builder = builder.deck(DeckSource::PairSymbols(symbols));
        }
        if let Some(seed) = seed {
            builder = builder.seed(seed);
        }
        let inner = builder.build().map_err(config_err)?;
        Ok(Self { inner })
    }

    /// Click a card. Returns "ignored", "wildcard", "first", "match" or
    /// "mismatch".
    fn select_card(&mut self, position: usize) -> &'static str {
        match self.inner.select_card(position) {
            SelectOutcome::Ignored(_) => "ignored",
            SelectOutcome::WildcardRevealed { .. } => "wildcard",
            SelectOutcome::FirstPick(_) => "first",
            SelectOutcome::Matched { .. } => "match",
            SelectOutcome::Mismatched { .. } => "mismatch",
        }
    }

    /// Move time forward by `ms` milliseconds.
    fn advance(&mut self, ms: u64) {
        self.inner.advance(Duration::from_millis(ms));
    }

    /// Deal a new game.
    fn reset(&mut self) {
        self.inner.reset_session();
    }

    /// Cancel timers and refuse further input.
    fn shutdown(&mut self) {
        self.inner.shutdown();
    }

    /// Milliseconds until the next timer, if any.
    fn next_deadline_ms(&self) -> Option<u64> {
        self.inner
            .next_deadline()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    /// Cards as `(id, face_up, symbol_or_None)` in display order.
    fn cards(&self) -> Vec<(u32, bool, Option<String>)> {
        self.inner
            .view()
            .cards
            .into_iter()
            .map(|c| (c.id.raw(), c.face_up, c.symbol.map(str::to_owned)))
            .collect()
    }

    #[getter]
    fn remaining_seconds(&self) -> u32 {
        self.inner.state().remaining_seconds
    }

    #[getter]
    fn matched_pairs(&self) -> u32 {
        self.inner.state().matched_pairs
    }

    #[getter]
    fn total_pairs(&self) -> u32 {
        self.inner.state().total_pairs
    }

    #[getter]
    fn terminal_message(&self) -> &'static str {
        self.inner.state().terminal_message()
    }

    #[getter]
    fn input_locked(&self) -> bool {
        self.inner.state().input_locked
    }

    fn __repr__(&self) -> String {
        let state = self.inner.state();
        format!(
            "Session(cards={}, pairs={}/{}, remaining={}s)",
            state.deck.len(),
            state.matched_pairs,
            state.total_pairs,
            state.remaining_seconds
        )
    }
}
