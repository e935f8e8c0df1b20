//! Python bindings for the memory-match engine.
//!
//! # Quick Start
//!
//! ```python
//! import memory_match as mm
//!
//! session = mm.Session(seconds=60, pairs=["A", "B"], seed=42)
//! cards = session.cards()
//! session.select_card(0)
//! session.advance(1000)
//! print(session.remaining_seconds)
//! ```

use pyo3::prelude::*;

mod py_session;

pub use py_session::*;

/// memory_match: a memory card game engine.
#[pymodule]
fn memory_match(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySession>()?;
    Ok(())
}
