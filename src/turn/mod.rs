//! Turn resolution state machine.
//!
//! `TurnResolver` is stateless; all turn state lives in
//! [`SessionState`](crate::core::SessionState). It never schedules
//! anything itself: a mismatch is reported to the caller, which owns the
//! delay before [`TurnResolver::rollback`].

pub mod resolver;

pub use resolver::{IgnoreReason, MatchCheck, SelectOutcome, TurnResolver};
