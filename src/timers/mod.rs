//! Timer scheduling for the session controller.
//!
//! ## Key Types
//!
//! - `TimerQueue`: Pending timers ordered by due time, on a virtual clock
//! - `TimerHandle`: Cancellation handle returned by `schedule`
//! - `TimerKind`: Countdown tick or mismatch rollback

pub mod queue;

pub use queue::{FiredTimer, TimerHandle, TimerKind, TimerQueue};
