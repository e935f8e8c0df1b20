//! Session controller and presentation boundary.
//!
//! ## Key Types
//!
//! - `SessionBuilder` / `SessionController`: Build, drive and reset a game
//! - `SessionObserver`: Event and exit-to-menu notifications
//! - `SessionView` / `CardView`: What a renderer reads
//! - `Pacer`: Turns wall-clock time into `advance` calls

pub mod controller;
pub mod pacer;
pub mod view;

pub use controller::{NoopObserver, SessionBuilder, SessionController, SessionEvent, SessionObserver};
pub use pacer::Pacer;
pub use view::{CardView, SessionView};
