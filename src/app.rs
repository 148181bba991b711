//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model`. It is fed only by engine events
//! (plus a queue snapshot when the engine says the queue changed) and holds
//! what the UI needs to draw a frame.

mod model;

pub use model::*;
