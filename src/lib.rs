//! playdeck: a queue-driven music playback engine with a terminal front-end.
//!
//! The engine lives in [`player`]; everything else feeds it tracks,
//! settings and input, or draws what it reports.

pub mod app;
pub mod config;
pub mod library;
pub mod player;
pub mod runtime;
pub mod ui;
