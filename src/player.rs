//! Playback engine.
//!
//! A [`Player`] owns the play queue, drives a single [`AudioSink`] through
//! play/pause/seek/volume and keeps the progress bar in sync with the sink.
//! Everything the engine learns from the sink arrives as [`SinkEvent`]s and
//! everything it wants the UI to know leaves as [`PlayerEvent`]s.

mod engine;
mod error;
mod progress;
mod queue;
mod rodio_sink;
mod sink;
mod types;

pub use engine::{Player, PlayerOptions};
pub use error::PlaybackError;
pub use progress::{Progress, ProgressUpdate, format_time};
pub use queue::Queue;
pub use rodio_sink::RodioSink;
pub use sink::{AudioSink, Generation, SinkEvent, SinkFault};
pub use types::{
    Direction, PLACEHOLDER_IMAGE_URL, PlayerEvent, RepeatMode, Track, TrackResolver,
    TransportState, UNKNOWN_ARTIST, UNKNOWN_TITLE,
};
