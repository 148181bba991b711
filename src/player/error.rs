use thiserror::Error;

use super::sink::SinkFault;

/// Conditions the engine reports instead of panicking.
///
/// None of these are fatal: every operation that returns one has already
/// logged it and left the engine in a consistent state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("track {id:?} has no playable url")]
    InvalidTrack { id: String },
    #[error("queue is empty")]
    EmptyQueue,
    #[error("no track with id {0:?}")]
    UnknownTrack(String),
    #[error("playback rejected: {0}")]
    SinkRejected(SinkFault),
    #[error("cannot seek without a known duration")]
    InvalidSeekTarget,
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
}
