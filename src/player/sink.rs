//! The seam between the engine and whatever actually produces sound.
//!
//! A sink behaves like a single media element: it holds at most one source,
//! answers play requests asynchronously and reports what happened through a
//! queue of [`SinkEvent`]s that the engine drains in emission order.

use thiserror::Error;

/// Token attached to every play request so late answers can be matched
/// against the request that is still current.
pub type Generation = u64;

/// Why a sink could not play its source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum SinkFault {
    #[error("audio loading aborted")]
    Aborted,
    #[error("network error")]
    Network,
    #[error("audio decoding failed")]
    Decode,
    #[error("audio format not supported")]
    Unsupported,
    #[error("error loading audio")]
    Unknown,
}

impl SinkFault {
    /// Classify a native media fault code (1..=4); anything else is generic.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Aborted,
            2 => Self::Network,
            3 => Self::Decode,
            4 => Self::Unsupported,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// Playback actually started or resumed.
    Play,
    /// Playback actually paused, including the implicit pause at end of media.
    Pause,
    /// The source played to its end.
    Ended,
    /// Periodic position report, in seconds. `duration` is NaN when unknown.
    TimeUpdate { current: f64, duration: f64 },
    /// Duration became known (NaN when the source does not report one).
    LoadedMetadata { duration: f64 },
    /// The source failed outside of a play request.
    Error(SinkFault),
    /// Answer to `request_play(generation)`.
    PlayResolved {
        generation: Generation,
        result: Result<(), SinkFault>,
    },
}

/// A single audio output that plays one media locator at a time.
pub trait AudioSink {
    /// Load `url` as the current source, stopping whatever played before.
    fn set_source(&mut self, url: &str);
    /// Drop the current source entirely.
    fn clear_source(&mut self);
    fn source(&self) -> Option<&str>;

    /// Ask the sink to start (or resume) playback. The outcome is reported
    /// later as `SinkEvent::PlayResolved { generation, .. }`.
    fn request_play(&mut self, generation: Generation);
    /// Pause immediately.
    fn pause(&mut self);
    fn is_paused(&self) -> bool;

    /// Current position in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// Total duration in seconds, if known.
    fn duration(&self) -> Option<f64>;

    fn set_volume(&mut self, volume: f32);

    /// Drain the events emitted since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<SinkEvent>;
}
