//! Playback-related small types.
//!
//! This module defines the track record handed to the engine, the repeat and
//! direction enums, the derived transport state and the events the engine
//! publishes to its subscribers.

use super::sink::SinkFault;

/// Title shown for tracks that carry none.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Artist shown for tracks that carry none.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Art locator used when a track has no image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/60";

/// A playable track as supplied by the caller.
///
/// The engine never mutates a `Track`; it only stores clones of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub url: String,
    pub image_url: String,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl Track {
    /// Create a track with default title, artist and art.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            url: url.into(),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
        }
    }

    /// Set the title; blank or missing values keep the default.
    pub fn titled(mut self, title: Option<&str>) -> Self {
        if let Some(t) = non_blank(title) {
            self.title = t.to_string();
        }
        self
    }

    /// Set the artist; blank or missing values keep the default.
    pub fn by(mut self, artist: Option<&str>) -> Self {
        if let Some(a) = non_blank(artist) {
            self.artist = a.to_string();
        }
        self
    }

    /// Set the art locator; blank or missing values keep the placeholder.
    pub fn with_image(mut self, image_url: Option<&str>) -> Self {
        if let Some(i) = non_blank(image_url) {
            self.image_url = i.to_string();
        }
        self
    }

    /// The media locator, if there is one worth handing to a sink.
    pub fn playable_url(&self) -> Option<&str> {
        non_blank(Some(self.url.as_str()))
    }

    pub fn is_playable(&self) -> bool {
        self.playable_url().is_some()
    }

    /// "Artist - Title", the form used in lists and log lines.
    pub fn display(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Advance normally when a track ends.
    #[default]
    None,
    /// Advance and wrap around to the start of the queue.
    All,
    /// Replay the current track when it ends.
    One,
}

impl RepeatMode {
    /// Cycle `None -> All -> One -> None`.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "OFF",
            Self::All => "ALL",
            Self::One => "ONE",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// The transport's position in its state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportState {
    /// Nothing is loaded into the sink.
    #[default]
    Empty,
    /// A source is loaded but not playing.
    Paused,
    /// A source is loaded and the sink reports playback.
    Playing,
}

/// Notifications published by the engine to its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A track was loaded into the sink; its metadata should be displayed.
    NowPlaying(Track),
    /// The now-playing indicator changed, as reported by the sink.
    PlayingChanged(bool),
    /// Playback position as a ratio in [0, 1] plus the formatted elapsed time.
    Progress { ratio: f64, elapsed: String },
    /// Formatted total duration of the loaded track.
    DurationChanged(String),
    /// The queue contents or position changed.
    QueueChanged { len: usize, current: Option<usize> },
    ShuffleChanged(bool),
    RepeatModeChanged(RepeatMode),
    VolumeChanged(f32),
    /// A play request for `track_id` was rejected by the sink.
    PlaybackFailed { track_id: String, fault: SinkFault },
    /// The sink was unloaded; the transport is back to `Empty`.
    Emptied,
}

/// Looks up tracks that have not been materialized client-side yet.
pub trait TrackResolver {
    fn resolve(&self, id: &str) -> Option<Track>;
}
