//! Application model types: `App` and its status line.

use crate::player::{PlayerEvent, RepeatMode, Track, format_time};

/// The main application model.
pub struct App {
    pub queue: Vec<Track>,
    /// Queue index the engine reports as current.
    pub current: Option<usize>,
    /// Queue cursor moved with `j` / `k`.
    pub selected: usize,

    pub now_playing: Option<Track>,
    pub playing: bool,

    pub ratio: f64,
    pub elapsed: String,
    pub total: String,

    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub volume: f32,

    /// Last failure worth showing to the user.
    pub status: Option<String>,
    /// Set when the engine reported a queue change not yet in `queue`.
    pub queue_dirty: bool,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            current: None,
            selected: 0,
            now_playing: None,
            playing: false,
            ratio: 0.0,
            elapsed: format_time(0.0),
            total: format_time(0.0),
            shuffle: false,
            repeat: RepeatMode::None,
            volume: 1.0,
            status: None,
            queue_dirty: false,
            should_quit: false,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one engine event into the model.
    pub fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::NowPlaying(track) => {
                self.now_playing = Some(track.clone());
                self.ratio = 0.0;
                self.elapsed = format_time(0.0);
                self.status = None;
            }
            PlayerEvent::PlayingChanged(playing) => self.playing = *playing,
            PlayerEvent::Progress { ratio, elapsed } => {
                self.ratio = ratio.clamp(0.0, 1.0);
                self.elapsed = elapsed.clone();
            }
            PlayerEvent::DurationChanged(total) => self.total = total.clone(),
            PlayerEvent::QueueChanged { len, current } => {
                self.current = *current;
                self.queue_dirty = true;
                self.clamp_selection(*len);
            }
            PlayerEvent::ShuffleChanged(on) => self.shuffle = *on,
            PlayerEvent::RepeatModeChanged(mode) => self.repeat = *mode,
            PlayerEvent::VolumeChanged(v) => self.volume = *v,
            PlayerEvent::PlaybackFailed { track_id, fault } => {
                self.playing = false;
                self.status = Some(format!("cannot play {track_id}: {fault}"));
            }
            PlayerEvent::Emptied => {
                self.now_playing = None;
                self.playing = false;
                self.ratio = 0.0;
                self.elapsed = format_time(0.0);
                self.total = format_time(0.0);
            }
        }
    }

    /// Replace the queue view with a fresh engine snapshot.
    pub fn sync_queue(&mut self, queue: Vec<Track>, current: Option<usize>) {
        self.queue = queue;
        self.current = current;
        self.queue_dirty = false;
        self.clamp_selection(self.queue.len());
    }

    fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        if !self.queue.is_empty() {
            self.selected = (self.selected + 1) % self.queue.len();
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if !self.queue.is_empty() {
            let len = self.queue.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Put the cursor on the current track.
    pub fn follow_current(&mut self) {
        if let Some(i) = self.current.filter(|&i| i < self.queue.len()) {
            self.selected = i;
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Status line text: a pending failure wins over the transport summary.
    pub fn status_line(&self) -> String {
        if let Some(status) = &self.status {
            return status.clone();
        }
        let state = match (&self.now_playing, self.playing) {
            (None, _) => "stopped",
            (Some(_), true) => "playing",
            (Some(_), false) => "paused",
        };
        format!(
            "{state} | shuffle {} | repeat {} | vol {:>3}%",
            if self.shuffle { "ON" } else { "OFF" },
            self.repeat.label(),
            (self.volume * 100.0).round() as u32,
        )
    }
}
