use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, error, info, warn};

use super::error::PlaybackError;
use super::progress::{Progress, format_time};
use super::queue::Queue;
use super::sink::{AudioSink, Generation, SinkEvent, SinkFault};
use super::types::{
    Direction, PlayerEvent, RepeatMode, Track, TrackResolver, TransportState,
};

/// Initial engine state, usually derived from the playback settings.
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub volume: f32,
    pub shuffle: bool,
    pub repeat_mode: RepeatMode,
    /// Stop after the last track instead of wrapping when repeat is off.
    pub stop_at_queue_end: bool,
    /// Fixed seed for shuffle picks; `None` seeds from the OS.
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat_mode: RepeatMode::None,
            stop_at_queue_end: false,
            shuffle_seed: None,
        }
    }
}

/// A play request that has not been answered by the sink yet.
struct PendingPlay {
    generation: Generation,
    url: String,
}

/// The playback engine: queue, transport and progress over one sink.
pub struct Player<S: AudioSink> {
    sink: S,
    queue: Queue,
    progress: Progress,

    playing: bool,
    shuffled: bool,
    repeat_mode: RepeatMode,
    volume: f32,
    stop_at_queue_end: bool,

    now_playing: Option<Track>,
    generation: Generation,
    pending: Option<PendingPlay>,
    last_error: Option<PlaybackError>,

    subscribers: Vec<Sender<PlayerEvent>>,
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) }
}

impl<S: AudioSink> Player<S> {
    pub fn new(mut sink: S, options: PlayerOptions) -> Self {
        let volume = clamp_volume(options.volume);
        sink.set_volume(volume);

        let queue = match options.shuffle_seed {
            Some(seed) => Queue::with_seed(seed),
            None => Queue::new(),
        };

        Self {
            sink,
            queue,
            progress: Progress::new(),
            playing: false,
            shuffled: options.shuffle,
            repeat_mode: options.repeat_mode,
            volume,
            stop_at_queue_end: options.stop_at_queue_end,
            now_playing: None,
            generation: 0,
            pending: None,
            last_error: None,
            subscribers: Vec::new(),
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: PlayerEvent) {
        // Subscribers that hung up are dropped.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn fail(&mut self, err: PlaybackError) -> Result<(), PlaybackError> {
        self.last_error = Some(err.clone());
        Err(err)
    }

    fn emit_queue_changed(&mut self) {
        let event = PlayerEvent::QueueChanged {
            len: self.queue.len(),
            current: self.queue.current_index(),
        };
        self.emit(event);
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.emit(PlayerEvent::PlayingChanged(playing));
        }
    }

    // ---- queue ---------------------------------------------------------

    /// Replace the queue with the playable subset of `tracks`.
    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        self.queue.set(tracks);
        self.emit_queue_changed();
    }

    /// Append one track; tracks without a url are refused.
    pub fn add_to_queue(&mut self, track: Track) -> Result<(), PlaybackError> {
        let id = track.id.clone();
        if !self.queue.push(track) {
            return self.fail(PlaybackError::InvalidTrack { id });
        }
        self.emit_queue_changed();
        Ok(())
    }

    /// Append many tracks and return how many were accepted.
    pub fn add_all_to_queue(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let (mut total, mut added) = (0usize, 0usize);
        for track in tracks {
            total += 1;
            if self.queue.push(track) {
                added += 1;
            }
        }
        if added > 0 {
            self.emit_queue_changed();
        }
        info!("added {added} of {total} tracks to queue");
        added
    }

    // ---- transport -----------------------------------------------------

    /// Load `track` into the sink and ask it to play.
    ///
    /// Returns once the request is issued; the outcome arrives later through
    /// [`Player::handle_sink_event`].
    pub fn play_track(&mut self, track: &Track) -> Result<(), PlaybackError> {
        let Some(url) = track.playable_url().map(str::to_string) else {
            error!("refusing to play {:?}: missing url", track.id);
            return self.fail(PlaybackError::InvalidTrack {
                id: track.id.clone(),
            });
        };

        info!("playing {} ({url})", track.display());
        self.progress.cancel_drag();
        self.sink.set_source(&url);
        self.now_playing = Some(track.clone());
        self.emit(PlayerEvent::NowPlaying(track.clone()));
        self.request_play(url);
        Ok(())
    }

    fn request_play(&mut self, url: String) {
        self.generation += 1;
        let generation = self.generation;
        self.pending = Some(PendingPlay { generation, url });
        self.sink.request_play(generation);
    }

    fn pause(&mut self) {
        // A later pause beats any resume still in flight.
        self.generation += 1;
        self.pending = None;
        self.sink.pause();
        self.set_playing(false);
        debug!("paused");
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlaybackError> {
        let Some(url) = self.sink.source().map(str::to_string) else {
            return match self.queue.current().cloned() {
                Some(track) => self.play_track(&track),
                None => {
                    warn!("queue is empty - nothing to play");
                    self.fail(PlaybackError::EmptyQueue)
                }
            };
        };

        if self.sink.is_paused() {
            debug!("resuming");
            self.request_play(url);
        } else {
            self.pause();
        }
        Ok(())
    }

    fn play_direction(&mut self, direction: Direction) -> Result<(), PlaybackError> {
        let Some(track) = self.queue.advance(direction, self.shuffled).cloned() else {
            warn!("queue is empty - cannot skip {direction:?}");
            return self.fail(PlaybackError::EmptyQueue);
        };
        self.emit_queue_changed();
        self.play_track(&track)
    }

    pub fn play_next(&mut self) -> Result<(), PlaybackError> {
        self.play_direction(Direction::Next)
    }

    pub fn play_previous(&mut self) -> Result<(), PlaybackError> {
        self.play_direction(Direction::Previous)
    }

    /// Play the queue entry at `index`; out-of-range indices are ignored.
    pub fn play_from_queue(&mut self, index: usize) -> Result<(), PlaybackError> {
        if !self.queue.jump_to(index) {
            debug!("ignoring queue index {index} (len {})", self.queue.len());
            return Ok(());
        }
        self.emit_queue_changed();
        match self.queue.current().cloned() {
            Some(track) => self.play_track(&track),
            None => Ok(()),
        }
    }

    /// Replace the queue and start at its first playable track.
    pub fn play_all(&mut self, tracks: Vec<Track>) -> Result<(), PlaybackError> {
        self.set_queue(tracks);
        match self.queue.current().cloned() {
            Some(track) => self.play_track(&track),
            None => {
                warn!("no playable tracks to play");
                self.fail(PlaybackError::EmptyQueue)
            }
        }
    }

    /// Resolve `id` through `resolver` and play the result.
    pub fn play_by_id(
        &mut self,
        resolver: &dyn TrackResolver,
        id: &str,
    ) -> Result<(), PlaybackError> {
        match resolver.resolve(id) {
            Some(track) => self.play_track(&track),
            None => {
                warn!("could not resolve track {id:?}");
                self.fail(PlaybackError::UnknownTrack(id.to_string()))
            }
        }
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffled = !self.shuffled;
        info!("shuffle: {}", if self.shuffled { "ON" } else { "OFF" });
        self.emit(PlayerEvent::ShuffleChanged(self.shuffled));
    }

    pub fn cycle_repeat_mode(&mut self) {
        self.repeat_mode = self.repeat_mode.next();
        info!("repeat mode: {}", self.repeat_mode.label());
        self.emit(PlayerEvent::RepeatModeChanged(self.repeat_mode));
    }

    /// Set the output volume; values outside [0, 1] are clamped.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
        self.sink.set_volume(self.volume);
        self.emit(PlayerEvent::VolumeChanged(self.volume));
    }

    // ---- seeking -------------------------------------------------------

    /// Jump to `ratio` of the loaded track. Needs a known duration.
    ///
    /// During a drag the ratio only moves the capture; the sink follows on
    /// [`Player::end_drag`].
    pub fn seek(&mut self, ratio: f64) -> Result<(), PlaybackError> {
        if self.progress.is_dragging() {
            self.drag_to(ratio);
            return Ok(());
        }
        let duration = self.sink.duration();
        let Some(target) = self.progress.seek_target(ratio, duration) else {
            debug!("seek to {ratio} ignored: duration unknown");
            return self.fail(PlaybackError::InvalidSeekTarget);
        };
        self.sink.set_current_time(target);
        if let Some(d) = duration {
            self.emit(PlayerEvent::Progress {
                ratio: target / d,
                elapsed: format_time(target),
            });
        }
        Ok(())
    }

    /// Seek relative to the current position by `seconds`.
    pub fn seek_by(&mut self, seconds: f64) -> Result<(), PlaybackError> {
        match self.sink.duration() {
            Some(d) if d.is_finite() && d > 0.0 => {
                let ratio = (self.sink.current_time() + seconds) / d;
                self.seek(ratio)
            }
            _ => self.fail(PlaybackError::InvalidSeekTarget),
        }
    }

    /// Capture the progress bar for a drag gesture.
    pub fn begin_drag(&mut self) {
        self.progress.begin_drag();
    }

    /// Move the active drag to `ratio`; the bar previews the position but
    /// the sink is left alone until [`Player::end_drag`].
    pub fn drag_to(&mut self, ratio: f64) {
        let Some(ratio) = self.progress.drag_to(ratio) else {
            return;
        };
        let elapsed = match self.sink.duration() {
            Some(d) if d.is_finite() => format_time(ratio * d),
            _ => format_time(0.0),
        };
        self.emit(PlayerEvent::Progress { ratio, elapsed });
    }

    /// Release the drag and commit its last position.
    pub fn end_drag(&mut self) -> Result<(), PlaybackError> {
        match self.progress.end_drag() {
            Some(ratio) => self.seek(ratio),
            None => Ok(()),
        }
    }

    // ---- sink events ---------------------------------------------------

    /// Drain and handle everything the sink reported since the last call.
    pub fn pump(&mut self) {
        for event in self.sink.poll_events() {
            self.handle_sink_event(event);
        }
    }

    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::Play => self.set_playing(true),
            SinkEvent::Pause => self.set_playing(false),
            SinkEvent::Ended => self.on_ended(),
            SinkEvent::TimeUpdate { current, duration } => {
                if let Some(update) = self.progress.on_time_tick(current, duration) {
                    self.emit(PlayerEvent::Progress {
                        ratio: update.ratio,
                        elapsed: update.elapsed,
                    });
                }
            }
            SinkEvent::LoadedMetadata { duration } => {
                let total = self.progress.on_loaded_metadata(duration);
                self.emit(PlayerEvent::DurationChanged(total));
            }
            SinkEvent::Error(fault) => {
                error!("player error: {fault}");
                let playing = !self.sink.is_paused();
                self.set_playing(playing);
            }
            SinkEvent::PlayResolved { generation, result } => {
                self.on_play_resolved(generation, result);
            }
        }
    }

    fn on_play_resolved(&mut self, generation: Generation, result: Result<(), SinkFault>) {
        let current = matches!(&self.pending, Some(p) if p.generation == generation);
        if !current {
            debug!("discarding stale play completion (generation {generation})");
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };
        if self.sink.source() != Some(pending.url.as_str()) {
            debug!("discarding play completion for {}: source changed", pending.url);
            return;
        }

        match result {
            Ok(()) => {
                let playing = !self.sink.is_paused();
                self.set_playing(playing);
            }
            Err(fault) => {
                let track_id = self
                    .now_playing
                    .as_ref()
                    .map(|t| t.id.clone())
                    .unwrap_or_default();
                error!("error playing {}: {fault}", pending.url);
                self.last_error = Some(PlaybackError::SinkRejected(fault));
                self.set_playing(false);
                self.emit(PlayerEvent::PlaybackFailed { track_id, fault });
            }
        }
    }

    /// Handle the end of the loaded track.
    pub fn on_ended(&mut self) {
        if self.repeat_mode == RepeatMode::One {
            if let Some(url) = self.sink.source().map(str::to_string) {
                debug!("repeating {url}");
                self.sink.set_current_time(0.0);
                self.request_play(url);
            }
            return;
        }

        if self.stop_at_queue_end
            && self.repeat_mode == RepeatMode::None
            && !self.shuffled
            && self.queue.is_last()
        {
            info!("reached end of queue");
            self.set_playing(false);
            return;
        }

        match self.queue.advance(Direction::Next, self.shuffled).cloned() {
            Some(track) => {
                self.emit_queue_changed();
                // Failures are logged and recorded by play_track.
                let _ = self.play_track(&track);
            }
            None => self.unload(),
        }
    }

    fn unload(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.progress.cancel_drag();
        self.sink.clear_source();
        self.now_playing = None;
        self.set_playing(false);
        info!("queue exhausted; nothing loaded");
        self.emit(PlayerEvent::Emptied);
    }

    // ---- accessors -----------------------------------------------------

    /// The queue entry under the current position, once anything has been
    /// loaded into the sink.
    pub fn current_track(&self) -> Option<&Track> {
        self.now_playing.as_ref()?;
        self.queue.current()
    }

    /// The track whose source is loaded into the sink.
    pub fn now_playing(&self) -> Option<&Track> {
        self.now_playing.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn state(&self) -> TransportState {
        match (self.sink.source(), self.playing) {
            (None, _) => TransportState::Empty,
            (Some(_), true) => TransportState::Playing,
            (Some(_), false) => TransportState::Paused,
        }
    }

    /// An owned copy of the queue.
    pub fn queue_snapshot(&self) -> Vec<Track> {
        self.queue.snapshot()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_seeking(&self) -> bool {
        self.progress.is_dragging()
    }

    /// The most recent condition an operation reported.
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    pub(crate) fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
