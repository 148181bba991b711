//! An [`AudioSink`] that plays local files through `rodio`.
//!
//! Sources are decoded lazily on the first play request, so a bad file only
//! surfaces as a rejected play. Position reports are synthesized from
//! `Sink::get_pos` whenever the sink is polled.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lofty::prelude::AudioFile;
use log::{debug, warn};
use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::config::AudioSettings;

use super::error::PlaybackError;
use super::sink::{AudioSink, Generation, SinkEvent, SinkFault};

pub struct RodioSink {
    stream: OutputStream,
    sink: Option<Sink>,
    source: Option<String>,
    duration: Option<Duration>,
    volume: f32,
    ended: bool,
    /// Position to apply once the source is decoded again.
    pending_seek: Option<Duration>,
    tick_interval: Duration,
    last_tick: Instant,
    events: VecDeque<SinkEvent>,
}

/// Map a media locator to a local path. Only plain paths and `file://`
/// locators can be played.
fn local_path(url: &str) -> Result<PathBuf, SinkFault> {
    if let Some(rest) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if url.contains("://") {
        return Err(SinkFault::Unsupported);
    }
    Ok(PathBuf::from(url))
}

fn classify_io(err: &io::Error) -> SinkFault {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => SinkFault::Network,
        io::ErrorKind::Interrupted => SinkFault::Aborted,
        _ => SinkFault::Unknown,
    }
}

fn classify_decoder(err: &DecoderError) -> SinkFault {
    match err {
        DecoderError::UnrecognizedFormat => SinkFault::Unsupported,
        _ => SinkFault::Decode,
    }
}

/// Fall back to the container's tags when the decoder cannot tell the length.
fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}

fn secs_or_nan(d: Option<Duration>) -> f64 {
    d.map_or(f64::NAN, |d| d.as_secs_f64())
}

fn seek_position(seconds: f64) -> Duration {
    if seconds.is_finite() {
        Duration::from_secs_f64(seconds.max(0.0))
    } else {
        Duration::ZERO
    }
}

/// How a seek reaches the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeekPlan {
    /// The decoder is live; seek it now.
    Now(Duration),
    /// No live decoder (never loaded, or played out); seek after the next
    /// play request decodes the source again.
    AfterReload(Duration),
}

/// `played_out` is `None` when nothing is decoded yet.
fn plan_seek(played_out: Option<bool>, seconds: f64) -> SeekPlan {
    let target = seek_position(seconds);
    match played_out {
        Some(false) => SeekPlan::Now(target),
        Some(true) | None => SeekPlan::AfterReload(target),
    }
}

impl RodioSink {
    /// Open the default output device.
    pub fn open(settings: &AudioSettings) -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::OutputUnavailable(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would land
        // on top of the TUI.
        stream.log_on_drop(false);

        let tick_interval = Duration::from_millis(settings.tick_interval_ms.max(1));
        Ok(Self {
            stream,
            sink: None,
            source: None,
            duration: None,
            volume: 1.0,
            ended: false,
            pending_seek: None,
            tick_interval,
            last_tick: Instant::now(),
            events: VecDeque::new(),
        })
    }

    /// Decode `url` into a fresh, paused `Sink`.
    fn load(&self, url: &str) -> Result<(Sink, Option<Duration>), SinkFault> {
        let path = local_path(url)?;

        let file = File::open(&path).map_err(|e| {
            warn!("cannot open {}: {e}", path.display());
            classify_io(&e)
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| {
            warn!("cannot decode {}: {e}", path.display());
            classify_decoder(&e)
        })?;

        let duration = decoder.total_duration().or_else(|| probe_duration(&path));

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(decoder);
        sink.pause();
        Ok((sink, duration))
    }

    fn stop_current(&mut self) {
        if let Some(s) = self.sink.take() {
            let was_playing = !s.is_paused() && !s.empty();
            s.stop();
            if was_playing {
                self.events.push_back(SinkEvent::Pause);
            }
        }
        self.duration = None;
        self.ended = false;
        self.pending_seek = None;
    }
}

impl AudioSink for RodioSink {
    fn set_source(&mut self, url: &str) {
        self.stop_current();
        self.source = Some(url.to_string());
    }

    fn clear_source(&mut self) {
        self.stop_current();
        self.source = None;
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn request_play(&mut self, generation: Generation) {
        let Some(url) = self.source.clone() else {
            self.events.push_back(SinkEvent::PlayResolved {
                generation,
                result: Err(SinkFault::Aborted),
            });
            return;
        };

        // Nothing decoded yet, or the previous decode played out: start over.
        if self.sink.as_ref().is_none_or(|s| s.empty()) {
            match self.load(&url) {
                Ok((sink, duration)) => {
                    self.sink = Some(sink);
                    self.duration = duration;
                    self.events.push_back(SinkEvent::LoadedMetadata {
                        duration: secs_or_nan(duration),
                    });
                }
                Err(fault) => {
                    self.events.push_back(SinkEvent::Error(fault));
                    self.events.push_back(SinkEvent::PlayResolved {
                        generation,
                        result: Err(fault),
                    });
                    return;
                }
            }
        }

        if let Some(s) = &self.sink {
            if let Some(target) = self.pending_seek.take() {
                if let Err(e) = s.try_seek(target) {
                    warn!("seek to {:.1}s after reload failed: {e:?}", target.as_secs_f64());
                }
            }
            s.play();
        }
        self.ended = false;
        self.last_tick = Instant::now();
        self.events.push_back(SinkEvent::Play);
        self.events.push_back(SinkEvent::PlayResolved {
            generation,
            result: Ok(()),
        });
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            if !s.is_paused() {
                s.pause();
                self.events.push_back(SinkEvent::Pause);
            }
        }
    }

    fn is_paused(&self) -> bool {
        self.sink.as_ref().is_none_or(|s| s.is_paused())
    }

    fn current_time(&self) -> f64 {
        if let Some(target) = self.pending_seek {
            return target.as_secs_f64();
        }
        self.sink
            .as_ref()
            .map_or(0.0, |s| s.get_pos().as_secs_f64())
    }

    fn set_current_time(&mut self, seconds: f64) {
        if self.source.is_none() {
            return;
        }
        match plan_seek(self.sink.as_ref().map(|s| s.empty()), seconds) {
            SeekPlan::Now(target) => {
                self.pending_seek = None;
                if let Some(s) = &self.sink {
                    if let Err(e) = s.try_seek(target) {
                        warn!("seek to {:.1}s failed: {e:?}", target.as_secs_f64());
                    }
                }
            }
            SeekPlan::AfterReload(target) => {
                // A consumed decoder is rebuilt by the next play request.
                debug!("deferring seek to {:.1}s until reload", target.as_secs_f64());
                self.sink = None;
                self.pending_seek = Some(target);
            }
        }
    }

    fn duration(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = &self.sink {
            s.set_volume(volume);
        }
    }

    fn poll_events(&mut self) -> Vec<SinkEvent> {
        if let Some(s) = &self.sink {
            if !s.is_paused() {
                if s.empty() && !self.ended {
                    // Mirror a media element: pause at end of media, then end.
                    self.ended = true;
                    s.pause();
                    self.events.push_back(SinkEvent::Pause);
                    self.events.push_back(SinkEvent::Ended);
                } else if self.last_tick.elapsed() >= self.tick_interval {
                    self.last_tick = Instant::now();
                    self.events.push_back(SinkEvent::TimeUpdate {
                        current: s.get_pos().as_secs_f64(),
                        duration: secs_or_nan(self.duration),
                    });
                }
            }
        }
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_accepts_plain_and_file_urls() {
        assert_eq!(local_path("/music/a.mp3").unwrap(), PathBuf::from("/music/a.mp3"));
        assert_eq!(
            local_path("file:///music/a.mp3").unwrap(),
            PathBuf::from("/music/a.mp3")
        );
        assert_eq!(local_path("https://cdn/a.mp3"), Err(SinkFault::Unsupported));
    }

    #[test]
    fn io_errors_are_classified() {
        let not_found = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(classify_io(&not_found), SinkFault::Network);
        let interrupted = io::Error::from(io::ErrorKind::Interrupted);
        assert_eq!(classify_io(&interrupted), SinkFault::Aborted);
        let other = io::Error::other("boom");
        assert_eq!(classify_io(&other), SinkFault::Unknown);
    }

    #[test]
    fn seek_on_live_decoder_happens_now() {
        assert_eq!(plan_seek(Some(false), 12.5), SeekPlan::Now(Duration::from_millis(12_500)));
    }

    #[test]
    fn seek_on_played_out_decoder_waits_for_reload() {
        // Last track ended and stayed paused; a click at half of 200s must
        // survive the reload instead of restarting at 0:00.
        assert_eq!(
            plan_seek(Some(true), 100.0),
            SeekPlan::AfterReload(Duration::from_secs(100))
        );
        assert_eq!(plan_seek(None, 3.0), SeekPlan::AfterReload(Duration::from_secs(3)));
    }

    #[test]
    fn seek_targets_are_clamped_to_start() {
        assert_eq!(plan_seek(Some(false), -4.0), SeekPlan::Now(Duration::ZERO));
        assert_eq!(plan_seek(Some(false), f64::NAN), SeekPlan::Now(Duration::ZERO));
        assert_eq!(plan_seek(Some(true), f64::INFINITY), SeekPlan::AfterReload(Duration::ZERO));
    }

    #[test]
    fn missing_duration_reports_nan() {
        assert!(secs_or_nan(None).is_nan());
        assert_eq!(secs_or_nan(Some(Duration::from_millis(1500))), 1.5);
    }
}
