//! Progress bar synchronization.
//!
//! Converts sink position reports into a ratio for rendering and converts
//! seek gestures back into a position. A drag gesture owns the bar while it
//! is active: position reports are ignored until the drag ends.

/// A visual progress update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub ratio: f64,
    pub elapsed: String,
}

/// Pointer capture for one drag gesture on the seek control.
#[derive(Debug, Default)]
struct DragCapture {
    last_ratio: Option<f64>,
}

#[derive(Debug, Default)]
pub struct Progress {
    drag: Option<DragCapture>,
}

fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a position report to a progress update, unless the duration is
    /// unknown or a drag currently owns the bar.
    pub fn on_time_tick(&self, current: f64, duration: f64) -> Option<ProgressUpdate> {
        if self.is_dragging() {
            return None;
        }
        let duration = known_duration(duration)?;
        Some(ProgressUpdate {
            ratio: clamp_ratio(current / duration),
            elapsed: format_time(current),
        })
    }

    /// Formatted total duration; unknown durations render as `0:00`.
    pub fn on_loaded_metadata(&self, duration: f64) -> String {
        format_time(duration)
    }

    /// Position in seconds for `ratio` of `duration`, or `None` when the
    /// duration is not usable.
    pub fn seek_target(&self, ratio: f64, duration: Option<f64>) -> Option<f64> {
        let duration = known_duration(duration?)?;
        Some(clamp_ratio(ratio) * duration)
    }

    /// Start a drag gesture. Any capture left over from an earlier gesture is
    /// replaced.
    pub fn begin_drag(&mut self) {
        self.drag = Some(DragCapture::default());
    }

    /// Record the pointer position of the active drag. Returns the clamped
    /// ratio, or `None` when no drag is active.
    pub fn drag_to(&mut self, ratio: f64) -> Option<f64> {
        let capture = self.drag.as_mut()?;
        let ratio = clamp_ratio(ratio);
        capture.last_ratio = Some(ratio);
        Some(ratio)
    }

    /// End the drag gesture and hand back the ratio to commit, if the pointer
    /// moved during the drag.
    pub fn end_drag(&mut self) -> Option<f64> {
        self.drag.take().and_then(|c| c.last_ratio)
    }

    /// Drop any active gesture without committing it.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

/// Render seconds as `M:SS`. Minutes are unbounded; NaN, negative and
/// infinite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
