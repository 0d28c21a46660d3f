use crate::foundation::core::{Canvas, Fps};
use std::time::Duration;

/// Samples per second of the pixel stream handed to recorders.
pub const STREAM_FPS: u32 = 60;

/// Turns irregular frame-loop ticks into a fixed-rate sample stream.
///
/// Sample `k` is due at `started_at + k / fps`. When ticks arrive late, every missed sample is
/// filled by repeating the current frame, so a recorder consuming a fixed rate sees exactly one
/// sample per slot and the encoded duration matches wall time.
#[derive(Clone, Debug)]
pub struct SurfaceStream {
    canvas: Canvas,
    fps: Fps,
    started_at: Duration,
    emitted: u64,
    limit: Option<u64>,
}

impl SurfaceStream {
    /// Stream of `canvas`-sized samples starting at `started_at`.
    pub fn new(canvas: Canvas, fps: Fps, started_at: Duration) -> Self {
        Self {
            canvas,
            fps,
            started_at,
            emitted: 0,
            limit: None,
        }
    }

    /// Stop producing samples after `duration` of stream time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.limit = Some(self.fps.secs_to_frames_floor(duration.as_secs_f64()));
        self
    }

    /// Frame size the stream was opened with.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Sampling rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Samples produced (or skipped) so far.
    pub fn position(&self) -> u64 {
        self.emitted
    }

    /// Whether a frame of size `canvas` may enter the stream.
    pub fn accepts(&self, canvas: Canvas) -> bool {
        canvas == self.canvas
    }

    /// Number of samples to emit at `now`, advancing the stream past them.
    pub fn take_due(&mut self, now: Duration) -> u64 {
        let elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        let mut target = self.fps.secs_to_frames_floor(elapsed) + 1;
        if let Some(limit) = self.limit {
            target = target.min(limit);
        }
        if target <= self.emitted {
            return 0;
        }
        let due = target - self.emitted;
        self.emitted = target;
        if due > 1 {
            tracing::debug!(repeated = due - 1, "frame loop fell behind; repeating frame");
        }
        due
    }
}
