use crate::foundation::core::Fps;
use crate::foundation::error::TamanResult;
use crate::session::clock::Clock;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Options for [`FrameLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLoopOpts {
    /// Callback cadence; defaults to 60 Hz.
    pub fps: Fps,
}

impl Default for FrameLoopOpts {
    fn default() -> Self {
        Self {
            fps: Fps { num: 60, den: 1 },
        }
    }
}

impl FrameLoopOpts {
    /// Set the cadence.
    pub fn with_fps(mut self, fps: Fps) -> Self {
        self.fps = fps;
        self
    }
}

/// Cancels a running [`FrameLoop`] from anywhere. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The pending frame is not run.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Single rescheduling callback driven at a fixed cadence.
///
/// Each frame receives the clock's current time. Frames that overrun their slot are not made up;
/// the next one is scheduled one interval after the late frame's deadline, or immediately.
pub struct FrameLoop<C: Clock> {
    clock: C,
    opts: FrameLoopOpts,
    cancel: CancelToken,
}

impl<C: Clock> FrameLoop<C> {
    /// Loop over `clock` with `opts`.
    pub fn new(clock: C, opts: FrameLoopOpts) -> Self {
        Self {
            clock,
            opts,
            cancel: CancelToken::new(),
        }
    }

    /// Token that stops this loop.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// The loop's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run until `on_frame` breaks, returns an error, or the loop is cancelled.
    ///
    /// Returns the number of frames run.
    pub fn run(
        &self,
        mut on_frame: impl FnMut(Duration) -> TamanResult<ControlFlow<()>>,
    ) -> TamanResult<u64> {
        let interval = self.opts.fps.frame_interval();
        let mut deadline = self.clock.now();
        let mut frames = 0u64;
        while !self.cancel.is_cancelled() {
            let now = self.clock.now();
            let flow = on_frame(now)?;
            frames += 1;
            if flow.is_break() {
                break;
            }
            deadline = (deadline + interval).max(self.clock.now());
            self.clock.sleep_until(deadline);
        }
        tracing::debug!(frames, cancelled = self.cancel.is_cancelled(), "frame loop ended");
        Ok(frames)
    }
}
