//! The park page as an object: animation and capture wired onto one frame loop.

use crate::capture::blob::VideoBlob;
use crate::capture::controller::{CaptureController, RECORDING_DURATION};
use crate::capture::error::{CaptureError, CaptureResult};
use crate::capture::recorder::{CaptureBackend, SessionId};
use crate::capture::status::CaptureStatus;
use crate::foundation::error::{TamanError, TamanResult};
use crate::scene::SceneRenderer;
use crate::session::animation::AnimationDriver;
use crate::session::clock::{Clock, SystemClock};
use crate::session::frame_loop::{FrameLoop, FrameLoopOpts};
use std::ops::ControlFlow;
use std::time::Duration;

/// How long a stopped recorder may take to deliver its result.
const FINALIZE_GRACE: Duration = Duration::from_secs(30);

/// Animation driver and capture controller sharing one frame callback.
///
/// Every frame renders the scene, offers the surface to the capture stream and advances the
/// capture state machine, in that order.
pub struct ParkStudio {
    driver: AnimationDriver,
    capture: CaptureController,
}

impl ParkStudio {
    /// Mount the scene for `container_width` and attach `backend` for captures.
    pub fn mount(
        container_width: u32,
        renderer: SceneRenderer,
        backend: Box<dyn CaptureBackend>,
        now: Duration,
    ) -> TamanResult<Self> {
        Ok(Self {
            driver: AnimationDriver::mount(container_width, renderer, now)?,
            capture: CaptureController::new(backend),
        })
    }

    /// Run one frame at `now`.
    pub fn frame(&mut self, now: Duration) -> TamanResult<()> {
        self.driver.frame(now)?;
        self.capture.feed(now, self.driver.surface());
        self.capture.tick(now);
        Ok(())
    }

    /// Start a capture of the current surface.
    pub fn start_capture(&mut self, now: Duration) -> CaptureResult<SessionId> {
        let canvas = self.driver.surface().canvas();
        self.capture.start(now, canvas)
    }

    /// Stop the running capture early.
    pub fn stop_capture(&mut self) -> bool {
        self.capture.stop()
    }

    /// Forward a container width change.
    pub fn resize(&mut self, container_width: u32) -> TamanResult<bool> {
        self.driver.on_container_resize(container_width)
    }

    /// The animation side.
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// The capture side.
    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    /// Mutable capture side, e.g. for subscribing.
    pub fn capture_mut(&mut self) -> &mut CaptureController {
        &mut self.capture
    }

    /// Cancel any capture and release its result.
    pub fn teardown(&mut self) {
        self.capture.teardown();
    }
}

/// Record one full clip in real time and return it.
#[tracing::instrument(skip(renderer, backend))]
pub fn record_clip(
    container_width: u32,
    renderer: SceneRenderer,
    backend: Box<dyn CaptureBackend>,
    opts: FrameLoopOpts,
) -> TamanResult<VideoBlob> {
    record_clip_with_clock(container_width, renderer, backend, opts, SystemClock::new())
}

/// [`record_clip`] over an explicit clock.
pub fn record_clip_with_clock<C: Clock>(
    container_width: u32,
    renderer: SceneRenderer,
    backend: Box<dyn CaptureBackend>,
    opts: FrameLoopOpts,
    clock: C,
) -> TamanResult<VideoBlob> {
    let frame_loop = FrameLoop::new(clock, opts);
    let start = frame_loop.clock().now();
    let mut studio = ParkStudio::mount(container_width, renderer, backend, start)?;
    studio.start_capture(start)?;

    let deadline = start + RECORDING_DURATION + FINALIZE_GRACE;
    frame_loop.run(|now| {
        studio.frame(now)?;
        match studio.capture().status() {
            CaptureStatus::Done => Ok(ControlFlow::Break(())),
            CaptureStatus::Error => {
                let err = studio
                    .capture()
                    .error()
                    .cloned()
                    .unwrap_or(CaptureError::RuntimeFault("unknown".to_string()));
                Err(err.into())
            }
            _ if now > deadline => Err(TamanError::encode(
                "timed out waiting for the recorder to finalize",
            )),
            _ => Ok(ControlFlow::Continue(())),
        }
    })?;

    let blob = studio
        .capture()
        .result()
        .ok_or_else(|| TamanError::encode("capture finished without a result"))?;
    let blob = VideoBlob::clone(&blob);
    studio.teardown();
    Ok(blob)
}
