use crate::capture::blob::{BlobStore, BlobUrl, VideoBlob};
use crate::capture::error::{CaptureError, CaptureResult, UNSUPPORTED_MESSAGE};
use crate::capture::recorder::{
    CaptureBackend, Recorder, RecorderEvent, RecorderEventKind, RecorderRequest, SessionId,
    negotiate_mime_type,
};
use crate::capture::status::{CaptureSnapshot, CaptureStatus};
use crate::capture::stream::{STREAM_FPS, SurfaceStream};
use crate::foundation::core::{Canvas, Fps};
use crate::render::frame::FrameRGBA;
use crate::render::surface::Surface;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Length of every capture.
pub const RECORDING_DURATION: Duration = Duration::from_secs(10);
/// Cadence at which recorders deliver encoded data.
pub const TIMESLICE: Duration = Duration::from_millis(200);

struct ActiveSession {
    id: SessionId,
    recorder: Box<dyn Recorder>,
    started_at: Duration,
    stream: SurfaceStream,
    chunks: Vec<Vec<u8>>,
    stop_requested: bool,
}

/// Drives fixed-length recordings of the rendered surface.
///
/// The controller is a state machine fed by three inputs: user actions (`start`, `stop`), the
/// frame loop (`feed`, `tick`) and recorder events. Recorder events are drained from an internal
/// channel on every `tick`, or may be delivered directly with [`Self::handle_event`]. Events from
/// any session other than the active one are ignored.
///
/// At most one session is active. Starting again tears the previous one down first and releases
/// any earlier result.
pub struct CaptureController {
    backend: Box<dyn CaptureBackend>,
    supported: bool,

    status: CaptureStatus,
    progress: f64,
    elapsed_ms: u64,
    error: Option<CaptureError>,

    active: Option<ActiveSession>,
    last_session: u64,
    events_tx: Sender<RecorderEvent>,
    events_rx: Receiver<RecorderEvent>,

    blobs: BlobStore,
    result: Option<BlobUrl>,

    subscribers: Vec<Sender<CaptureSnapshot>>,
    published: Option<CaptureSnapshot>,
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("supported", &self.supported)
            .field("status", &self.status)
            .field("progress", &self.progress)
            .field("session", &self.session_id())
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl CaptureController {
    /// Build a controller over `backend`. Availability is checked here, once.
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        let supported = backend.is_available();
        if !supported {
            tracing::warn!("no recording capability available; capture disabled");
        }
        let (events_tx, events_rx) = mpsc::channel();
        let mut controller = Self {
            backend,
            supported,
            status: CaptureStatus::Idle,
            progress: 0.0,
            elapsed_ms: 0,
            error: None,
            active: None,
            last_session: 0,
            events_tx,
            events_rx,
            blobs: BlobStore::new(),
            result: None,
            subscribers: Vec::new(),
            published: None,
        };
        controller.published = Some(controller.snapshot());
        controller
    }

    /// Whether a recording capability exists.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Current state.
    pub fn status(&self) -> CaptureStatus {
        self.status
    }

    /// Elapsed fraction of [`RECORDING_DURATION`], in `[0, 1]`, never decreasing within a session.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Milliseconds since the current session started.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Failure of the last attempt.
    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    /// Banner text: the attempt's error, else the persistent unsupported notice.
    pub fn displayed_error(&self) -> Option<&'static str> {
        self.error
            .as_ref()
            .map(CaptureError::user_message)
            .or((!self.supported).then_some(UNSUPPORTED_MESSAGE))
    }

    /// Whether a start action should be offered.
    pub fn is_start_enabled(&self) -> bool {
        self.status.is_start_enabled(self.supported)
    }

    /// Active session, if recording.
    pub fn session_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(|s| s.id)
    }

    /// Whether the active session has been asked to stop.
    pub fn is_stop_requested(&self) -> bool {
        self.active.as_ref().is_some_and(|s| s.stop_requested)
    }

    /// Reference to the finished video, once `done`.
    pub fn result_url(&self) -> Option<&BlobUrl> {
        self.result.as_ref()
    }

    /// The finished video, once `done`.
    pub fn result(&self) -> Option<Arc<VideoBlob>> {
        self.result.as_ref().and_then(|url| self.blobs.resolve(url))
    }

    /// Look up any reference minted by this controller that is still live.
    pub fn resolve(&self, url: &BlobUrl) -> Option<Arc<VideoBlob>> {
        self.blobs.resolve(url)
    }

    /// Number of live result references (0 or 1).
    pub fn live_blob_count(&self) -> usize {
        self.blobs.live_count()
    }

    /// Current state as a snapshot.
    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            status: self.status,
            label: self.status.label().to_string(),
            progress: self.progress,
            elapsed_ms: self.elapsed_ms,
            error: self.displayed_error().map(str::to_string),
            result_url: self.result.clone(),
            supported: self.supported,
        }
    }

    /// Receive a snapshot now and after every change.
    pub fn subscribe(&mut self) -> Receiver<CaptureSnapshot> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.snapshot());
        self.subscribers.push(tx);
        rx
    }

    /// Begin a new session recording `canvas`-sized frames, starting at `now`.
    ///
    /// Any session in flight is cancelled and any previous result is released first. Without a
    /// recording capability this is a no-op returning [`CaptureError::CapabilityUnsupported`].
    #[tracing::instrument(skip(self), fields(width = canvas.width, height = canvas.height))]
    pub fn start(&mut self, now: Duration, canvas: Canvas) -> CaptureResult<SessionId> {
        if !self.supported {
            tracing::warn!("capture start ignored: unsupported");
            return Err(CaptureError::CapabilityUnsupported);
        }

        self.discard_session();
        self.pump();
        self.release_result();
        self.progress = 0.0;
        self.elapsed_ms = 0;
        self.error = None;

        self.last_session += 1;
        let id = SessionId(self.last_session);
        let mime_type = negotiate_mime_type(self.backend.as_ref());
        let fps = Fps {
            num: STREAM_FPS,
            den: 1,
        };
        let req = RecorderRequest {
            session: id,
            mime_type: mime_type.map(str::to_string),
            canvas,
            fps,
            timeslice: TIMESLICE,
        };

        let recorder = match self.backend.open(req, self.events_tx.clone()) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(session = %id, error = %err, "recorder failed to start");
                self.status = CaptureStatus::Error;
                self.error = Some(err.clone());
                self.publish();
                return Err(err);
            }
        };

        tracing::info!(session = %id, mime_type = recorder.mime_type(), "capture started");
        self.active = Some(ActiveSession {
            id,
            recorder,
            started_at: now,
            stream: SurfaceStream::new(canvas, fps, now).with_duration(RECORDING_DURATION),
            chunks: Vec::new(),
            stop_requested: false,
        });
        self.status = CaptureStatus::Recording;
        self.publish();
        Ok(id)
    }

    /// Ask the active recorder to finish. Returns `false` when there is nothing to stop.
    pub fn stop(&mut self) -> bool {
        if self.status != CaptureStatus::Recording {
            return false;
        }
        let Some(s) = self.active.as_mut() else {
            return false;
        };
        if s.stop_requested {
            return false;
        }
        s.stop_requested = true;
        tracing::info!(session = %s.id, "capture stop requested");
        s.recorder.stop();
        true
    }

    /// Per-frame update: drain recorder events, advance progress, auto-stop at the deadline.
    pub fn tick(&mut self, now: Duration) {
        self.pump();
        if self.status == CaptureStatus::Recording
            && let Some(s) = self.active.as_ref()
        {
            let elapsed = now.saturating_sub(s.started_at);
            self.elapsed_ms = elapsed.as_millis() as u64;
            let fraction = (elapsed.as_secs_f64() / RECORDING_DURATION.as_secs_f64()).min(1.0);
            self.progress = self.progress.max(fraction);
            if elapsed >= RECORDING_DURATION {
                self.stop();
                self.pump();
            }
        }
        self.publish();
    }

    /// Offer the surface's current pixels to the recording stream.
    pub fn feed(&mut self, now: Duration, surface: &Surface) {
        self.feed_with(now, surface.canvas(), || surface.snapshot());
    }

    /// Offer an already captured frame to the recording stream.
    pub fn feed_frame(&mut self, now: Duration, frame: &FrameRGBA) {
        self.feed_with(now, frame.canvas(), || frame.clone());
    }

    fn feed_with(&mut self, now: Duration, canvas: Canvas, grab: impl FnOnce() -> FrameRGBA) {
        if self.status != CaptureStatus::Recording {
            return;
        }
        let Some(s) = self.active.as_mut() else {
            return;
        };
        if s.stop_requested {
            return;
        }
        let due = s.stream.take_due(now);
        if due == 0 {
            return;
        }
        if !s.stream.accepts(canvas) {
            tracing::warn!(
                session = %s.id,
                expected = ?s.stream.canvas(),
                got = ?canvas,
                "dropping frame with mismatched size"
            );
            return;
        }
        let frame = grab();
        for _ in 0..due {
            if let Err(err) = s.recorder.push_frame(&frame) {
                let id = s.id;
                // The recorder may already have reported the fault itself.
                self.pump();
                if self.session_id() == Some(id) {
                    let msg = match err {
                        CaptureError::RuntimeFault(msg) | CaptureError::StartFailure(msg) => msg,
                        other => other.to_string(),
                    };
                    self.fault(id, msg);
                }
                return;
            }
        }
    }

    /// Drain pending recorder events.
    pub fn pump(&mut self) {
        while let Ok(ev) = self.events_rx.try_recv() {
            self.handle_event(ev);
        }
    }

    /// Apply one recorder event.
    pub fn handle_event(&mut self, ev: RecorderEvent) {
        let Some(active_id) = self.session_id() else {
            tracing::debug!(session = %ev.session, "ignoring event with no active session");
            return;
        };
        if ev.session != active_id {
            tracing::debug!(
                session = %ev.session,
                active = %active_id,
                "ignoring stale recorder event"
            );
            return;
        }
        match ev.kind {
            RecorderEventKind::Data(bytes) => {
                if let Some(s) = self.active.as_mut()
                    && !bytes.is_empty()
                {
                    s.chunks.push(bytes);
                }
            }
            RecorderEventKind::Stopped => self.finalize(),
            RecorderEventKind::Fault(msg) => self.fault(active_id, msg),
        }
    }

    /// Cancel any session in flight and release the result.
    pub fn teardown(&mut self) {
        self.discard_session();
        self.release_result();
        if self.status == CaptureStatus::Recording {
            self.status = CaptureStatus::Idle;
        }
        self.publish();
    }

    fn finalize(&mut self) {
        let Some(s) = self.active.take() else {
            return;
        };
        self.status = CaptureStatus::Processing;
        self.publish();

        let chunk_count = s.chunks.len();
        let blob = VideoBlob::from_chunks(s.recorder.mime_type(), s.chunks);
        let bytes = blob.len();
        self.release_result();
        self.result = Some(self.blobs.mint(blob));
        self.progress = 1.0;
        self.error = None;
        self.status = CaptureStatus::Done;
        tracing::info!(session = %s.id, chunks = chunk_count, bytes, "capture finished");
        self.publish();
    }

    fn fault(&mut self, session: SessionId, msg: String) {
        if let Some(mut s) = self.active.take() {
            s.recorder.cancel();
        }
        tracing::warn!(session = %session, error = %msg, "capture failed");
        self.status = CaptureStatus::Error;
        self.error = Some(CaptureError::RuntimeFault(msg));
        self.publish();
    }

    fn discard_session(&mut self) {
        if let Some(mut s) = self.active.take() {
            tracing::debug!(session = %s.id, chunks = s.chunks.len(), "discarding capture session");
            s.recorder.cancel();
        }
    }

    fn release_result(&mut self) {
        if let Some(url) = self.result.take() {
            self.blobs.revoke(&url);
            tracing::debug!(url = %url, "released capture result");
        }
    }

    fn publish(&mut self) {
        let snap = self.snapshot();
        if self.published.as_ref() == Some(&snap) {
            return;
        }
        self.subscribers.retain(|tx| tx.send(snap.clone()).is_ok());
        self.published = Some(snap);
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.discard_session();
        self.release_result();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/controller.rs"]
mod tests;
