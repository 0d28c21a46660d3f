//! Contract between the capture controller and a recording capability.
//!
//! A [`CaptureBackend`] opens one [`Recorder`] per session. The recorder consumes frames and
//! reports back through [`RecorderEvent`]s sent on the channel it was opened with. Events may
//! arrive from other threads; each carries the [`SessionId`] it belongs to.

use crate::capture::error::{CaptureError, CaptureResult};
use crate::foundation::core::{Canvas, Fps};
use crate::render::frame::FrameRGBA;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Media types tried in order; `None` from [`negotiate_mime_type`] means "capability default".
pub const PREFERRED_MIME_TYPES: [&str; 2] = ["video/webm;codecs=vp9", "video/webm;codecs=vp8"];
/// Media type assumed when a recorder does not report one.
pub const DEFAULT_MIME_TYPE: &str = "video/webm";

/// Identifies one capture attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameters for opening a recorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecorderRequest {
    /// Session the recorder will tag its events with.
    pub session: SessionId,
    /// Negotiated media type, or `None` for the capability's default.
    pub mime_type: Option<String>,
    /// Frame size of the stream.
    pub canvas: Canvas,
    /// Sampling rate of the stream.
    pub fps: Fps,
    /// Cadence at which encoded data is delivered.
    pub timeslice: Duration,
}

/// Payload of a [`RecorderEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecorderEventKind {
    /// One encoded data segment, in arrival order.
    Data(Vec<u8>),
    /// The recorder finished; no more data follows.
    Stopped,
    /// The recorder failed; no more events follow.
    Fault(String),
}

/// Asynchronous notification from a recorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecorderEvent {
    /// Session that produced the event.
    pub session: SessionId,
    /// What happened.
    pub kind: RecorderEventKind,
}

impl RecorderEvent {
    /// Data segment event.
    pub fn data(session: SessionId, bytes: Vec<u8>) -> Self {
        Self {
            session,
            kind: RecorderEventKind::Data(bytes),
        }
    }

    /// Finalize event.
    pub fn stopped(session: SessionId) -> Self {
        Self {
            session,
            kind: RecorderEventKind::Stopped,
        }
    }

    /// Fault event.
    pub fn fault(session: SessionId, msg: impl Into<String>) -> Self {
        Self {
            session,
            kind: RecorderEventKind::Fault(msg.into()),
        }
    }
}

/// A recording capability.
pub trait CaptureBackend: Send {
    /// Whether recording is possible at all. Queried once, when a controller is built.
    fn is_available(&self) -> bool;

    /// Whether `mime_type` can be produced.
    fn is_type_supported(&self, mime_type: &str) -> bool;

    /// Open a recorder for `req`. Events go to `events`.
    fn open(
        &mut self,
        req: RecorderRequest,
        events: Sender<RecorderEvent>,
    ) -> CaptureResult<Box<dyn Recorder>>;
}

/// One open recording.
pub trait Recorder: Send {
    /// Media type of the produced data.
    fn mime_type(&self) -> &str;

    /// Consume one stream sample.
    fn push_frame(&mut self, frame: &FrameRGBA) -> CaptureResult<()>;

    /// Finish recording. Remaining data is delivered, followed by [`RecorderEventKind::Stopped`].
    fn stop(&mut self);

    /// Abandon the recording. No further events are delivered.
    fn cancel(&mut self);
}

/// Pick the first preferred media type the backend supports.
pub fn negotiate_mime_type(backend: &dyn CaptureBackend) -> Option<&'static str> {
    PREFERRED_MIME_TYPES
        .into_iter()
        .find(|m| backend.is_type_supported(m))
}

/// Counters shared between an [`InMemoryBackend`] and its recorders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryStats {
    /// Recorders opened.
    pub opened: u64,
    /// Recorders stopped normally.
    pub stopped: u64,
    /// Recorders cancelled.
    pub cancelled: u64,
    /// Frames consumed across all recorders.
    pub frames: u64,
    /// Last request seen by `open`.
    pub last_request: Option<RecorderRequest>,
}

/// Deterministic recording capability that "encodes" frames into small records.
///
/// Each frame becomes 8 bytes (`index: u32 LE`, `width: u16 LE`, `height: u16 LE`) after a 4-byte
/// EBML magic. Data is delivered whenever a timeslice worth of frames has accumulated.
#[derive(Clone, Debug)]
pub struct InMemoryBackend {
    available: bool,
    supported: Vec<String>,
    open_failure: Option<String>,
    fault_after_frames: Option<u64>,
    fault_first_session_only: bool,
    stats: Arc<Mutex<InMemoryStats>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Backend supporting both preferred media types.
    pub fn new() -> Self {
        Self {
            available: true,
            supported: PREFERRED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            open_failure: None,
            fault_after_frames: None,
            fault_first_session_only: false,
            stats: Arc::default(),
        }
    }

    /// Backend that reports no capability.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            supported: Vec::new(),
            ..Self::new()
        }
    }

    /// Restrict the supported media types.
    pub fn with_supported_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported = types.into_iter().map(Into::into).collect();
        self
    }

    /// Make every `open` fail with `msg`.
    pub fn with_open_failure(mut self, msg: impl Into<String>) -> Self {
        self.open_failure = Some(msg.into());
        self
    }

    /// Make recorders fault once they have consumed `frames` frames.
    pub fn with_fault_after_frames(mut self, frames: u64) -> Self {
        self.fault_after_frames = Some(frames);
        self
    }

    /// Like [`Self::with_fault_after_frames`], but only the first recorder opened faults.
    pub fn with_first_session_fault_after_frames(mut self, frames: u64) -> Self {
        self.fault_after_frames = Some(frames);
        self.fault_first_session_only = true;
        self
    }

    /// Shared counters, for inspection after the backend has been moved into a controller.
    pub fn stats(&self) -> Arc<Mutex<InMemoryStats>> {
        Arc::clone(&self.stats)
    }

    fn update(&self, f: impl FnOnce(&mut InMemoryStats)) {
        if let Ok(mut s) = self.stats.lock() {
            f(&mut s);
        }
    }
}

impl CaptureBackend for InMemoryBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.available && self.supported.iter().any(|s| s == mime_type)
    }

    fn open(
        &mut self,
        req: RecorderRequest,
        events: Sender<RecorderEvent>,
    ) -> CaptureResult<Box<dyn Recorder>> {
        if !self.available {
            return Err(CaptureError::CapabilityUnsupported);
        }
        if let Some(msg) = &self.open_failure {
            return Err(CaptureError::StartFailure(msg.clone()));
        }
        let mut first = false;
        self.update(|s| {
            first = s.opened == 0;
            s.opened += 1;
            s.last_request = Some(req.clone());
        });
        let fault_after_frames = self
            .fault_after_frames
            .filter(|_| first || !self.fault_first_session_only);

        let frames_per_slice =
            ((req.timeslice.as_secs_f64() * req.fps.as_f64()).round() as u64).max(1);
        Ok(Box::new(InMemoryRecorder {
            mime_type: req
                .mime_type
                .clone()
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            session: req.session,
            events,
            pending: EBML_MAGIC.to_vec(),
            pending_frames: 0,
            frames: 0,
            frames_per_slice,
            fault_after_frames,
            finished: false,
            backend: self.clone(),
        }))
    }
}

const EBML_MAGIC: [u8; 4] = [0x1a, 0x45, 0xdf, 0xa3];

struct InMemoryRecorder {
    mime_type: String,
    session: SessionId,
    events: Sender<RecorderEvent>,
    pending: Vec<u8>,
    pending_frames: u64,
    frames: u64,
    frames_per_slice: u64,
    fault_after_frames: Option<u64>,
    finished: bool,
    backend: InMemoryBackend,
}

impl InMemoryRecorder {
    fn emit(&self, ev: RecorderEvent) {
        // The controller may already be gone; nothing to report to then.
        let _ = self.events.send(ev);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let bytes = std::mem::take(&mut self.pending);
            self.emit(RecorderEvent::data(self.session, bytes));
        }
        self.pending_frames = 0;
    }
}

impl Recorder for InMemoryRecorder {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn push_frame(&mut self, frame: &FrameRGBA) -> CaptureResult<()> {
        if self.finished {
            return Err(CaptureError::RuntimeFault(
                "recorder is already finalized".to_string(),
            ));
        }
        if self.fault_after_frames == Some(self.frames) {
            self.finished = true;
            self.emit(RecorderEvent::fault(self.session, "injected encoder fault"));
            return Ok(());
        }

        self.pending
            .extend_from_slice(&(self.frames as u32).to_le_bytes());
        self.pending
            .extend_from_slice(&(frame.width as u16).to_le_bytes());
        self.pending
            .extend_from_slice(&(frame.height as u16).to_le_bytes());
        self.frames += 1;
        self.pending_frames += 1;
        self.backend.update(|s| s.frames += 1);

        if self.pending_frames >= self.frames_per_slice {
            self.flush();
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.flush();
        self.backend.update(|s| s.stopped += 1);
        self.emit(RecorderEvent::stopped(self.session));
    }

    fn cancel(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.pending.clear();
        self.backend.update(|s| s.cancelled += 1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/recorder.rs"]
mod tests;
