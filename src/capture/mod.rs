//! Timed capture of the rendered surface into a WebM blob.
//!
//! [`CaptureController`] owns the session state machine
//! (`idle → recording → processing → done`, with `error` on failure). The encoder itself is a
//! [`CaptureBackend`]; [`InMemoryBackend`] is a deterministic stand-in and
//! [`crate::FfmpegBackend`] records real WebM through the system `ffmpeg`.

/// Finished recordings and their references.
pub mod blob;
/// The session state machine.
pub mod controller;
/// Capture failure taxonomy and user-facing messages.
pub mod error;
/// Recorder contract and the in-memory backend.
pub mod recorder;
/// Status values and snapshots.
pub mod status;
/// Fixed-rate sampling of the surface.
pub mod stream;
