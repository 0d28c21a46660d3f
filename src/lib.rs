//! Taman renders a procedurally animated park scene and records fixed-length WebM clips of it.
//!
//! - [`SceneRenderer`] draws one frame as a pure function of elapsed time onto a [`Surface`]
//! - [`AnimationDriver`] keeps a surface sized to its container and renders it every frame
//! - [`CaptureController`] runs the 10 second capture state machine against a
//!   [`CaptureBackend`] such as [`FfmpegBackend`] or [`InMemoryBackend`]
//! - [`ParkStudio`] wires both onto one frame callback; [`record_clip`] records a whole clip
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Timed capture state machine, recorders and result blobs.
pub mod capture;
/// Recording backends that produce real video.
pub mod encode;
/// CPU rasterization.
pub mod render;
/// The animated park scene.
pub mod scene;
/// Clocks, the frame loop and the animation driver.
pub mod session;
/// Animation and capture wired together.
pub mod studio;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, MIN_SURFACE_HEIGHT, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{TamanError, TamanResult};
pub use crate::foundation::math::ease_in_out_cosine;

pub use crate::capture::blob::{BlobStore, BlobUrl, DOWNLOAD_FILE_NAME, VideoBlob};
pub use crate::capture::controller::{CaptureController, RECORDING_DURATION, TIMESLICE};
pub use crate::capture::error::{CaptureError, CaptureResult};
pub use crate::capture::recorder::{
    CaptureBackend, InMemoryBackend, InMemoryStats, Recorder, RecorderEvent, RecorderEventKind,
    RecorderRequest, SessionId,
};
pub use crate::capture::status::{CaptureSnapshot, CaptureStatus};
pub use crate::encode::ffmpeg::{FfmpegBackend, FfmpegBackendOpts, is_ffmpeg_on_path};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::surface::Surface;
pub use crate::scene::SceneRenderer;
pub use crate::session::animation::AnimationDriver;
pub use crate::session::clock::{Clock, ManualClock, SystemClock};
pub use crate::session::frame_loop::{CancelToken, FrameLoop, FrameLoopOpts};
pub use crate::studio::{ParkStudio, record_clip, record_clip_with_clock};
