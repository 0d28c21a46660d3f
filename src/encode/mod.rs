//! Recording backends that produce real video.

/// WebM recording through the system `ffmpeg`.
pub mod ffmpeg;
