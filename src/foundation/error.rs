use crate::capture::error::CaptureError;

/// Crate-wide result alias.
pub type TamanResult<T> = Result<T, TamanError>;

/// Errors raised by rendering, driving and encoding.
///
/// Capture state machine failures keep their own taxonomy in [`CaptureError`] and are wrapped here
/// when they cross into the crate-level API.
#[derive(thiserror::Error, Debug)]
pub enum TamanError {
    /// Invalid input (sizes, options, buffers).
    #[error("validation error: {0}")]
    Validation(String),

    /// The drawing surface could not be acquired or resized.
    #[error("surface error: {0}")]
    Surface(String),

    /// Scene rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// Encoder process or muxing failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Capture session failure.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Anything else, usually I/O with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TamanError {
    /// Build a [`TamanError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TamanError::Surface`].
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`TamanError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TamanError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
