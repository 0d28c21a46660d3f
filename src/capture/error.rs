/// Result alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Shown while no recording capability exists. Not tied to any attempt.
pub const UNSUPPORTED_MESSAGE: &str =
    "Perekaman video tidak didukung: encoder WebM tidak tersedia di sistem ini.";
/// Shown when the capability exists but refused to start.
pub const START_FAILURE_MESSAGE: &str = "Perekaman video tidak dapat dimulai. Coba lagi.";
/// Shown when a recording faulted midway.
pub const RUNTIME_FAULT_MESSAGE: &str = "Terjadi kendala saat merekam video. Coba lagi.";

/// Failures of a capture attempt.
///
/// Every variant is terminal for its session; a new `start` fully resets.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No recording capability is available at all.
    #[error("no recording capability is available")]
    CapabilityUnsupported,

    /// The capability exists but the recorder failed to initialize.
    #[error("recorder failed to start: {0}")]
    StartFailure(String),

    /// The recorder reported a fault while recording.
    #[error("recording fault: {0}")]
    RuntimeFault(String),
}

impl CaptureError {
    /// Localized text for the error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CapabilityUnsupported => UNSUPPORTED_MESSAGE,
            Self::StartFailure(_) => START_FAILURE_MESSAGE,
            Self::RuntimeFault(_) => RUNTIME_FAULT_MESSAGE,
        }
    }
}
