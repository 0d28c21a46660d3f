use crate::capture::blob::BlobUrl;
use crate::foundation::error::TamanResult;
use anyhow::Context as _;

/// Lifecycle state of the current capture session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    /// Nothing recorded yet, or ready for another attempt.
    #[default]
    Idle,
    /// Frames are being consumed.
    Recording,
    /// Recording stopped; chunks are being finalized.
    Processing,
    /// A result blob is available.
    Done,
    /// The last attempt failed.
    Error,
}

impl CaptureStatus {
    /// Localized status readout.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Siap",
            Self::Recording => "Merekam",
            Self::Processing => "Memproses",
            Self::Done => "Selesai",
            Self::Error => "Gagal",
        }
    }

    /// Whether a start action should be offered in this state.
    pub fn is_start_enabled(self, supported: bool) -> bool {
        supported && self != Self::Recording
    }
}

/// Point-in-time view of a capture controller, published to subscribers on every change.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptureSnapshot {
    /// Current state.
    pub status: CaptureStatus,
    /// [`CaptureStatus::label`] of `status`.
    pub label: String,
    /// Elapsed fraction of the fixed recording duration, in `[0, 1]`.
    pub progress: f64,
    /// Milliseconds since the session started.
    pub elapsed_ms: u64,
    /// Text for the error banner, if any.
    pub error: Option<String>,
    /// Reference to the finished video once `done`.
    pub result_url: Option<BlobUrl>,
    /// Whether a recording capability exists.
    pub supported: bool,
}

impl CaptureSnapshot {
    /// Serialize for a UI bridge.
    pub fn to_json(&self) -> TamanResult<String> {
        Ok(serde_json::to_string(self).context("serialize capture snapshot")?)
    }
}
