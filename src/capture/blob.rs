//! Finished recordings and the revocable references handed out for them.

use crate::foundation::error::TamanResult;
use anyhow::Context as _;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name offered for download.
pub const DOWNLOAD_FILE_NAME: &str = "video-taman.webm";

/// A finished recording: the concatenated chunks of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoBlob {
    mime_type: String,
    bytes: Vec<u8>,
}

impl VideoBlob {
    /// Concatenate `chunks` in order into one blob tagged with `mime_type`.
    pub fn from_chunks(mime_type: impl Into<String>, chunks: Vec<Vec<u8>>) -> Self {
        let total = chunks.iter().map(Vec::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in chunks {
            bytes.extend_from_slice(&chunk);
        }
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Media type the recorder negotiated, e.g. `video/webm;codecs=vp9`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Container bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when no data was recorded.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the blob to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> TamanResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("failed to write video '{}'", path.display()))?;
        Ok(())
    }

    /// Write the blob as [`DOWNLOAD_FILE_NAME`] inside `dir` and return the full path.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> TamanResult<PathBuf> {
        let path = dir.as_ref().join(DOWNLOAD_FILE_NAME);
        self.write_to(&path)?;
        Ok(path)
    }
}

/// Opaque reference to a minted blob, shaped like `blob:taman/<n>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BlobUrl(String);

impl BlobUrl {
    /// The reference as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live blob references.
///
/// A reference resolves until it is revoked; numbers are never reused.
#[derive(Debug, Default)]
pub struct BlobStore {
    next: u64,
    live: HashMap<BlobUrl, Arc<VideoBlob>>,
}

impl BlobStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `blob` and return a fresh reference to it.
    pub fn mint(&mut self, blob: VideoBlob) -> BlobUrl {
        self.next += 1;
        let url = BlobUrl(format!("blob:taman/{}", self.next));
        self.live.insert(url.clone(), Arc::new(blob));
        url
    }

    /// Release `url`. Returns `false` if it was not live.
    pub fn revoke(&mut self, url: &BlobUrl) -> bool {
        self.live.remove(url).is_some()
    }

    /// Look up a live reference.
    pub fn resolve(&self, url: &BlobUrl) -> Option<Arc<VideoBlob>> {
        self.live.get(url).cloned()
    }

    /// Number of live references.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/blob.rs"]
mod tests;
