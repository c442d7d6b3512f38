//! Immutable byte payloads handed to the guest.
//!
//! The serialized model is read once per process and copied into every guest
//! instance that runs an inference. `ModelPayload` keeps it behind an
//! `Arc<[u8]>` so classifier clones and batches share one host copy.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::HostError;

/// Serialized model bytes plus their BLAKE3 digest.
///
/// The host never interprets the contents; the digest only identifies which
/// model a run used.
#[derive(Clone)]
pub struct ModelPayload {
    bytes: Arc<[u8]>,
    digest: blake3::Hash,
}

impl ModelPayload {
    /// Wrap model bytes already in memory.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        let digest = blake3::hash(&bytes);
        Self { bytes, digest }
    }

    /// Read a model file.
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let bytes = std::fs::read(path).map_err(|e| {
            HostError::Source(format!("cannot read model {}: {}", path.display(), e))
        })?;
        let payload = Self::new(bytes);
        tracing::info!(
            path = %path.display(),
            size = payload.len(),
            digest = %payload.short_digest(),
            "loaded model payload"
        );
        Ok(payload)
    }

    /// Raw model bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Full BLAKE3 digest of the model bytes.
    pub fn digest(&self) -> &blake3::Hash {
        &self.digest
    }

    /// First 16 hex characters of the digest, for log lines.
    pub fn short_digest(&self) -> String {
        let hex = self.digest.to_hex();
        hex.as_str()[..16].to_string()
    }
}

impl fmt::Debug for ModelPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelPayload")
            .field("len", &self.bytes.len())
            .field("digest", &self.short_digest())
            .finish()
    }
}
