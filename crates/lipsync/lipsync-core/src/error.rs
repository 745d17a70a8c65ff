//! Error types for the lip-sync core.

use serde::{Deserialize, Serialize};

use crate::viseme::VisemeId;

/// Error type covering every failure the core can report.
///
/// None of these are fatal to a playback session: loader failures collapse to
/// the fallback timeline inside [`crate::loader::load_cues`], and apply-step
/// failures degrade to a static mouth.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LipSyncError {
    /// Cue resource could not be retrieved (I/O, transport, missing file).
    #[error("cue resource unavailable: {reason}")]
    ResourceUnavailable { reason: String },

    /// Cue payload did not match any supported shape.
    #[error("malformed cue payload: {reason}")]
    MalformedPayload { reason: String },

    /// A cue referenced a viseme with no entry in the viseme table.
    #[error("viseme {id:?} has no entry in the viseme table")]
    MissingVisemeEntry { id: VisemeId },

    /// A viseme weight referenced a morph channel the loaded model does not drive.
    #[error("morph channel not found on model: {channel}")]
    MissingMouthTarget { channel: String },
}

impl LipSyncError {
    /// Get error category for logging/metrics.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ResourceUnavailable { .. } => "resource",
            Self::MalformedPayload { .. } => "payload",
            Self::MissingVisemeEntry { .. } => "table",
            Self::MissingMouthTarget { .. } => "rig",
        }
    }
}

impl From<std::io::Error> for LipSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::ResourceUnavailable {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for LipSyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload {
            reason: err.to_string(),
        }
    }
}
