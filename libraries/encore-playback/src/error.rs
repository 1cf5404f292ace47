//! Error types for playback management

use encore_core::ErrorKind;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio backend could not open the track's audio resource
    #[error("Failed to acquire audio resource {uri}: {reason}")]
    ResourceAcquisition { uri: String, reason: String },

    /// The platform refused access to audio output
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A transport call on an active handle failed
    #[error("Audio backend error: {0}")]
    Backend(String),

    /// Queue index out of bounds
    #[error("Index {index} out of bounds for queue of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl PlaybackError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResourceAcquisition { .. } | Self::Backend(_) => {
                ErrorKind::ResourceAcquisitionFailed
            }
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::IndexOutOfBounds { .. } => ErrorKind::ValidationFailed,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
