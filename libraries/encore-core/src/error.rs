//! Core error types for Encore

use thiserror::Error;

/// Result type alias using `EncoreError`
pub type Result<T> = std::result::Result<T, EncoreError>;

/// Coarse classification of a failure
///
/// Every crate-level error maps onto one of these so callers can decide
/// whether to retry, fall back to cached data, or surface the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The hosted backend could not be reached
    NetworkUnavailable,

    /// An audio (or other OS) resource could not be acquired
    ResourceAcquisitionFailed,

    /// The caller is not allowed to perform the operation
    PermissionDenied,

    /// Input was rejected before any network call
    ValidationFailed,

    /// The requested entity does not exist
    NotFound,

    /// The entity already exists
    Duplicate,

    /// The backend answered with an unexpected error
    Backend,
}

impl ErrorKind {
    /// Whether the failure is transient and a later retry may succeed
    pub fn is_transient(self) -> bool {
        matches!(self, Self::NetworkUnavailable | Self::Backend)
    }
}

/// Core error type for Encore
#[derive(Error, Debug)]
pub enum EncoreError {
    /// Domain validation rejected the input
    #[error("Validation failed on `{field}`: {reason}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human readable reason
        reason: String,
    },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity type name
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Network error
    #[error("Network unavailable: {0}")]
    Network(String),

    /// Audio resource could not be acquired
    #[error("Resource acquisition failed: {0}")]
    ResourceAcquisition(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl EncoreError {
    /// Create a validation error
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationFailed,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::Network(_) => ErrorKind::NetworkUnavailable,
            Self::ResourceAcquisition(_) => ErrorKind::ResourceAcquisitionFailed,
            Self::Serialization(_) | Self::Other(_) => ErrorKind::Backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_kind_and_message() {
        let err = EncoreError::validation("content", "must not be empty");
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(
            err.to_string(),
            "Validation failed on `content`: must not be empty"
        );
    }

    #[test]
    fn transient_kinds() {
        assert!(ErrorKind::NetworkUnavailable.is_transient());
        assert!(ErrorKind::Backend.is_transient());
        assert!(!ErrorKind::ValidationFailed.is_transient());
        assert!(!ErrorKind::Duplicate.is_transient());
    }

    #[test]
    fn not_found_display() {
        let err = EncoreError::not_found("Track", "t-1");
        assert_eq!(err.to_string(), "Track not found: t-1");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
