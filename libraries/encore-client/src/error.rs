//! Error types for the hosted-backend client.

use encore_core::{EncoreError, ErrorKind};
use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend is offline or unreachable
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Backend returned an error response
    #[error("Backend error ({status}): {message}")]
    Backend {
        status: u16,
        /// Postgres/PostgREST error code, when present
        code: Option<String>,
        message: String,
    },

    /// Request needs a signed-in user
    #[error("Authentication required")]
    AuthRequired,

    /// Row-level security refused the request
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Row not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violated
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Domain error (validation and friends)
    #[error(transparent)]
    Domain(#[from] EncoreError),

    /// Invalid backend URL
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse backend response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// IO error in the offline cache
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Map a transport failure, separating "could not reach" from the rest
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err.to_string())
        } else {
            Self::Request(err)
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unreachable(_) => ErrorKind::NetworkUnavailable,
            Self::Request(e) if e.is_connect() || e.is_timeout() => ErrorKind::NetworkUnavailable,
            Self::Request(_) | Self::Backend { .. } | Self::ParseError(_) | Self::Io(_) => {
                ErrorKind::Backend
            }
            Self::AuthRequired | Self::Forbidden(_) => ErrorKind::PermissionDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::Domain(e) => e.kind(),
            Self::InvalidUrl(_) => ErrorKind::ValidationFailed,
        }
    }

    /// Whether a cached copy may stand in for the failed read
    pub fn allows_cache_fallback(&self) -> bool {
        self.kind().is_transient()
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            ClientError::Unreachable("refused".into()).kind(),
            ErrorKind::NetworkUnavailable
        );
        assert_eq!(ClientError::AuthRequired.kind(), ErrorKind::PermissionDenied);
        assert_eq!(
            ClientError::from(EncoreError::validation("title", "empty")).kind(),
            ErrorKind::ValidationFailed
        );
    }

    #[test]
    fn only_transient_errors_fall_back() {
        assert!(ClientError::Unreachable("down".into()).allows_cache_fallback());
        assert!(ClientError::Backend {
            status: 503,
            code: None,
            message: "unavailable".into()
        }
        .allows_cache_fallback());
        assert!(!ClientError::AuthRequired.allows_cache_fallback());
        assert!(!ClientError::not_found("Track", "t1").allows_cache_fallback());
    }
}
