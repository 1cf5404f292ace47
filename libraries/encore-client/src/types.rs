//! Configuration and result types for the hosted-backend client.

use encore_core::VoteKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for connecting to the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL (e.g., "https://xyz.supabase.co")
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Signed-in user's access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl BackendConfig {
    /// Create a new config with URL and anon key.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Attach a user access token.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// Offline cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of cached responses kept in memory
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Directory for on-disk copies; memory only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_capacity() -> usize {
    256
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            directory: None,
        }
    }
}

// =============================================================================
// Read results
// =============================================================================

/// Where a read result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Fresh from the backend
    Remote,
    /// Backend failed; this is the last cached copy
    Cache,
}

/// A read result tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> Fetched<T> {
    pub(crate) fn remote(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Remote,
        }
    }

    pub(crate) fn cached(data: T) -> Self {
        Self {
            data,
            origin: DataOrigin::Cache,
        }
    }

    /// Served from the offline cache
    pub fn is_stale(&self) -> bool {
        self.origin == DataOrigin::Cache
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

// =============================================================================
// Mutation outcomes
// =============================================================================

/// Result of a follow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
}

/// Result of an unfollow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Unfollowed,
    NotFollowing,
}

/// Result of toggling a hot/not vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// No previous vote; this one was recorded
    Added(VoteKind),
    /// Same vote again; it was withdrawn
    Removed(VoteKind),
    /// Opposite vote replaced the previous one
    Switched { from: VoteKind, to: VoteKind },
}
