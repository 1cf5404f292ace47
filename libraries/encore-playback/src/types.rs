//! Core types for playback management

use encore_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only view of the session state
///
/// Published on every state change; UI code subscribes instead of polling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Currently loaded track
    pub current_track: Option<Track>,

    pub is_playing: bool,

    /// A load is in flight
    pub is_loading: bool,

    /// Position in milliseconds, mirrored from the resource
    pub position_ms: u64,

    /// Duration in milliseconds, mirrored from the resource
    pub duration_ms: u64,

    /// Snippet window for the current track, if capped
    pub preview_limit_ms: Option<u64>,

    pub queue_len: usize,

    /// Queue cursor (`None` while the queue is empty)
    pub current_index: Option<usize>,
}

/// Result of a `play_track` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The track is loaded and playing
    Started,

    /// A later `play_track`, `stop_track` or `cleanup` won the race; the
    /// resource acquired by this call was released again
    Superseded,
}

/// Result of a skip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    /// The cursor moved and the new track was played
    Moved(PlayOutcome),

    /// Already at the first/last element; nothing changed
    AtBoundary,
}

/// Configuration for the playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How often loaded resources report progress (default: 500ms)
    pub progress_interval_ms: u64,
}

impl SessionConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.progress_interval(), Duration::from_millis(500));
    }

    #[test]
    fn config_fills_missing_fields() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }
}
