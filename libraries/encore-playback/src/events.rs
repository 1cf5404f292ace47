//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued inside
//! the session and drained by the UI layer:
//! - Track started (a load committed)
//! - Track finished (end of audio or end of preview window)
//! - Load failures
//! - Stops and queue replacements

use encore_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A track finished loading and is now the current track
    TrackStarted {
        track_id: TrackId,
        /// Playback is capped to the snippet window
        preview: bool,
    },

    /// The current track reached its end
    TrackFinished {
        track_id: TrackId,
        /// Ended because the snippet window ran out, not the audio
        preview_limit_reached: bool,
    },

    /// The audio resource for a track could not be acquired
    LoadFailed {
        track_id: TrackId,
        /// Error message
        message: String,
    },

    /// Playback stopped and the resource was released
    Stopped,

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
        /// New cursor
        index: Option<usize>,
    },
}
