//! Track domain type
use crate::types::{ArtistId, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A track as stored in the hosted `tracks` table
///
/// Immutable from the player's point of view; the counters are maintained
/// server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Owning artist
    pub artist_id: ArtistId,

    /// Track title
    pub title: String,

    /// Cover art reference
    #[serde(default)]
    pub cover_url: Option<String>,

    /// Audio resource reference
    pub audio_url: String,

    /// Full length in seconds
    #[serde(default)]
    pub duration: u32,

    /// Price in cents, `None` for free tracks
    #[serde(default)]
    pub price: Option<u32>,

    /// Non-purchasers may only hear the snippet
    #[serde(default)]
    pub is_snippet_only: bool,

    /// Snippet length in seconds
    #[serde(default)]
    pub snippet_duration: Option<u32>,

    #[serde(default)]
    pub play_count: u64,

    #[serde(default)]
    pub hot_count: u64,

    #[serde(default)]
    pub not_count: u64,

    #[serde(default)]
    pub purchase_count: u64,

    /// When the track was uploaded
    pub created_at: DateTime<Utc>,
}

/// Snippet length used when a snippet-only track does not declare one
pub const DEFAULT_SNIPPET_SECS: u32 = 30;

impl Track {
    /// Create a free track with minimal metadata
    pub fn new(
        artist_id: ArtistId,
        title: impl Into<String>,
        audio_url: impl Into<String>,
        duration_secs: u32,
    ) -> Self {
        Self {
            id: TrackId::generate(),
            artist_id,
            title: title.into(),
            cover_url: None,
            audio_url: audio_url.into(),
            duration: duration_secs,
            price: None,
            is_snippet_only: false,
            snippet_duration: None,
            play_count: 0,
            hot_count: 0,
            not_count: 0,
            purchase_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Get the track length as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration))
    }

    /// Whether the track must be bought before it can be heard in full
    pub fn is_paid(&self) -> bool {
        self.price.is_some_and(|p| p > 0)
    }

    /// Playback window for a listener
    ///
    /// Returns `Some(limit)` when the track is snippet-only and the listener
    /// has not purchased it; `None` means the whole track may be played.
    pub fn preview_limit(&self, purchased: bool) -> Option<Duration> {
        if !self.is_snippet_only || purchased {
            return None;
        }

        let secs = self
            .snippet_duration
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_SNIPPET_SECS);

        // A snippet longer than the track is just the track
        let secs = if self.duration > 0 {
            secs.min(self.duration)
        } else {
            secs
        };

        Some(Duration::from_secs(u64::from(secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet_track(snippet: Option<u32>, duration: u32) -> Track {
        let mut track = Track::new(ArtistId::new("a1"), "Song", "https://cdn/song.mp3", duration);
        track.is_snippet_only = true;
        track.snippet_duration = snippet;
        track.price = Some(199);
        track
    }

    #[test]
    fn free_track_has_no_preview_limit() {
        let track = Track::new(ArtistId::new("a1"), "Song", "https://cdn/song.mp3", 180);
        assert_eq!(track.preview_limit(false), None);
        assert!(!track.is_paid());
    }

    #[test]
    fn snippet_track_limited_until_purchased() {
        let track = snippet_track(Some(20), 180);
        assert_eq!(track.preview_limit(false), Some(Duration::from_secs(20)));
        assert_eq!(track.preview_limit(true), None);
        assert!(track.is_paid());
    }

    #[test]
    fn snippet_defaults_and_clamps() {
        assert_eq!(
            snippet_track(None, 180).preview_limit(false),
            Some(Duration::from_secs(u64::from(DEFAULT_SNIPPET_SECS)))
        );
        assert_eq!(
            snippet_track(Some(90), 45).preview_limit(false),
            Some(Duration::from_secs(45))
        );
    }

    #[test]
    fn deserializes_sparse_row() {
        let row = serde_json::json!({
            "id": "t1",
            "artist_id": "a1",
            "title": "Row",
            "audio_url": "https://cdn/row.mp3",
            "created_at": "2024-05-01T12:00:00Z"
        });

        let track: Track = serde_json::from_value(row).unwrap();
        assert_eq!(track.id.as_str(), "t1");
        assert_eq!(track.duration, 0);
        assert!(!track.is_snippet_only);
        assert_eq!(track.price, None);
    }
}
