//! Feed post types

use crate::error::{EncoreError, Result};
use crate::types::{PostId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum post length in characters
pub const MAX_POST_CHARS: usize = 2000;

/// A post in the community feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    #[serde(default)]
    pub content: String,
    /// Attached image or video
    #[serde(default)]
    pub media_url: Option<String>,
    /// Shared track, if any
    #[serde(default)]
    pub track_id: Option<TrackId>,
    #[serde(default)]
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub author_id: UserId,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<TrackId>,
}

impl NewPost {
    /// Text-only post
    pub fn text(author_id: UserId, content: impl Into<String>) -> Self {
        Self {
            author_id,
            content: content.into(),
            media_url: None,
            track_id: None,
        }
    }

    /// Attach media
    #[must_use]
    pub fn with_media(mut self, media_url: impl Into<String>) -> Self {
        self.media_url = Some(media_url.into());
        self
    }

    /// Share a track
    #[must_use]
    pub fn with_track(mut self, track_id: TrackId) -> Self {
        self.track_id = Some(track_id);
        self
    }

    /// Check required fields
    ///
    /// A post needs either text or media, and the text must fit the limit.
    pub fn validate(&self) -> Result<()> {
        let has_text = !self.content.trim().is_empty();
        let has_media = self
            .media_url
            .as_deref()
            .is_some_and(|m| !m.trim().is_empty());

        if !has_text && !has_media {
            return Err(EncoreError::validation(
                "content",
                "a post needs text or media",
            ));
        }

        let chars = self.content.chars().count();
        if chars > MAX_POST_CHARS {
            return Err(EncoreError::validation(
                "content",
                format!("{} characters exceeds the {} limit", chars, MAX_POST_CHARS),
            ));
        }

        Ok(())
    }
}
