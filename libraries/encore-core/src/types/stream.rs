//! Live-stream announcements

use crate::error::{EncoreError, Result};
use crate::types::{ArtistId, StreamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An announced (or running) live stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamAnnouncement {
    pub id: StreamId,
    pub artist_id: ArtistId,
    pub title: String,
    pub stream_url: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub is_live: bool,
}

/// Data for announcing a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStreamAnnouncement {
    pub artist_id: ArtistId,
    pub title: String,
    pub stream_url: String,
    pub starts_at: DateTime<Utc>,
}

impl NewStreamAnnouncement {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(EncoreError::validation("title", "must not be empty"));
        }

        let url = self.stream_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(EncoreError::validation(
                "stream_url",
                "must start with http:// or https://",
            ));
        }

        Ok(())
    }
}
