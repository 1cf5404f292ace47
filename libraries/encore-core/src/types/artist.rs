//! Artist types

use crate::types::ArtistId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An artist (streamer) page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub follower_count: u64,
    /// Currently streaming
    #[serde(default)]
    pub is_live: bool,
    pub created_at: DateTime<Utc>,
}
