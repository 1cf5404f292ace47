//! Track catalog reads and play counting.

use super::TRACKS;
use crate::client::EncoreClient;
use crate::error::{ClientError, Result};
use crate::rest::Query;
use crate::types::Fetched;
use encore_core::{ArtistId, Track, TrackId};
use serde_json::json;
use tracing::debug;

/// Track client.
pub struct TracksApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> TracksApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    /// Newest tracks first.
    pub async fn list_recent(&self, limit: usize) -> Result<Fetched<Vec<Track>>> {
        let query = Query::new()
            .select("*")
            .order("created_at", true)
            .limit(limit);
        self.client.select_cached(TRACKS, &query).await
    }

    /// All tracks by one artist, newest first.
    pub async fn list_by_artist(&self, artist_id: &ArtistId) -> Result<Fetched<Vec<Track>>> {
        let query = Query::new()
            .select("*")
            .eq("artist_id", artist_id)
            .order("created_at", true);
        self.client.select_cached(TRACKS, &query).await
    }

    pub async fn get(&self, track_id: &TrackId) -> Result<Fetched<Track>> {
        let query = Query::new().select("*").eq("id", track_id).limit(1);
        let fetched = self.client.select_cached::<Track>(TRACKS, &query).await?;

        match fetched.data.into_iter().next() {
            Some(track) => Ok(Fetched {
                data: track,
                origin: fetched.origin,
            }),
            None => Err(ClientError::not_found("Track", track_id.as_str())),
        }
    }

    /// Bump the play counter through the `increment_play_count` function.
    pub async fn record_play(&self, track_id: &TrackId) -> Result<()> {
        debug!(track_id = %track_id, "Recording play");
        self.client
            .rpc("increment_play_count", &json!({ "track_id": track_id }))
            .await
    }
}
