//! Artist follows.

use super::FOLLOWS;
use crate::client::EncoreClient;
use crate::error::{ClientError, Result};
use crate::rest::Query;
use crate::types::{FollowOutcome, UnfollowOutcome};
use encore_core::{ArtistId, Follow, UserId};
use serde_json::json;
use tracing::{debug, info};

/// Follow client.
pub struct FollowsApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> FollowsApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    fn pair(follower_id: &UserId, artist_id: &ArtistId) -> Query {
        Query::new()
            .eq("follower_id", follower_id)
            .eq("artist_id", artist_id)
    }

    pub async fn is_following(&self, follower_id: &UserId, artist_id: &ArtistId) -> Result<bool> {
        let query = Self::pair(follower_id, artist_id)
            .select("follower_id")
            .limit(1);
        let rows: Vec<serde_json::Value> = self.client.select(FOLLOWS, &query).await?;
        Ok(!rows.is_empty())
    }

    /// Follow an artist. Following twice is not an error.
    pub async fn follow(&self, follower_id: &UserId, artist_id: &ArtistId) -> Result<FollowOutcome> {
        if self.is_following(follower_id, artist_id).await? {
            debug!(follower_id = %follower_id, artist_id = %artist_id, "Already following");
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        let body = json!({ "follower_id": follower_id, "artist_id": artist_id });
        match self.client.insert::<_, Follow>(FOLLOWS, &body).await {
            Ok(_) => {
                info!(follower_id = %follower_id, artist_id = %artist_id, "Followed artist");
                Ok(FollowOutcome::Followed)
            }
            // lost a race with a concurrent follow
            Err(ClientError::Duplicate(_)) => Ok(FollowOutcome::AlreadyFollowing),
            Err(e) => Err(e),
        }
    }

    pub async fn unfollow(
        &self,
        follower_id: &UserId,
        artist_id: &ArtistId,
    ) -> Result<UnfollowOutcome> {
        let removed = self
            .client
            .delete(FOLLOWS, &Self::pair(follower_id, artist_id))
            .await?;

        if removed == 0 {
            Ok(UnfollowOutcome::NotFollowing)
        } else {
            info!(follower_id = %follower_id, artist_id = %artist_id, "Unfollowed artist");
            Ok(UnfollowOutcome::Unfollowed)
        }
    }

    /// Everyone following an artist, newest first.
    pub async fn followers_of(&self, artist_id: &ArtistId) -> Result<Vec<Follow>> {
        let query = Query::new()
            .select("*")
            .eq("artist_id", artist_id)
            .order("created_at", true);
        self.client.select(FOLLOWS, &query).await
    }
}
