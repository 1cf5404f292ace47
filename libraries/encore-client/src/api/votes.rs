//! Hot/not votes on tracks.

use super::VOTES;
use crate::client::EncoreClient;
use crate::error::Result;
use crate::rest::Query;
use crate::types::VoteOutcome;
use encore_core::{TrackId, UserId, Vote, VoteKind};
use serde_json::json;
use tracing::debug;

/// Vote client.
pub struct VotesApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> VotesApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    fn pair(user_id: &UserId, track_id: &TrackId) -> Query {
        Query::new().eq("user_id", user_id).eq("track_id", track_id)
    }

    pub async fn current_vote(&self, user_id: &UserId, track_id: &TrackId) -> Result<Option<VoteKind>> {
        let query = Self::pair(user_id, track_id).select("*").limit(1);
        let votes: Vec<Vote> = self.client.select(VOTES, &query).await?;
        Ok(votes.into_iter().next().map(|v| v.kind))
    }

    /// Cast a vote, toggling like a button.
    ///
    /// No vote yet adds one. The same vote again removes it. The opposite
    /// vote replaces it.
    pub async fn toggle(
        &self,
        user_id: &UserId,
        track_id: &TrackId,
        kind: VoteKind,
    ) -> Result<VoteOutcome> {
        let outcome = match self.current_vote(user_id, track_id).await? {
            None => {
                let vote = Vote {
                    user_id: user_id.clone(),
                    track_id: track_id.clone(),
                    kind,
                };
                self.client.insert::<_, Vote>(VOTES, &vote).await?;
                VoteOutcome::Added(kind)
            }
            Some(previous) if previous == kind => {
                self.client
                    .delete(VOTES, &Self::pair(user_id, track_id))
                    .await?;
                VoteOutcome::Removed(kind)
            }
            Some(previous) => {
                let _: Vec<Vote> = self
                    .client
                    .update(
                        VOTES,
                        &Self::pair(user_id, track_id),
                        &json!({ "vote_type": kind }),
                    )
                    .await?;
                VoteOutcome::Switched {
                    from: previous,
                    to: kind,
                }
            }
        };

        debug!(user_id = %user_id, track_id = %track_id, outcome = ?outcome, "Vote toggled");
        Ok(outcome)
    }
}
