//! User profiles.

use super::PROFILES;
use crate::client::EncoreClient;
use crate::error::{ClientError, Result};
use crate::rest::Query;
use crate::types::Fetched;
use encore_core::{Profile, ProfileUpdate, UserId};
use tracing::info;

/// Profile client.
pub struct ProfilesApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> ProfilesApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, user_id: &UserId) -> Result<Fetched<Profile>> {
        let query = Query::new().select("*").eq("id", user_id).limit(1);
        let fetched = self.client.select_cached::<Profile>(PROFILES, &query).await?;

        match fetched.data.into_iter().next() {
            Some(profile) => Ok(Fetched {
                data: profile,
                origin: fetched.origin,
            }),
            None => Err(ClientError::not_found("Profile", user_id.as_str())),
        }
    }

    /// Apply a partial update. A taken username fails with
    /// [`ClientError::Duplicate`].
    pub async fn update(&self, user_id: &UserId, update: &ProfileUpdate) -> Result<Profile> {
        update.validate()?;

        let query = Query::new().eq("id", user_id);
        let updated: Vec<Profile> = self.client.update(PROFILES, &query, update).await?;

        let profile = updated
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::not_found("Profile", user_id.as_str()))?;
        info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }
}
