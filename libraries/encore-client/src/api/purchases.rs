//! Track purchases and the entitlements derived from them.

use super::PURCHASES;
use crate::client::EncoreClient;
use crate::error::{ClientError, Result};
use crate::rest::Query;
use crate::types::Fetched;
use encore_core::{NewPurchase, Purchase, TrackId, UserId};
use std::collections::HashSet;
use tracing::info;

/// Purchase client.
pub struct PurchasesApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> PurchasesApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    pub async fn has_purchased(&self, user_id: &UserId, track_id: &TrackId) -> Result<bool> {
        let query = Query::new()
            .select("id")
            .eq("user_id", user_id)
            .eq("track_id", track_id)
            .limit(1);
        let rows: Vec<serde_json::Value> = self.client.select(PURCHASES, &query).await?;
        Ok(!rows.is_empty())
    }

    /// Record a completed purchase.
    ///
    /// Buying a track the user already owns fails with
    /// [`ClientError::Duplicate`].
    pub async fn record(&self, purchase: &NewPurchase) -> Result<Purchase> {
        purchase.validate()?;

        if self
            .has_purchased(&purchase.user_id, &purchase.track_id)
            .await?
        {
            return Err(ClientError::Duplicate(format!(
                "track {} already purchased",
                purchase.track_id
            )));
        }

        let recorded: Purchase = self.client.insert(PURCHASES, purchase).await?;
        info!(
            user_id = %recorded.user_id,
            track_id = %recorded.track_id,
            amount = recorded.amount,
            "Purchase recorded"
        );
        Ok(recorded)
    }

    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Fetched<Vec<Purchase>>> {
        let query = Query::new()
            .select("*")
            .eq("user_id", user_id)
            .order("created_at", true);
        self.client.select_cached(PURCHASES, &query).await
    }

    /// Track ids the user owns, for playback entitlements.
    pub async fn owned_track_ids(&self, user_id: &UserId) -> Result<HashSet<TrackId>> {
        let purchases = self.list_for_user(user_id).await?;
        Ok(purchases.data.into_iter().map(|p| p.track_id).collect())
    }
}
