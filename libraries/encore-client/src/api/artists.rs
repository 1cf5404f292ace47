//! Artist directory.

use super::ARTISTS;
use crate::client::EncoreClient;
use crate::error::{ClientError, Result};
use crate::rest::Query;
use crate::types::Fetched;
use encore_core::{Artist, ArtistId};

/// Artist client.
pub struct ArtistsApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> ArtistsApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    /// All artists by name.
    pub async fn list(&self) -> Result<Fetched<Vec<Artist>>> {
        let query = Query::new().select("*").order("name", false);
        self.client.select_cached(ARTISTS, &query).await
    }

    pub async fn get(&self, artist_id: &ArtistId) -> Result<Fetched<Artist>> {
        let query = Query::new().select("*").eq("id", artist_id).limit(1);
        let fetched = self.client.select_cached::<Artist>(ARTISTS, &query).await?;

        match fetched.data.into_iter().next() {
            Some(artist) => Ok(Fetched {
                data: artist,
                origin: fetched.origin,
            }),
            None => Err(ClientError::not_found("Artist", artist_id.as_str())),
        }
    }

    /// Artists currently streaming. Never served from cache.
    pub async fn list_live(&self) -> Result<Vec<Artist>> {
        let query = Query::new()
            .select("*")
            .eq("is_live", true)
            .order("name", false);
        self.client.select(ARTISTS, &query).await
    }
}
