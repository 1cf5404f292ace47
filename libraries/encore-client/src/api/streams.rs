//! Live stream announcements.

use super::STREAMS;
use crate::client::EncoreClient;
use crate::error::Result;
use crate::rest::Query;
use crate::types::Fetched;
use chrono::{SecondsFormat, Utc};
use encore_core::{NewStreamAnnouncement, StreamAnnouncement};
use tracing::info;

const UPCOMING_KEY: &str = "stream_announcements?upcoming";

/// Stream announcement client.
pub struct StreamsApi<'a> {
    client: &'a EncoreClient,
}

impl<'a> StreamsApi<'a> {
    pub(crate) fn new(client: &'a EncoreClient) -> Self {
        Self { client }
    }

    /// Streams that are live now or start later, soonest first.
    pub async fn upcoming(&self) -> Result<Fetched<Vec<StreamAnnouncement>>> {
        let now = Utc::now();
        let query = Query::new()
            .select("*")
            .or(&[
                "is_live.eq.true".to_string(),
                format!(
                    "starts_at.gte.{}",
                    now.to_rfc3339_opts(SecondsFormat::Secs, true)
                ),
            ])
            .order("starts_at", false);

        let mut fetched = self
            .client
            .select_cached_as(UPCOMING_KEY, STREAMS, &query)
            .await?;

        // a cached copy may list streams that have since ended
        if fetched.is_stale() {
            fetched
                .data
                .retain(|s: &StreamAnnouncement| s.is_live || s.starts_at >= now);
        }
        Ok(fetched)
    }

    /// Announce a stream. Invalid announcements are rejected before any request.
    pub async fn announce(&self, announcement: &NewStreamAnnouncement) -> Result<StreamAnnouncement> {
        announcement.validate()?;

        let created: StreamAnnouncement = self.client.insert(STREAMS, announcement).await?;
        info!(
            stream_id = %created.id,
            artist_id = %created.artist_id,
            starts_at = %created.starts_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "Stream announced"
        );
        Ok(created)
    }
}
