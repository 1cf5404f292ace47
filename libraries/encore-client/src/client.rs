//! Main Encore backend client.

use crate::api::{
    ArtistsApi, FollowsApi, PostsApi, ProfilesApi, PurchasesApi, StreamsApi, TracksApi, VotesApi,
};
use crate::cache::OfflineCache;
use crate::error::{ClientError, Result};
use crate::types::BackendConfig;
use encore_core::EncoreError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Encore hosted backend.
///
/// Each table is reached through a borrowing sub-client
/// ([`tracks`](Self::tracks), [`posts`](Self::posts), ...). Reads of public
/// catalog data go through the offline cache.
///
/// # Example
///
/// ```ignore
/// use encore_client::{BackendConfig, EncoreClient};
///
/// let client = EncoreClient::new(BackendConfig::new("https://xyz.supabase.co", "anon"))?;
///
/// let recent = client.tracks().list_recent(20).await?;
/// if recent.is_stale() {
///     println!("offline, showing cached tracks");
/// }
/// for track in recent.data {
///     println!("{}", track.title);
/// }
/// ```
pub struct EncoreClient {
    http: Client,
    base_url: String,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
    cache: OfflineCache,
}

impl EncoreClient {
    /// Create a client with an in-memory offline cache.
    pub fn new(config: BackendConfig) -> Result<Self> {
        Self::with_cache(config, OfflineCache::default())
    }

    /// Create a client using the given offline cache.
    pub fn with_cache(config: BackendConfig, cache: OfflineCache) -> Result<Self> {
        let base_url = normalize_url(&config.url)?;

        if config.anon_key.trim().is_empty() {
            return Err(EncoreError::validation("anon_key", "cannot be empty").into());
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(format!("Encore/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key,
            access_token: Arc::new(RwLock::new(config.access_token)),
            cache,
        })
    }

    /// Backend URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub fn cache(&self) -> &OfflineCache {
        &self.cache
    }

    // ===== Session token =====

    /// Use a signed-in user's access token for subsequent requests.
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(token.into());
        info!("Access token set");
    }

    /// Forget the access token (sign out).
    pub async fn clear_access_token(&self) {
        *self.access_token.write().await = None;
        info!("Access token cleared");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    pub(crate) async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    // ===== Tables =====

    pub fn tracks(&self) -> TracksApi<'_> {
        TracksApi::new(self)
    }

    pub fn artists(&self) -> ArtistsApi<'_> {
        ArtistsApi::new(self)
    }

    pub fn posts(&self) -> PostsApi<'_> {
        PostsApi::new(self)
    }

    pub fn follows(&self) -> FollowsApi<'_> {
        FollowsApi::new(self)
    }

    pub fn purchases(&self) -> PurchasesApi<'_> {
        PurchasesApi::new(self)
    }

    pub fn votes(&self) -> VotesApi<'_> {
        VotesApi::new(self)
    }

    pub fn profiles(&self) -> ProfilesApi<'_> {
        ProfilesApi::new(self)
    }

    pub fn streams(&self) -> StreamsApi<'_> {
        StreamsApi::new(self)
    }
}

impl std::fmt::Debug for EncoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoreClient")
            .field("base_url", &self.base_url)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Validate the backend URL and strip trailing slashes.
fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
