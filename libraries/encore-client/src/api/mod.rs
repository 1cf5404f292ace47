//! Per-table API clients.
//!
//! Each client borrows the [`EncoreClient`](crate::EncoreClient) and is
//! created on demand (`client.tracks()`, `client.posts()`, ...).

mod artists;
mod follows;
mod posts;
mod profiles;
mod purchases;
mod streams;
mod tracks;
mod votes;

pub use artists::ArtistsApi;
pub use follows::FollowsApi;
pub use posts::PostsApi;
pub use profiles::ProfilesApi;
pub use purchases::PurchasesApi;
pub use streams::StreamsApi;
pub use tracks::TracksApi;
pub use votes::VotesApi;

pub(crate) const TRACKS: &str = "tracks";
pub(crate) const ARTISTS: &str = "artists";
pub(crate) const POSTS: &str = "posts";
pub(crate) const FOLLOWS: &str = "follows";
pub(crate) const PURCHASES: &str = "purchases";
pub(crate) const VOTES: &str = "votes";
pub(crate) const PROFILES: &str = "profiles";
pub(crate) const STREAMS: &str = "stream_announcements";
