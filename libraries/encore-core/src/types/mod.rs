mod artist;
mod ids;
mod post;
mod profile;
mod social;
mod stream;
mod track;

pub use artist::Artist;
pub use ids::{ArtistId, PostId, PurchaseId, StreamId, TrackId, UserId};
pub use post::{NewPost, Post, MAX_POST_CHARS};
pub use profile::{Profile, ProfileUpdate};
pub use social::{Follow, NewPurchase, Purchase, Vote, VoteKind};
pub use stream::{NewStreamAnnouncement, StreamAnnouncement};
pub use track::{Track, DEFAULT_SNIPPET_SECS};
