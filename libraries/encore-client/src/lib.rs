//! Encore hosted-backend client
//!
//! Stateless data access for the Encore catalog and social features:
//! tracks, artists, posts, follows, purchases, votes, profiles and stream
//! announcements, stored behind a PostgREST-style REST API.
//!
//! # Features
//!
//! - **Catalog reads**: recent tracks, tracks by artist, artist directory
//! - **Social**: feed posts, follows, hot/not votes
//! - **Commerce**: purchase records and playback entitlements
//! - **Offline cache**: reads fall back to the last good copy when the
//!   backend is unreachable
//!
//! # Example
//!
//! ```ignore
//! use encore_client::{BackendConfig, EncoreClient, VoteOutcome};
//! use encore_core::{UserId, TrackId, VoteKind};
//!
//! let client = EncoreClient::new(BackendConfig::new("https://xyz.supabase.co", "anon"))?;
//! client.set_access_token(session_jwt).await;
//!
//! let me = UserId::new("u1");
//! let track = TrackId::new("t1");
//! match client.votes().toggle(&me, &track, VoteKind::Hot).await? {
//!     VoteOutcome::Added(_) => println!("voted"),
//!     VoteOutcome::Removed(_) => println!("vote withdrawn"),
//!     VoteOutcome::Switched { .. } => println!("changed your mind"),
//! }
//! ```

#![forbid(unsafe_code)]

pub mod api;
mod cache;
mod client;
mod error;
mod rest;
mod types;

pub use cache::OfflineCache;
pub use client::EncoreClient;
pub use error::{ClientError, Result};
pub use types::{
    BackendConfig, CacheSettings, DataOrigin, Fetched, FollowOutcome, UnfollowOutcome,
    VoteOutcome,
};
