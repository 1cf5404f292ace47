//! Encore Core
//!
//! Platform-agnostic domain types, validation and error handling for Encore.
//!
//! This crate provides the foundational building blocks shared by the
//! playback session and the hosted-backend client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Artist`, `Post`, `Follow`, `Purchase`, `Vote`,
//!   `Profile`, `StreamAnnouncement`
//! - **Input Types**: `NewPost`, `NewPurchase`, `ProfileUpdate`,
//!   `NewStreamAnnouncement`, each validated before anything reaches the network
//! - **Error Handling**: Unified `EncoreError`, `ErrorKind` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use encore_core::types::{NewPost, UserId};
//!
//! let post = NewPost::text(UserId::new("user-1"), "New single out Friday!");
//! assert!(post.validate().is_ok());
//!
//! let empty = NewPost::text(UserId::new("user-1"), "   ");
//! assert!(empty.validate().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{EncoreError, ErrorKind, Result};

pub use types::{
    Artist, ArtistId, Follow, NewPost, NewPurchase, NewStreamAnnouncement, Post, PostId, Profile,
    ProfileUpdate, Purchase, PurchaseId, StreamAnnouncement, StreamId, Track, TrackId, UserId,
    Vote, VoteKind,
};
