//! Encore - Playback Session
//!
//! Platform-agnostic playback management for Encore.
//!
//! This crate provides:
//! - A single playback session holding at most one audio resource
//! - A linear, non-wrapping track queue with a cursor
//! - Transport controls (play, pause, resume, stop, seek, skip)
//! - Status mirroring and auto-advance when a track ends
//! - Snippet-window enforcement for tracks the listener has not bought
//!
//! # Architecture
//!
//! `encore-playback` never touches an audio API itself. Platforms implement
//! [`AudioBackend`] and [`AudioHandle`]; the session drives them and mirrors
//! the [`PlaybackStatus`] reports they send back.
//!
//! # Example
//!
//! ```rust,no_run
//! use encore_playback::{
//!     AudioBackend, AudioHandle, LoadOptions, PlaybackSession, SessionConfig, StatusSink,
//! };
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! struct SilentBackend;
//! struct SilentHandle;
//!
//! #[async_trait]
//! impl AudioBackend for SilentBackend {
//!     async fn load(
//!         &self,
//!         _uri: &str,
//!         _options: LoadOptions,
//!         _status: StatusSink,
//!     ) -> encore_playback::Result<Box<dyn AudioHandle>> {
//!         Ok(Box::new(SilentHandle))
//!     }
//! }
//!
//! #[async_trait]
//! impl AudioHandle for SilentHandle {
//!     async fn play(&mut self) -> encore_playback::Result<()> { Ok(()) }
//!     async fn pause(&mut self) -> encore_playback::Result<()> { Ok(()) }
//!     async fn stop(&mut self) -> encore_playback::Result<()> { Ok(()) }
//!     async fn unload(&mut self) -> encore_playback::Result<()> { Ok(()) }
//!     async fn seek(&mut self, _position: Duration) -> encore_playback::Result<()> { Ok(()) }
//! }
//!
//! # async fn run(tracks: Vec<encore_core::Track>) -> encore_playback::Result<()> {
//! let session = PlaybackSession::new(SilentBackend, SessionConfig::default());
//! session.set_queue(tracks, 0).await?;
//! session.play_queue_index(0).await?;
//! session.skip_next().await?;
//! session.cleanup().await;
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod events;
mod queue;
mod session;
pub mod types;

// Public exports
pub use backend::{AudioBackend, AudioHandle, LoadOptions, PlaybackStatus, StatusSink};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use queue::Queue;
pub use session::PlaybackSession;
pub use types::{PlayOutcome, SessionConfig, SessionSnapshot, SkipOutcome};
