//! Platform audio boundary
//!
//! The session never talks to an audio API directly. Platforms implement
//! [`AudioBackend`] to open a resource for a track URI and [`AudioHandle`] for
//! transport control of that resource. Progress is reported back through the
//! [`StatusSink`] handed to `load`.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Position/progress report from an audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Current position in milliseconds
    pub position_ms: u64,

    /// Total length in milliseconds, once known
    pub duration_ms: Option<u64>,

    /// Whether audio is currently audible
    pub is_playing: bool,

    /// Resource is set to loop
    pub is_looping: bool,

    /// The resource reached its end since the previous report
    pub did_just_finish: bool,
}

impl PlaybackStatus {
    /// Regular progress tick
    pub fn progress(position_ms: u64, duration_ms: u64) -> Self {
        Self {
            position_ms,
            duration_ms: Some(duration_ms),
            is_playing: true,
            ..Self::default()
        }
    }

    /// End-of-track report
    pub fn finished(duration_ms: u64) -> Self {
        Self {
            position_ms: duration_ms,
            duration_ms: Some(duration_ms),
            is_playing: false,
            is_looping: false,
            did_just_finish: true,
        }
    }
}

pub(crate) type StatusMessage = (u64, PlaybackStatus);

/// Channel end a loaded resource uses to report progress
///
/// Every sink is tagged with the generation of the load that created it, so
/// reports from a resource that has since been replaced are discarded by the
/// session.
#[derive(Debug, Clone)]
pub struct StatusSink {
    generation: u64,
    tx: mpsc::UnboundedSender<StatusMessage>,
}

impl StatusSink {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<StatusMessage>) -> Self {
        Self { generation, tx }
    }

    /// Generation of the load this sink belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report a status update
    ///
    /// Returns `false` once the owning session is gone.
    pub fn send(&self, status: PlaybackStatus) -> bool {
        self.tx.send((self.generation, status)).is_ok()
    }
}

/// Options passed to [`AudioBackend::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Start playing as soon as the resource is ready
    pub autoplay: bool,

    /// How often the resource should report progress
    pub progress_interval: Duration,
}

/// Opens audio resources
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Acquire a resource for `uri`
    ///
    /// The returned handle owns the resource until `unload` is called.
    async fn load(
        &self,
        uri: &str,
        options: LoadOptions,
        status: StatusSink,
    ) -> Result<Box<dyn AudioHandle>>;
}

/// Transport control over one loaded resource
#[async_trait]
pub trait AudioHandle: Send {
    async fn play(&mut self) -> Result<()>;

    async fn pause(&mut self) -> Result<()>;

    async fn stop(&mut self) -> Result<()>;

    /// Free the underlying resource; the handle is unusable afterwards
    async fn unload(&mut self) -> Result<()>;

    async fn seek(&mut self, position: Duration) -> Result<()>;
}

/// Stop and unload a handle, logging rather than failing
pub(crate) async fn release(mut handle: Box<dyn AudioHandle>) {
    if let Err(e) = handle.stop().await {
        warn!(error = %e, "Failed to stop audio resource");
    }
    if let Err(e) = handle.unload().await {
        warn!(error = %e, "Failed to unload audio resource");
    }
}
