//! Playback session - core orchestration
//!
//! Owns at most one audio handle plus the play queue, and exposes transport
//! controls to UI callers.
//!
//! Resource swaps are "latest wins": every `play_track` takes a fresh
//! generation number, and a load that completes after a newer call (or a stop)
//! releases its own handle instead of committing it. The state lock is never
//! held across `AudioBackend::load`.

use crate::{
    backend::{release, AudioBackend, AudioHandle, LoadOptions, PlaybackStatus, StatusMessage,
        StatusSink},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    queue::Queue,
    types::{PlayOutcome, SessionConfig, SessionSnapshot, SkipOutcome},
};
use encore_core::{Track, TrackId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex, Notify};
use tracing::{debug, info, trace, warn};

/// Mutable session state, guarded by one lock
struct Inner {
    handle: Option<Box<dyn AudioHandle>>,
    // Generation of the committed handle
    handle_generation: u64,
    current_track: Option<Track>,
    is_playing: bool,
    is_loading: bool,
    position_ms: u64,
    duration_ms: u64,
    preview_limit_ms: Option<u64>,
    // End of the current track already handled
    finished: bool,
    queue: Queue,
    entitlements: HashSet<TrackId>,
    pending_events: Vec<PlaybackEvent>,
}

impl Inner {
    fn new() -> Self {
        Self {
            handle: None,
            handle_generation: 0,
            current_track: None,
            is_playing: false,
            is_loading: false,
            position_ms: 0,
            duration_ms: 0,
            preview_limit_ms: None,
            finished: false,
            queue: Queue::new(),
            entitlements: HashSet::new(),
            pending_events: Vec::new(),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_track: self.current_track.clone(),
            is_playing: self.is_playing,
            is_loading: self.is_loading,
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            preview_limit_ms: self.preview_limit_ms,
            queue_len: self.queue.len(),
            current_index: self.queue.current_index(),
        }
    }

    /// Forget the loaded track; the caller releases the returned handle
    fn preview_exhausted(&self) -> bool {
        self.preview_limit_ms
            .is_some_and(|limit| self.position_ms >= limit)
    }

    fn reset_transport(&mut self) -> Option<Box<dyn AudioHandle>> {
        self.current_track = None;
        self.is_playing = false;
        self.is_loading = false;
        self.position_ms = 0;
        self.duration_ms = 0;
        self.preview_limit_ms = None;
        self.finished = false;
        self.handle.take()
    }
}

/// Single active playback session
///
/// Constructed explicitly by the application root and shared by reference
/// (typically inside an `Arc`). All methods take `&self`.
pub struct PlaybackSession<B: AudioBackend> {
    backend: B,
    config: SessionConfig,
    inner: Mutex<Inner>,
    generation: AtomicU64,
    status_tx: mpsc::UnboundedSender<StatusMessage>,
    status_rx: Mutex<mpsc::UnboundedReceiver<StatusMessage>>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    shutdown: Notify,
}

impl<B: AudioBackend> PlaybackSession<B> {
    /// Create new playback session over `backend`
    pub fn new(backend: B, config: SessionConfig) -> Self {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());

        Self {
            backend,
            config,
            inner: Mutex::new(Inner::new()),
            generation: AtomicU64::new(0),
            status_tx,
            status_rx: Mutex::new(status_rx),
            snapshot_tx,
            shutdown: Notify::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ===== Playback Control =====

    /// Load and start `track`, replacing whatever is playing
    ///
    /// The previous resource (if any) is stopped and unloaded before the new
    /// one is acquired. Acquisition failures leave the session idle and are
    /// returned to the caller.
    pub async fn play_track(&self, track: Track) -> Result<PlayOutcome> {
        let generation = self.next_generation();

        let (previous, preview_limit) = {
            let mut inner = self.inner.lock().await;
            let previous = inner.handle.take();
            inner.is_loading = true;
            inner.is_playing = false;
            let purchased = inner.entitlements.contains(&track.id);
            self.publish(&inner);
            (previous, track.preview_limit(purchased))
        };

        if let Some(handle) = previous {
            debug!(generation, "Releasing previous audio resource");
            release(handle).await;
        }

        debug!(
            generation,
            track_id = %track.id,
            uri = %track.audio_url,
            "Loading track"
        );

        let options = LoadOptions {
            autoplay: true,
            progress_interval: self.config.progress_interval(),
        };
        let sink = StatusSink::new(generation, self.status_tx.clone());
        let loaded = self.backend.load(&track.audio_url, options, sink).await;

        let mut inner = self.inner.lock().await;
        let is_current = self.generation.load(Ordering::SeqCst) == generation;

        match loaded {
            Ok(handle) if is_current => {
                let stale = inner.handle.replace(handle);
                inner.handle_generation = generation;
                inner.is_loading = false;
                inner.is_playing = true;
                inner.position_ms = 0;
                inner.duration_ms = u64::from(track.duration) * 1000;
                inner.preview_limit_ms = preview_limit.map(|l| l.as_millis() as u64);
                inner.finished = false;
                inner.pending_events.push(PlaybackEvent::TrackStarted {
                    track_id: track.id.clone(),
                    preview: preview_limit.is_some(),
                });
                info!(
                    track_id = %track.id,
                    title = %track.title,
                    preview = preview_limit.is_some(),
                    "Playing track"
                );
                inner.current_track = Some(track);
                self.publish(&inner);
                drop(inner);

                if let Some(stale) = stale {
                    release(stale).await;
                }
                Ok(PlayOutcome::Started)
            }
            Ok(handle) => {
                drop(inner);
                debug!(generation, track_id = %track.id, "Load superseded, releasing");
                release(handle).await;
                Ok(PlayOutcome::Superseded)
            }
            Err(e) if is_current => {
                inner.is_loading = false;
                inner.is_playing = false;
                inner.pending_events.push(PlaybackEvent::LoadFailed {
                    track_id: track.id.clone(),
                    message: e.to_string(),
                });
                self.publish(&inner);
                warn!(track_id = %track.id, error = %e, "Failed to load track");

                Err(match e {
                    e @ (PlaybackError::PermissionDenied(_)
                    | PlaybackError::ResourceAcquisition { .. }) => e,
                    other => PlaybackError::ResourceAcquisition {
                        uri: track.audio_url,
                        reason: other.to_string(),
                    },
                })
            }
            Err(e) => {
                debug!(track_id = %track.id, error = %e, "Superseded load failed");
                Ok(PlayOutcome::Superseded)
            }
        }
    }

    /// Pause playback; no-op without an active resource
    pub async fn pause_track(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let Some(handle) = inner.handle.as_mut() else {
            return Ok(());
        };
        handle.pause().await?;
        inner.is_playing = false;
        self.publish(&inner);
        Ok(())
    }

    /// Resume playback
    ///
    /// No-op without an active resource, or once an unpurchased track has
    /// used up its snippet window.
    pub async fn resume_track(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.preview_exhausted() {
            debug!("Preview window used up, not resuming");
            return Ok(());
        }
        let Some(handle) = inner.handle.as_mut() else {
            return Ok(());
        };
        handle.play().await?;
        inner.is_playing = true;
        self.publish(&inner);
        Ok(())
    }

    /// Stop playback and release the resource
    ///
    /// Clears the current track but not the queue. Any load still in flight
    /// is invalidated.
    pub async fn stop_track(&self) -> Result<()> {
        self.next_generation();

        let handle = {
            let mut inner = self.inner.lock().await;
            let handle = inner.reset_transport();
            inner.pending_events.push(PlaybackEvent::Stopped);
            self.publish(&inner);
            handle
        };

        if let Some(handle) = handle {
            release(handle).await;
            info!("Playback stopped");
        }
        Ok(())
    }

    /// Seek within the current resource
    ///
    /// Bounds are left to the resource itself. No-op when idle.
    pub async fn seek_to(&self, position_ms: u64) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let Some(handle) = inner.handle.as_mut() else {
            return Ok(());
        };
        handle.seek(Duration::from_millis(position_ms)).await?;
        inner.position_ms = position_ms;
        self.publish(&inner);
        Ok(())
    }

    // ===== Queue =====

    /// Replace the queue and cursor; does not start playback
    pub async fn set_queue(&self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.queue.replace(tracks, start_index)?;
        let event = PlaybackEvent::QueueChanged {
            length: inner.queue.len(),
            index: inner.queue.current_index(),
        };
        inner.pending_events.push(event);
        self.publish(&inner);
        debug!(length = inner.queue.len(), start_index, "Queue replaced");
        Ok(())
    }

    /// Step to the next queue element and play it
    ///
    /// At the last element nothing happens (no wraparound).
    pub async fn skip_next(&self) -> Result<SkipOutcome> {
        let track = {
            let mut inner = self.inner.lock().await;
            let Some(track) = inner.queue.advance().cloned() else {
                trace!("skip_next at end of queue");
                return Ok(SkipOutcome::AtBoundary);
            };
            self.publish(&inner);
            track
        };
        self.play_track(track).await.map(SkipOutcome::Moved)
    }

    /// Step to the previous queue element and play it
    ///
    /// At the first element nothing happens (no wraparound).
    pub async fn skip_previous(&self) -> Result<SkipOutcome> {
        let track = {
            let mut inner = self.inner.lock().await;
            let Some(track) = inner.queue.retreat().cloned() else {
                trace!("skip_previous at start of queue");
                return Ok(SkipOutcome::AtBoundary);
            };
            self.publish(&inner);
            track
        };
        self.play_track(track).await.map(SkipOutcome::Moved)
    }

    /// Move the cursor to `index` and play that track
    pub async fn play_queue_index(&self, index: usize) -> Result<PlayOutcome> {
        let track = {
            let mut inner = self.inner.lock().await;
            let track = inner.queue.select(index)?.clone();
            self.publish(&inner);
            track
        };
        self.play_track(track).await
    }

    /// Copy of the queued tracks
    pub async fn queue(&self) -> Vec<Track> {
        self.inner.lock().await.queue.tracks().to_vec()
    }

    // ===== Entitlements =====

    /// Mark a track as purchased so it plays past the snippet window
    ///
    /// Takes effect on the next load of that track.
    pub async fn grant_entitlement(&self, track_id: TrackId) {
        self.inner.lock().await.entitlements.insert(track_id);
    }

    /// Replace the set of purchased tracks
    pub async fn set_entitlements(&self, track_ids: impl IntoIterator<Item = TrackId>) {
        self.inner.lock().await.entitlements = track_ids.into_iter().collect();
    }

    // ===== Status =====

    /// Apply every status report received so far
    ///
    /// Returns the number of reports applied. Failures are logged and do not
    /// hold back later reports. Must not be called while
    /// [`run_status_loop`](Self::run_status_loop) is running.
    pub async fn process_pending_status(&self) -> Result<usize> {
        let mut applied = 0;
        loop {
            let message = self.status_rx.lock().await.try_recv();
            let Ok((generation, status)) = message else {
                break;
            };
            if let Err(e) = self.apply_status(generation, status).await {
                warn!(error = %e, "Failed to apply playback status");
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Apply status reports as they arrive until [`cleanup`](Self::cleanup)
    ///
    /// Intended to be spawned once by the application root.
    pub async fn run_status_loop(&self) {
        let mut rx = self.status_rx.lock().await;
        loop {
            tokio::select! {
                () = self.shutdown.notified() => {
                    debug!("Status loop shutting down");
                    break;
                }
                message = rx.recv() => {
                    let Some((generation, status)) = message else {
                        break;
                    };
                    if let Err(e) = self.apply_status(generation, status).await {
                        warn!(error = %e, "Failed to apply playback status");
                    }
                }
            }
        }
    }

    /// Mirror one report into the session state
    ///
    /// Reports from replaced resources are ignored. A finished, non-looping
    /// resource (or one that ran out of its snippet window) advances the queue.
    async fn apply_status(&self, generation: u64, status: PlaybackStatus) -> Result<()> {
        let advance = {
            let mut inner = self.inner.lock().await;
            if inner.handle.is_none() || inner.handle_generation != generation {
                trace!(generation, "Dropping stale status report");
                return Ok(());
            }

            inner.position_ms = status.position_ms;
            if let Some(duration_ms) = status.duration_ms {
                inner.duration_ms = duration_ms;
            }
            inner.is_playing = status.is_playing;

            let finished = status.did_just_finish && !status.is_looping;
            let preview_reached = inner
                .preview_limit_ms
                .is_some_and(|limit| status.position_ms >= limit);

            if inner.finished && preview_reached && status.is_playing {
                // resumed or sought past the window after it already ended
                if let Some(handle) = inner.handle.as_mut() {
                    handle.pause().await?;
                }
                inner.is_playing = false;
                self.publish(&inner);
                false
            } else if inner.finished || !(finished || preview_reached) {
                self.publish(&inner);
                false
            } else {
                if preview_reached && !finished {
                    if let Some(handle) = inner.handle.as_mut() {
                        handle.pause().await?;
                    }
                    inner.is_playing = false;
                }
                inner.finished = true;

                let event = inner.current_track.as_ref().map(|track| {
                    debug!(track_id = %track.id, preview = preview_reached, "Track finished");
                    PlaybackEvent::TrackFinished {
                        track_id: track.id.clone(),
                        preview_limit_reached: preview_reached && !finished,
                    }
                });
                inner.pending_events.extend(event);
                self.publish(&inner);
                true
            }
        };

        if advance && self.skip_next().await? == SkipOutcome::AtBoundary {
            debug!("Reached end of queue");
        }
        Ok(())
    }

    // ===== Lifecycle =====

    /// Release any active resource and stop the status loop
    pub async fn cleanup(&self) {
        self.next_generation();

        let handle = {
            let mut inner = self.inner.lock().await;
            let handle = inner.reset_transport();
            self.publish(&inner);
            handle
        };

        if let Some(handle) = handle {
            release(handle).await;
        }
        self.shutdown.notify_one();
        debug!("Playback session cleaned up");
    }

    // ===== State Queries =====

    /// Latest published state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Receive every future state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Take queued events
    pub async fn drain_events(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.inner.lock().await.pending_events)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publish(&self, inner: &Inner) {
        self.snapshot_tx.send_replace(inner.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, RecordingBackend};
    use encore_core::ArtistId;

    fn track(name: &str) -> Track {
        let mut track = Track::new(
            ArtistId::new("artist"),
            name,
            format!("mem://{}", name),
            180,
        );
        track.id = TrackId::new(name);
        track
    }

    fn session() -> PlaybackSession<RecordingBackend> {
        PlaybackSession::new(RecordingBackend::new(), SessionConfig::default())
    }

    #[tokio::test]
    async fn play_track_commits_state() {
        let session = session();
        let outcome = session.play_track(track("a")).await.unwrap();
        assert_eq!(outcome, PlayOutcome::Started);

        let snap = session.snapshot();
        assert!(snap.is_playing);
        assert!(!snap.is_loading);
        assert_eq!(snap.current_track.unwrap().title, "a");
        assert_eq!(snap.duration_ms, 180_000);
        assert_eq!(
            session.backend().calls(),
            vec![Call::Load("mem://a".to_string())]
        );
    }

    #[tokio::test]
    async fn pause_resume_without_track_is_noop() {
        let session = session();
        session.pause_track().await.unwrap();
        session.resume_track().await.unwrap();
        session.seek_to(1000).await.unwrap();
        assert!(session.backend().calls().is_empty());
        assert!(!session.snapshot().is_playing);
    }

    #[tokio::test]
    async fn pause_and_resume_flip_playing() {
        let session = session();
        session.play_track(track("a")).await.unwrap();

        session.pause_track().await.unwrap();
        assert!(!session.snapshot().is_playing);

        session.resume_track().await.unwrap();
        assert!(session.snapshot().is_playing);

        let calls = session.backend().calls();
        assert!(calls.contains(&Call::Pause("mem://a".to_string())));
        assert!(calls.contains(&Call::Play("mem://a".to_string())));
    }

    #[tokio::test]
    async fn failed_load_leaves_session_idle() {
        let session = session();
        session.backend().fail_uri("mem://bad");

        let err = session.play_track(track("bad")).await.unwrap_err();
        assert!(matches!(err, PlaybackError::ResourceAcquisition { .. }));
        assert_eq!(
            err.kind(),
            encore_core::ErrorKind::ResourceAcquisitionFailed
        );

        let snap = session.snapshot();
        assert!(!snap.is_playing);
        assert!(!snap.is_loading);

        let events = session.drain_events().await;
        assert!(matches!(events.last(), Some(PlaybackEvent::LoadFailed { .. })));
    }

    #[tokio::test]
    async fn stale_status_is_ignored() {
        let session = session();
        session.play_track(track("a")).await.unwrap();
        let old_sink = session.backend().last_sink();
        session.play_track(track("b")).await.unwrap();

        old_sink.send(PlaybackStatus::progress(42_000, 180_000));
        session.process_pending_status().await.unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.position_ms, 0);
        assert_eq!(snap.current_track.unwrap().title, "b");
    }

    #[tokio::test]
    async fn looping_finish_does_not_advance() {
        let session = session();
        session
            .set_queue(vec![track("a"), track("b")], 0)
            .await
            .unwrap();
        session.play_queue_index(0).await.unwrap();

        let mut status = PlaybackStatus::finished(180_000);
        status.is_looping = true;
        session.backend().last_sink().send(status);
        session.process_pending_status().await.unwrap();

        assert_eq!(session.snapshot().current_index, Some(0));
        assert_eq!(session.snapshot().current_track.unwrap().title, "a");
    }

    #[tokio::test]
    async fn cleanup_releases_resource() {
        let session = session();
        session.play_track(track("a")).await.unwrap();
        session.cleanup().await;

        let calls = session.backend().calls();
        assert_eq!(
            &calls[1..],
            &[
                Call::Stop("mem://a".to_string()),
                Call::Unload("mem://a".to_string())
            ]
        );
        assert!(session.snapshot().current_track.is_none());
    }
}
