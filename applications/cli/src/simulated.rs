//! Clock-driven audio backend
//!
//! Stands in for an OS audio stack: a loaded resource is a position counter
//! advanced on a tokio interval. Progress and end-of-track are reported
//! through the session's [`StatusSink`], so queue auto-advance and preview
//! windows behave exactly as they would over real audio.

use async_trait::async_trait;
use encore_core::Track;
use encore_playback::{
    AudioBackend, AudioHandle, LoadOptions, PlaybackError, PlaybackStatus, Result, StatusSink,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Length assumed for URIs that were never registered
const DEFAULT_DURATION_MS: u64 = 180_000;

/// Backend whose resources play against a simulated clock.
pub struct SimulatedBackend {
    durations: Mutex<HashMap<String, u64>>,
    speed: u32,
}

impl SimulatedBackend {
    /// `speed` is how many milliseconds of audio elapse per wall-clock
    /// millisecond (minimum 1).
    pub fn new(speed: u32) -> Self {
        Self {
            durations: Mutex::new(HashMap::new()),
            speed: speed.max(1),
        }
    }

    /// Declare the length of the audio behind `uri`.
    pub fn register(&self, uri: impl Into<String>, duration_ms: u64) {
        self.lock().insert(uri.into(), duration_ms);
    }

    /// Register every track's audio URL with its catalog duration.
    pub fn register_tracks<'a>(&self, tracks: impl IntoIterator<Item = &'a Track>) {
        let mut durations = self.lock();
        for track in tracks {
            durations.insert(track.audio_url.clone(), u64::from(track.duration) * 1000);
        }
    }

    fn duration_of(&self, uri: &str) -> u64 {
        self.lock()
            .get(uri)
            .copied()
            .unwrap_or(DEFAULT_DURATION_MS)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.durations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct Clock {
    position_ms: u64,
    duration_ms: u64,
    playing: bool,
}

impl Clock {
    /// Advance by `elapsed_ms` and describe the new state, or `None` when
    /// nothing is playing.
    fn tick(&mut self, elapsed_ms: u64) -> Option<PlaybackStatus> {
        if !self.playing {
            return None;
        }

        self.position_ms = (self.position_ms + elapsed_ms).min(self.duration_ms);
        if self.position_ms >= self.duration_ms {
            self.playing = false;
            Some(PlaybackStatus::finished(self.duration_ms))
        } else {
            Some(PlaybackStatus::progress(self.position_ms, self.duration_ms))
        }
    }
}

#[async_trait]
impl AudioBackend for SimulatedBackend {
    async fn load(
        &self,
        uri: &str,
        options: LoadOptions,
        status: StatusSink,
    ) -> Result<Box<dyn AudioHandle>> {
        if uri.trim().is_empty() {
            return Err(PlaybackError::ResourceAcquisition {
                uri: uri.to_string(),
                reason: "empty audio URL".to_string(),
            });
        }

        let duration_ms = self.duration_of(uri);
        let clock = Arc::new(Mutex::new(Clock {
            position_ms: 0,
            duration_ms,
            playing: options.autoplay,
        }));

        let interval = options.progress_interval.max(Duration::from_millis(1));
        let step_ms = interval.as_millis() as u64 * u64::from(self.speed);
        let task = tokio::spawn(run_clock(Arc::clone(&clock), interval, step_ms, status));

        debug!(uri, duration_ms, "Simulated resource loaded");
        Ok(Box::new(SimulatedHandle {
            uri: uri.to_string(),
            clock,
            task: Some(task),
        }))
    }
}

async fn run_clock(clock: Arc<Mutex<Clock>>, interval: Duration, step_ms: u64, status: StatusSink) {
    let mut ticker = tokio::time::interval(interval);
    // first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let report = clock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick(step_ms);

        if let Some(report) = report {
            trace!(position_ms = report.position_ms, "Simulated progress");
            if !status.send(report) {
                break;
            }
        }
    }
}

struct SimulatedHandle {
    uri: String,
    clock: Arc<Mutex<Clock>>,
    task: Option<JoinHandle<()>>,
}

impl SimulatedHandle {
    fn clock(&self) -> std::sync::MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_loaded(&self) -> Result<()> {
        if self.task.is_some() {
            Ok(())
        } else {
            Err(PlaybackError::backend(format!("{} is unloaded", self.uri)))
        }
    }
}

#[async_trait]
impl AudioHandle for SimulatedHandle {
    async fn play(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        let mut clock = self.clock();
        if clock.position_ms >= clock.duration_ms {
            clock.position_ms = 0;
        }
        clock.playing = true;
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        self.clock().playing = false;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        let mut clock = self.clock();
        clock.playing = false;
        clock.position_ms = 0;
        Ok(())
    }

    async fn unload(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(uri = %self.uri, "Simulated resource unloaded");
        }
        Ok(())
    }

    async fn seek(&mut self, position: Duration) -> Result<()> {
        self.ensure_loaded()?;
        let mut clock = self.clock();
        clock.position_ms = (position.as_millis() as u64).min(clock.duration_ms);
        Ok(())
    }
}

impl Drop for SimulatedHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
