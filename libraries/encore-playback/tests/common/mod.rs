//! Shared test helpers for playback integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use encore_core::{ArtistId, Track, TrackId};
use encore_playback::{
    AudioBackend, AudioHandle, LoadOptions, PlaybackError, PlaybackSession, SessionConfig,
    StatusSink,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Calls observed by the mock backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(String),
    Play(String),
    Pause(String),
    Stop(String),
    Unload(String),
    Seek(String, Duration),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    sinks: HashMap<String, StatusSink>,
    gates: HashMap<String, Arc<Notify>>,
    failing: Vec<String>,
    unreachable: Vec<String>,
    live_handles: usize,
}

/// Mock backend: records calls, can fail or hold back specific loads
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<State>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of `uri` fail
    pub fn fail(&self, uri: &str) {
        self.state.lock().unwrap().failing.push(uri.to_string());
    }

    /// Make loads of `uri` fail as if the resource could not be fetched
    pub fn fail_acquire(&self, uri: &str) {
        self.state.lock().unwrap().unreachable.push(uri.to_string());
    }

    /// Hold loads of `uri` until [`open_gate`](Self::open_gate)
    pub fn gate(&self, uri: &str) {
        self.state
            .lock()
            .unwrap()
            .gates
            .insert(uri.to_string(), Arc::new(Notify::new()));
    }

    pub fn open_gate(&self, uri: &str) {
        if let Some(gate) = self.state.lock().unwrap().gates.get(uri) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Handles loaded and not yet unloaded
    pub fn live_handles(&self) -> usize {
        self.state.lock().unwrap().live_handles
    }

    /// Status sink of the most recent load of `uri`
    pub fn sink(&self, uri: &str) -> StatusSink {
        self.state
            .lock()
            .unwrap()
            .sinks
            .get(uri)
            .cloned()
            .expect("uri was never loaded")
    }
}

struct MockHandle {
    uri: String,
    state: Arc<Mutex<State>>,
    unloaded: bool,
}

impl MockHandle {
    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl AudioBackend for MockBackend {
    async fn load(
        &self,
        uri: &str,
        _options: LoadOptions,
        status: StatusSink,
    ) -> encore_playback::Result<Box<dyn AudioHandle>> {
        let gate = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::Load(uri.to_string()));
            state.gates.get(uri).cloned()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        if state.failing.iter().any(|u| u == uri) {
            return Err(PlaybackError::backend(format!("cannot decode {}", uri)));
        }
        if state.unreachable.iter().any(|u| u == uri) {
            return Err(PlaybackError::ResourceAcquisition {
                uri: uri.to_string(),
                reason: "host unreachable".to_string(),
            });
        }
        state.sinks.insert(uri.to_string(), status);
        state.live_handles += 1;

        Ok(Box::new(MockHandle {
            uri: uri.to_string(),
            state: Arc::clone(&self.state),
            unloaded: false,
        }))
    }
}

#[async_trait]
impl AudioHandle for MockHandle {
    async fn play(&mut self) -> encore_playback::Result<()> {
        self.record(Call::Play(self.uri.clone()));
        Ok(())
    }

    async fn pause(&mut self) -> encore_playback::Result<()> {
        self.record(Call::Pause(self.uri.clone()));
        Ok(())
    }

    async fn stop(&mut self) -> encore_playback::Result<()> {
        self.record(Call::Stop(self.uri.clone()));
        Ok(())
    }

    async fn unload(&mut self) -> encore_playback::Result<()> {
        self.record(Call::Unload(self.uri.clone()));
        if !self.unloaded {
            self.unloaded = true;
            self.state.lock().unwrap().live_handles -= 1;
        }
        Ok(())
    }

    async fn seek(&mut self, position: Duration) -> encore_playback::Result<()> {
        self.record(Call::Seek(self.uri.clone(), position));
        Ok(())
    }
}

pub fn uri(name: &str) -> String {
    format!("mem://{}", name)
}

pub fn track(name: &str) -> Track {
    let mut track = Track::new(ArtistId::new("artist-1"), name, uri(name), 180);
    track.id = TrackId::new(name);
    track
}

pub fn snippet_track(name: &str, snippet_secs: u32) -> Track {
    let mut track = track(name);
    track.is_snippet_only = true;
    track.snippet_duration = Some(snippet_secs);
    track.price = Some(99);
    track
}

pub fn tracks(names: &[&str]) -> Vec<Track> {
    names.iter().map(|n| track(n)).collect()
}

pub fn session() -> PlaybackSession<MockBackend> {
    PlaybackSession::new(MockBackend::new(), SessionConfig::default())
}

pub fn current_title(session: &PlaybackSession<MockBackend>) -> Option<String> {
    session.snapshot().current_track.map(|t| t.title)
}
