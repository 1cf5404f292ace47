//! Subcommand implementations
//!
//! Each command borrows the client (and, for `play`, owns a session for its
//! lifetime) and writes human-readable output to stdout.

use crate::simulated::SimulatedBackend;
use anyhow::Context;
use encore_client::{EncoreClient, Fetched};
use encore_core::{Artist, ArtistId, Post, StreamAnnouncement, Track, TrackId, UserId};
use encore_playback::{PlaybackEvent, PlaybackSession, SessionConfig, SessionSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn stale_notice<T>(fetched: &Fetched<T>) {
    if fetched.is_stale() {
        println!("(offline: showing cached results)");
    }
}

/// `m:ss`
pub fn format_duration(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn format_track(track: &Track) -> String {
    let mut line = format!(
        "{:<40} {:>6}",
        track.title,
        format_duration(u64::from(track.duration))
    );
    if let Some(cents) = track.price {
        line.push_str(&format!("  ${}.{:02}", cents / 100, cents % 100));
    }
    if track.is_snippet_only {
        line.push_str("  [snippet]");
    }
    line
}

fn format_post(post: &Post) -> String {
    let mut line = format!(
        "[{}] {}: {}",
        post.created_at.format("%Y-%m-%d %H:%M"),
        post.author_id,
        post.content
    );
    if let Some(media) = &post.media_url {
        line.push_str(&format!(" <{media}>"));
    }
    line
}

fn format_artist(artist: &Artist) -> String {
    let live = if artist.is_live { "  LIVE" } else { "" };
    format!(
        "{:<24} {:>6} followers  ({}){}",
        artist.name, artist.follower_count, artist.id, live
    )
}

fn format_stream(stream: &StreamAnnouncement) -> String {
    let when = if stream.is_live {
        "LIVE NOW".to_string()
    } else {
        stream.starts_at.format("%Y-%m-%d %H:%M UTC").to_string()
    };
    format!("{:<18} {}  {}", when, stream.title, stream.stream_url)
}

pub async fn feed(client: &EncoreClient, limit: usize) -> anyhow::Result<()> {
    let posts = client.posts().feed(limit).await.context("failed to load feed")?;
    stale_notice(&posts);
    if posts.data.is_empty() {
        println!("No posts yet.");
    }
    for post in &posts.data {
        println!("{}", format_post(post));
    }
    Ok(())
}

pub async fn tracks(client: &EncoreClient, artist: Option<ArtistId>, limit: usize) -> anyhow::Result<()> {
    let tracks = match &artist {
        Some(artist_id) => client.tracks().list_by_artist(artist_id).await,
        None => client.tracks().list_recent(limit).await,
    }
    .context("failed to load tracks")?;

    stale_notice(&tracks);
    if tracks.data.is_empty() {
        println!("No tracks found.");
    }
    for (i, track) in tracks.data.iter().enumerate() {
        println!("{:>3}. {}", i, format_track(track));
    }
    Ok(())
}

pub async fn artists(client: &EncoreClient, live_only: bool) -> anyhow::Result<()> {
    let artists = if live_only {
        client.artists().list_live().await
    } else {
        client.artists().list().await.map(Fetched::into_inner)
    }
    .context("failed to load artists")?;

    if artists.is_empty() {
        println!("No artists found.");
    }
    for artist in &artists {
        println!("{}", format_artist(artist));
    }
    Ok(())
}

pub async fn streams(client: &EncoreClient) -> anyhow::Result<()> {
    let streams = client
        .streams()
        .upcoming()
        .await
        .context("failed to load streams")?;
    stale_notice(&streams);
    if streams.data.is_empty() {
        println!("No upcoming streams.");
    }
    for stream in &streams.data {
        println!("{}", format_stream(stream));
    }
    Ok(())
}

/// Options for the `play` command
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub artist: ArtistId,
    pub start: usize,
    pub user: Option<UserId>,
    pub speed: u32,
    pub session: SessionConfig,
}

/// Play an artist's tracks in order until the queue runs out or Ctrl-C.
pub async fn play(client: &EncoreClient, options: PlayOptions) -> anyhow::Result<()> {
    let tracks = client
        .tracks()
        .list_by_artist(&options.artist)
        .await
        .context("failed to load tracks")?;
    stale_notice(&tracks);
    let tracks = tracks.into_inner();

    if tracks.is_empty() {
        println!("{} has no tracks.", options.artist);
        return Ok(());
    }

    let backend = SimulatedBackend::new(options.speed);
    backend.register_tracks(&tracks);
    let session = Arc::new(PlaybackSession::new(backend, options.session));

    if let Some(user) = &options.user {
        match client.purchases().owned_track_ids(user).await {
            Ok(owned) => {
                info!(user_id = %user, owned = owned.len(), "Loaded entitlements");
                session.set_entitlements(owned).await;
            }
            Err(e) => warn!(error = %e, "Could not load purchases, playing previews only"),
        }
    }

    let titles: HashMap<TrackId, String> = tracks
        .iter()
        .map(|t| (t.id.clone(), t.title.clone()))
        .collect();
    let last_id = tracks[tracks.len() - 1].id.clone();
    session
        .set_queue(tracks, options.start)
        .await
        .context("invalid start index")?;

    let status_loop = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.run_status_loop().await })
    };

    let player = Player {
        client,
        session: &session,
        titles,
        last_id,
    };
    let result = tokio::select! {
        result = player.drive(options.start) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\nStopping.");
            Ok(())
        }
    };

    session.cleanup().await;
    if let Err(e) = status_loop.await {
        warn!(error = %e, "Status loop ended abnormally");
    }
    result
}

struct Player<'a> {
    client: &'a EncoreClient,
    session: &'a PlaybackSession<SimulatedBackend>,
    titles: HashMap<TrackId, String>,
    last_id: TrackId,
}

impl Player<'_> {
    /// Start at `start` and report events until the last track is done.
    async fn drive(&self, start: usize) -> anyhow::Result<()> {
        let mut updates = self.session.subscribe();
        if let Err(e) = self.session.play_queue_index(start).await {
            warn!(error = %e, "Failed to start playback");
        }

        loop {
            for event in self.session.drain_events().await {
                self.report(&event).await;

                match &event {
                    PlaybackEvent::TrackFinished { track_id, .. }
                    | PlaybackEvent::LoadFailed { track_id, .. }
                        if *track_id == self.last_id =>
                    {
                        println!("End of queue.");
                        return Ok(());
                    }
                    // the status loop only advances on finish, so step past failures here
                    PlaybackEvent::LoadFailed { .. } => {
                        if let Err(e) = self.session.skip_next().await {
                            warn!(error = %e, "Skipping past failed track failed");
                        }
                    }
                    _ => {}
                }
            }

            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                }
                () = tokio::time::sleep(Duration::from_secs(1)) => {
                    print_progress(&self.session.snapshot());
                }
            }
        }
    }

    fn title(&self, track_id: &TrackId) -> String {
        self.titles
            .get(track_id)
            .cloned()
            .unwrap_or_else(|| track_id.to_string())
    }

    async fn report(&self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::TrackStarted { track_id, preview } => {
                let suffix = if *preview { " (preview)" } else { "" };
                println!("▶ {}{suffix}", self.title(track_id));

                if let Err(e) = self.client.tracks().record_play(track_id).await {
                    warn!(track_id = %track_id, error = %e, "Failed to record play");
                }
            }
            PlaybackEvent::TrackFinished {
                preview_limit_reached: true,
                ..
            } => println!("  preview ended, buy the track to hear it all"),
            PlaybackEvent::TrackFinished { .. } => {}
            PlaybackEvent::LoadFailed { track_id, message } => {
                println!("✗ could not play {}: {message}", self.title(track_id));
            }
            PlaybackEvent::Stopped => println!("■ stopped"),
            PlaybackEvent::QueueChanged { length, .. } => println!("Queue: {length} tracks"),
        }
    }
}

fn print_progress(snapshot: &SessionSnapshot) {
    if snapshot.is_playing {
        println!(
            "  {} / {}",
            format_duration(snapshot.position_ms / 1000),
            format_duration(snapshot.duration_ms / 1000)
        );
    }
}
