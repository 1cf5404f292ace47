//! Encore - browse and play the Encore catalog from a terminal

use anyhow::Context;
use clap::{Parser, Subcommand};
use encore_cli::{commands, AppConfig};
use encore_client::{EncoreClient, OfflineCache};
use encore_core::{ArtistId, UserId};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore music streaming client", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./encore.toml when present)
    #[arg(short, long, global = true, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the community feed
    Feed {
        /// Number of posts
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// List tracks, newest first
    Tracks {
        /// Only tracks by this artist
        #[arg(short, long)]
        artist: Option<String>,
        /// Number of tracks when no artist is given
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// List artists
    Artists {
        /// Only artists streaming right now
        #[arg(long)]
        live: bool,
    },
    /// List live and upcoming streams
    Streams,
    /// Play an artist's tracks
    Play {
        /// Artist whose tracks form the queue
        #[arg(short, long)]
        artist: String,
        /// Queue position to start at
        #[arg(short, long, default_value_t = 0)]
        start: usize,
        /// Simulated clock speed (overrides config)
        #[arg(long)]
        speed: Option<u32>,
        /// User whose purchases unlock full tracks (overrides config)
        #[arg(short, long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let cache = OfflineCache::from_settings(&config.cache);
    match cache.load().await {
        Ok(0) => {}
        Ok(entries) => tracing::debug!(entries, "Restored offline cache"),
        Err(e) => tracing::warn!(error = %e, "Could not restore offline cache"),
    }

    let client = EncoreClient::with_cache(config.backend.clone(), cache)
        .context("failed to create backend client")?;
    tracing::debug!(url = %client.base_url(), "Backend client ready");

    let result = match cli.command {
        Commands::Feed { limit } => commands::feed(&client, limit).await,
        Commands::Tracks { artist, limit } => {
            commands::tracks(&client, artist.map(ArtistId::new), limit).await
        }
        Commands::Artists { live } => commands::artists(&client, live).await,
        Commands::Streams => commands::streams(&client).await,
        Commands::Play {
            artist,
            start,
            speed,
            user,
        } => {
            let options = commands::PlayOptions {
                artist: ArtistId::new(artist),
                start,
                user: user.map(UserId::new).or_else(|| config.user_id.clone()),
                speed: speed.unwrap_or(config.playback.speed),
                session: config.playback.session(),
            };
            commands::play(&client, options).await
        }
    };

    if let Err(e) = client.cache().persist().await {
        tracing::warn!(error = %e, "Could not persist offline cache");
    }

    result
}
