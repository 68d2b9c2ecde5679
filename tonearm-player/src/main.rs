//! Tonearm - demo entry point
//!
//! Wires the playback engine to the simulated audio backend and plays
//! through the files given on the command line, logging engine events.
//! Real deployments provide their own [`tonearm_player::backend::AudioBackend`]
//! over an actual media stack.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tonearm_common::config::resolve_music_folder;
use tonearm_common::settings::PlaybackSettings;
use tonearm_common::track::{Library, Track};
use tonearm_common::PlayerEvent;
use tonearm_player::backend::SimulatedBackend;
use tonearm_player::PlaybackEngine;

/// Command-line arguments for tonearm
#[derive(Parser, Debug)]
#[command(name = "tonearm")]
#[command(about = "Tonearm playback engine demo")]
#[command(version)]
struct Args {
    /// Music folder (falls back to TONEARM_MUSIC_FOLDER, then config file)
    #[arg(short, long)]
    music_folder: Option<String>,

    /// Crossfade duration in seconds
    #[arg(short, long, default_value = "0.0")]
    crossfade: f32,

    /// Playback clock tick interval in milliseconds
    #[arg(long, default_value = "200")]
    tick_ms: u64,

    /// Nominal track duration in seconds for the simulated backend
    #[arg(long, default_value = "180")]
    nominal_secs: u64,

    /// Files to play, in order
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tonearm=info,tonearm_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let music_folder =
        resolve_music_folder(args.music_folder.as_deref(), "TONEARM_MUSIC_FOLDER")
            .context("Failed to resolve music folder")?;
    info!("Music folder: {}", music_folder.display());

    let mut library = Library::new("Session");
    for path in &args.files {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        library.add(Track::file(
            title,
            "",
            "",
            Duration::from_secs(args.nominal_secs),
            path.clone(),
        ));
    }
    if library.is_empty() {
        anyhow::bail!("no files given; pass audio files to play");
    }

    let mut settings = PlaybackSettings::new();
    settings.set_crossfade_secs(args.crossfade);

    // Simulated backend: advances positions against the wall clock with no
    // audio device, which is all the demo needs
    let engine = Arc::new(
        PlaybackEngine::new(Arc::new(SimulatedBackend::new()), library, settings)
            .with_tick_interval(Duration::from_millis(args.tick_ms)),
    );

    let mut events = engine.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                PlayerEvent::PlaybackProgress { elapsed, total, .. } => {
                    info!("position {} / {}", elapsed, total);
                }
                other => info!(?other, "event"),
            }
        }
    });

    engine.run().await;
    engine
        .play_from_library(0)
        .await
        .context("Failed to start playback")?;

    shutdown_signal().await;
    engine.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
