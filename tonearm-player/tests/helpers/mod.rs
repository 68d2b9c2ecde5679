//! Test helper module for engine integration tests
//!
//! Builds an engine on the simulated backend with a manually stepped
//! clock, so tests drive ticks deterministically instead of sleeping.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tonearm_common::events::PlayerEvent;
use tonearm_common::settings::PlaybackSettings;
use tonearm_common::track::{Library, Track};
use tonearm_player::backend::{AudioBackend, ManualClock, SimulatedBackend};
use tonearm_player::playback::engine::DEFAULT_TICK_INTERVAL;
use tonearm_player::PlaybackEngine;

/// Engine under test plus its clock handle
pub struct TestPlayer {
    pub engine: PlaybackEngine,
    pub clock: ManualClock,
    pub backend: Arc<SimulatedBackend>,
}

pub fn file_track(title: &str, path: &str, secs: u64) -> Track {
    Track::file(title, "Artist", "Rock", Duration::from_secs(secs), path)
}

pub fn settings_with_crossfade(secs: f32) -> PlaybackSettings {
    let mut settings = PlaybackSettings::new();
    settings.set_crossfade_secs(secs);
    settings
}

/// Engine over the given library tracks with a manually stepped clock
pub fn player(tracks: &[Track], settings: PlaybackSettings) -> TestPlayer {
    let (backend, clock) = SimulatedBackend::with_manual_clock();
    let backend = Arc::new(backend);

    let mut library = Library::new("Test");
    for track in tracks {
        library.add(track.clone());
    }

    let engine = PlaybackEngine::new(
        Arc::clone(&backend) as Arc<dyn AudioBackend>,
        library,
        settings,
    );
    TestPlayer {
        engine,
        clock,
        backend,
    }
}

impl TestPlayer {
    /// Advance playback by `ms`, stepping the clock and ticking the
    /// engine at the default tick interval
    pub async fn step_ms(&self, ms: u64) {
        let tick_ms = DEFAULT_TICK_INTERVAL.as_millis() as u64;
        let mut left = ms;
        while left > 0 {
            let step = left.min(tick_ms);
            self.clock.advance_ms(step);
            self.engine.tick().await;
            left -= step;
        }
    }

    /// Title of the track observers currently see, or None when Idle
    pub async fn current_title(&self) -> Option<String> {
        self.engine
            .shared_state()
            .get_current_track()
            .await
            .map(|t| t.title)
    }
}

/// Pull everything pending off an event receiver
pub fn drain_events(rx: &mut broadcast::Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}
