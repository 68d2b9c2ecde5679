//! Audio backend contract
//!
//! The engine never decodes or renders audio itself; it addresses an
//! opaque media backend through load/play/pause/set-gain primitives. A
//! session's decoder handle is released when its [`AudioSink`] is dropped,
//! so resource release happens even on error paths.
//!
//! [`SimulatedBackend`] is a clock-driven implementation with no audio
//! device, used by the demo binary and by tests (with a manually stepped
//! clock).

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tonearm_common::equalizer::BAND_COUNT;
use tonearm_common::track::{Track, TrackSource};
use tracing::debug;

/// One open playback resource (decoder + output route) for a single track
///
/// Sinks live inside the engine's shared core behind a tokio lock, so the
/// spawned clock task requires them to be `Send + Sync`.
pub trait AudioSink: Send + Sync {
    /// Begin or resume rendering
    fn play(&mut self);

    /// Suspend rendering, keeping the position
    fn pause(&mut self);

    /// Set independent left/right gain multipliers (volume, balance, and
    /// crossfade ramp already composed by the caller)
    fn set_channel_gains(&mut self, left: f32, right: f32);

    /// Push equalizer band gains to the render pipeline
    fn set_band_gains(&mut self, gains_db: &[f32; BAND_COUNT]);

    /// Current playback position
    fn position(&self) -> Duration;

    /// Media duration; None for live streams
    fn duration(&self) -> Option<Duration>;
}

/// Factory for playback resources
///
/// `open` may block briefly on file or stream I/O; the engine wraps it in
/// a blocking task with a timeout so the clock tick is never frozen.
pub trait AudioBackend: Send + Sync {
    fn open(&self, track: &Track) -> Result<Box<dyn AudioSink>>;
}

/// Time source for the simulated backend
#[derive(Clone)]
enum ClockSource {
    Wall(Instant),
    Manual(Arc<Mutex<Duration>>),
}

impl ClockSource {
    fn now(&self) -> Duration {
        match self {
            ClockSource::Wall(epoch) => epoch.elapsed(),
            ClockSource::Manual(t) => *t.lock().unwrap(),
        }
    }
}

/// Handle for stepping a simulated backend's clock from tests
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<Duration>>);

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

/// Clock-driven backend with no audio device
///
/// "Plays" tracks by advancing a position against a clock; file-backed
/// tracks take their media duration from the track metadata.
pub struct SimulatedBackend {
    clock: ClockSource,
    /// Check that file sources exist on open (wall-clock mode only)
    verify_files: bool,
    /// Sources registered to fail on open, for error-path testing
    failing: Mutex<HashSet<TrackSource>>,
    /// Artificial blocking delay on every open, to exercise in-flight loads
    open_delay: Mutex<Option<Duration>>,
}

impl SimulatedBackend {
    /// Wall-clock backend for the demo binary; file sources must exist
    pub fn new() -> Self {
        Self {
            clock: ClockSource::Wall(Instant::now()),
            verify_files: true,
            failing: Mutex::new(HashSet::new()),
            open_delay: Mutex::new(None),
        }
    }

    /// Backend with a manually stepped clock, for deterministic tests
    pub fn with_manual_clock() -> (Self, ManualClock) {
        let time = Arc::new(Mutex::new(Duration::ZERO));
        let backend = Self {
            clock: ClockSource::Manual(Arc::clone(&time)),
            verify_files: false,
            failing: Mutex::new(HashSet::new()),
            open_delay: Mutex::new(None),
        };
        (backend, ManualClock(time))
    }

    /// Register a source whose open will fail with a backend error
    pub fn fail_on(&self, source: TrackSource) {
        self.failing.lock().unwrap().insert(source);
    }

    /// Make every open block for `delay`, like slow file or stream I/O
    pub fn delay_open(&self, delay: Duration) {
        *self.open_delay.lock().unwrap() = Some(delay);
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for SimulatedBackend {
    fn open(&self, track: &Track) -> Result<Box<dyn AudioSink>> {
        if self.failing.lock().unwrap().contains(&track.source) {
            return Err(Error::Backend(format!(
                "cannot open {}",
                track.source.describe()
            )));
        }
        // Engine opens sinks on a blocking task, so sleeping here models
        // slow media I/O without stalling its clock
        let delay = *self.open_delay.lock().unwrap();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        if self.verify_files {
            if let TrackSource::File(path) = &track.source {
                if !path.exists() {
                    return Err(Error::Backend(format!(
                        "file not found: {}",
                        path.display()
                    )));
                }
            }
        }

        debug!(source = %track.source.describe(), "opened simulated sink");
        Ok(Box::new(SimulatedSink {
            clock: self.clock.clone(),
            media_duration: track.duration,
            playing: false,
            played: Duration::ZERO,
            resumed_at: Duration::ZERO,
        }))
    }
}

struct SimulatedSink {
    clock: ClockSource,
    media_duration: Option<Duration>,
    playing: bool,
    /// Accumulated play time up to the last pause
    played: Duration,
    /// Clock reading when playback last resumed
    resumed_at: Duration,
}

impl AudioSink for SimulatedSink {
    fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.resumed_at = self.clock.now();
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.played += self.clock.now().saturating_sub(self.resumed_at);
            self.playing = false;
        }
    }

    fn set_channel_gains(&mut self, _left: f32, _right: f32) {}

    fn set_band_gains(&mut self, _gains_db: &[f32; BAND_COUNT]) {}

    fn position(&self) -> Duration {
        let raw = if self.playing {
            self.played + self.clock.now().saturating_sub(self.resumed_at)
        } else {
            self.played
        };
        match self.media_duration {
            Some(duration) => raw.min(duration),
            None => raw,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.media_duration
    }
}
