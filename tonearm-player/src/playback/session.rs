//! Playback session
//!
//! One loaded track together with its open audio sink. Sessions are owned
//! exclusively by the engine: created on load, dropped on every track
//! change, and dropping releases the decoder handle.

use crate::backend::AudioSink;
use std::time::Duration;
use tonearm_common::equalizer::Equalizer;
use tonearm_common::settings::PlaybackSettings;
use tonearm_common::track::Track;

/// The currently loaded track, its live position, and its sink
pub struct PlaybackSession {
    track: Track,
    sink: Box<dyn AudioSink>,
}

impl PlaybackSession {
    pub fn new(track: Track, sink: Box<dyn AudioSink>) -> Self {
        Self { track, sink }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn play(&mut self) {
        self.sink.play();
    }

    pub fn pause(&mut self) {
        self.sink.pause();
    }

    pub fn position(&self) -> Duration {
        self.sink.position()
    }

    pub fn position_ms(&self) -> u64 {
        self.position().as_millis() as u64
    }

    /// Media duration; None for live streams
    pub fn duration(&self) -> Option<Duration> {
        self.sink.duration()
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration().map(|d| d.as_millis() as u64)
    }

    /// Progress ratio in [0, 1]; 0 for streams without a duration
    pub fn progress(&self) -> f64 {
        match self.duration() {
            Some(duration) if !duration.is_zero() => {
                (self.position().as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Time left until the media ends; None for streams
    pub fn remaining(&self) -> Option<Duration> {
        self.duration()
            .map(|d| d.saturating_sub(self.position()))
    }

    /// True once the position has reached the media duration
    pub fn at_end(&self) -> bool {
        matches!(self.remaining(), Some(rem) if rem.is_zero())
    }

    /// Compose a ramp gain with master volume and balance and push the
    /// per-channel result to the sink
    pub fn apply_gain(&mut self, ramp_gain: f32, settings: &PlaybackSettings) {
        let (left, right) = settings.channel_gains();
        let master = settings.volume() * ramp_gain.clamp(0.0, 1.0);
        self.sink.set_channel_gains(master * left, master * right);
    }

    /// Push equalizer band gains to the sink
    pub fn apply_equalizer(&mut self, equalizer: &Equalizer) {
        self.sink.set_band_gains(&equalizer.band_gains());
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("track", &self.track.source)
            .field("position", &self.position())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AudioBackend, SimulatedBackend};

    fn session(duration_secs: u64) -> (PlaybackSession, crate::backend::ManualClock) {
        let (backend, clock) = SimulatedBackend::with_manual_clock();
        let track = Track::file(
            "A",
            "Artist",
            "Rock",
            Duration::from_secs(duration_secs),
            "/music/a.mp3",
        );
        let sink = backend.open(&track).unwrap();
        (PlaybackSession::new(track, sink), clock)
    }

    #[test]
    fn test_progress_ratio() {
        let (mut session, clock) = session(200);
        assert_eq!(session.progress(), 0.0);

        session.play();
        clock.advance_ms(50_000);
        assert!((session.progress() - 0.25).abs() < 1e-9);

        clock.advance_ms(300_000);
        assert_eq!(session.progress(), 1.0);
        assert!(session.at_end());
    }

    #[test]
    fn test_gain_composition() {
        use crate::backend::AudioSink;
        use std::sync::{Arc, Mutex};
        use tonearm_common::equalizer::BAND_COUNT;

        struct RecordingSink(Arc<Mutex<(f32, f32)>>);
        impl AudioSink for RecordingSink {
            fn play(&mut self) {}
            fn pause(&mut self) {}
            fn set_channel_gains(&mut self, left: f32, right: f32) {
                *self.0.lock().unwrap() = (left, right);
            }
            fn set_band_gains(&mut self, _gains_db: &[f32; BAND_COUNT]) {}
            fn position(&self) -> Duration {
                Duration::ZERO
            }
            fn duration(&self) -> Option<Duration> {
                None
            }
        }

        let gains = Arc::new(Mutex::new((1.0, 1.0)));
        let track = Track::file("A", "Artist", "Rock", Duration::from_secs(60), "/music/a.mp3");
        let mut session = PlaybackSession::new(track, Box::new(RecordingSink(Arc::clone(&gains))));

        let mut settings = PlaybackSettings::new();
        settings.set_volume(0.5);
        settings.set_balance(-1.0); // fully left

        session.apply_gain(0.5, &settings);
        let (left, right) = *gains.lock().unwrap();
        assert!((left - 0.25).abs() < 1e-6);
        assert_eq!(right, 0.0);

        // Ramp gain outside [0, 1] is clamped before composing
        session.apply_gain(7.0, &settings);
        let (left, _) = *gains.lock().unwrap();
        assert!((left - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_remaining() {
        let (mut session, clock) = session(180);
        session.play();
        clock.advance_ms(175_000);
        assert_eq!(session.remaining(), Some(Duration::from_secs(5)));
        assert!(!session.at_end());
    }
}
