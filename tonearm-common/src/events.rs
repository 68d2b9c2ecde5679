//! Event types for the Tonearm player
//!
//! The playback engine publishes these on state transitions and clock
//! ticks; UI layers and other observers subscribe through a broadcast
//! channel rather than binding to engine internals.

use crate::track::TrackSource;
use serde::{Deserialize, Serialize};

/// Engine state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,
    /// Track loaded, not yet started
    Loaded,
    Playing,
    Paused,
    /// Transient: two sessions overlap during a gain ramp
    Crossfading,
}

impl PlaybackState {
    /// True while audio should be advancing
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Crossfading)
    }
}

/// Player event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Playback state changed
    PlaybackStateChanged {
        state: PlaybackState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A new track became the current session
    TrackStarted {
        source: TrackSource,
        title: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback reached Idle with nothing left to play
    PlaybackStopped {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Position update, published at the clock tick rate
    PlaybackProgress {
        position_ms: u64,
        /// None for live streams
        duration_ms: Option<u64>,
        /// Progress ratio in [0, 1]; 0 for streams without a duration
        ratio: f64,
        /// Formatted elapsed time (M:SS or H:MM:SS)
        elapsed: String,
        /// Formatted total time; "--:--" for streams
        total: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Volume changed
    VolumeChanged {
        volume: f32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Balance changed
    BalanceChanged {
        balance: f32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Queue contents changed
    QueueChanged {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Crossfade ramp began
    CrossfadeStarted {
        from: TrackSource,
        to: TrackSource,
        duration_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Crossfade ramp completed; `track` is the sole session now
    CrossfadeCompleted {
        track: TrackSource,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Active karaoke line changed (None when position precedes all lines)
    KaraokeLineChanged {
        index: Option<usize>,
        text: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tag() {
        let event = PlayerEvent::PlaybackStateChanged {
            state: PlaybackState::Playing,
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"PlaybackStateChanged\""));
        assert!(json.contains("\"state\":\"Playing\""));
    }

    #[test]
    fn test_is_playing() {
        assert!(PlaybackState::Playing.is_playing());
        assert!(PlaybackState::Crossfading.is_playing());
        assert!(!PlaybackState::Paused.is_playing());
        assert!(!PlaybackState::Idle.is_playing());
        assert!(!PlaybackState::Loaded.is_playing());
    }
}
