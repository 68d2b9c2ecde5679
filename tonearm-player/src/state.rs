//! Shared playback state
//!
//! Thread-safe state shared between the engine, its clock task, and
//! observers. Observers subscribe to the event broadcast channel instead
//! of binding to engine internals.

use tokio::sync::{broadcast, RwLock};
use tonearm_common::events::{PlaybackState, PlayerEvent};
use tonearm_common::track::TrackSource;

/// Snapshot of the current session for observers
#[derive(Debug, Clone)]
pub struct CurrentTrack {
    pub source: TrackSource,
    pub title: String,
    /// Current position in milliseconds
    pub position_ms: u64,
    /// Total duration in milliseconds; None for live streams
    pub duration_ms: Option<u64>,
}

/// Shared state accessible by all components
///
/// RwLock for concurrent read access with rare writes.
pub struct SharedState {
    playback_state: RwLock<PlaybackState>,

    /// Currently playing track (None when Idle)
    current_track: RwLock<Option<CurrentTrack>>,

    /// Event broadcaster for observers
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl SharedState {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            playback_state: RwLock::new(PlaybackState::Idle),
            current_track: RwLock::new(None),
            event_tx,
        }
    }

    /// Broadcast an event to all subscribers (no receivers is fine)
    pub fn broadcast_event(&self, event: PlayerEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    pub async fn get_playback_state(&self) -> PlaybackState {
        *self.playback_state.read().await
    }

    /// Set the playback state, broadcasting the transition when it changed
    pub async fn set_playback_state(&self, state: PlaybackState) {
        let mut guard = self.playback_state.write().await;
        if *guard != state {
            *guard = state;
            drop(guard);
            self.broadcast_event(PlayerEvent::PlaybackStateChanged {
                state,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    pub async fn get_current_track(&self) -> Option<CurrentTrack> {
        self.current_track.read().await.clone()
    }

    pub async fn set_current_track(&self, track: Option<CurrentTrack>) {
        *self.current_track.write().await = track;
    }

    /// Playing/paused boolean for simple observers
    pub async fn is_playing(&self) -> bool {
        self.get_playback_state().await.is_playing()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_default_state_is_idle() {
        let state = SharedState::new();
        assert_eq!(state.get_playback_state().await, PlaybackState::Idle);
        assert!(state.get_current_track().await.is_none());
        assert!(!state.is_playing().await);
    }

    #[tokio::test]
    async fn test_state_transition_broadcasts() {
        let state = SharedState::new();
        let mut events = state.subscribe_events();

        state.set_playback_state(PlaybackState::Playing).await;
        assert!(state.is_playing().await);

        match events.try_recv().unwrap() {
            PlayerEvent::PlaybackStateChanged { state, .. } => {
                assert_eq!(state, PlaybackState::Playing);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // Setting the same state again does not re-broadcast
        state.set_playback_state(PlaybackState::Playing).await;
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_current_track_snapshot() {
        let state = SharedState::new();
        state
            .set_current_track(Some(CurrentTrack {
                source: TrackSource::File(PathBuf::from("/music/a.mp3")),
                title: "A".to_string(),
                position_ms: 1_000,
                duration_ms: Some(180_000),
            }))
            .await;

        let snapshot = state.get_current_track().await.unwrap();
        assert_eq!(snapshot.title, "A");
        assert_eq!(snapshot.position_ms, 1_000);
    }
}
