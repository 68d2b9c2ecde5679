//! Playback engine orchestration
//!
//! Coordinates track selection across Library and Queue, session lifetime,
//! crossfade scheduling, equalizer and balance application, and progress
//! publication.
//!
//! A single clock task drives all position-dependent work: progress
//! events, karaoke line lookup, crossfade ramp sampling, and end-of-track
//! detection. Every tick and every transport command takes the core write
//! lock for its whole critical section, so ticks are strictly ordered and
//! can never observe a half-cancelled crossfade. Track loads run on a
//! blocking task with a timeout and are committed only if no newer command
//! superseded them (generation check).

use crate::backend::AudioBackend;
use crate::error::{Error, Result};
use crate::playback::crossfade::{Crossfade, RampStep};
use crate::playback::karaoke::KaraokeSync;
use crate::playback::session::PlaybackSession;
use crate::state::{CurrentTrack, SharedState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{interval, MissedTickBehavior};
use tonearm_common::events::{PlaybackState, PlayerEvent};
use tonearm_common::karaoke::KaraokeTrack;
use tonearm_common::settings::PlaybackSettings;
use tonearm_common::time::format_progress;
use tonearm_common::track::{Library, Queue, Track};
use tonearm_common::Error as CommonError;
use tracing::{debug, info, warn};

/// Default playback clock tick interval
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Upper bound for a single track load
const LOAD_TIMEOUT_SECS: u64 = 10;

/// Which ordered collection the engine is currently playing from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaySource {
    Library,
    Queue,
}

/// Session ownership for the current engine phase
enum Phase {
    /// No track loaded
    Idle,
    /// One session, playing or paused
    Single { session: PlaybackSession },
    /// Two overlapping sessions during a gain ramp
    Crossfading { fade: Crossfade },
}

/// State guarded by one lock so ticks and commands serialize
struct EngineCore {
    phase: Phase,
    paused: bool,
    source: PlaySource,
    /// Index of the last library track played; continuation point for next()
    library_index: Option<usize>,
    /// Tracks played from the queue, most recent last (previous() support)
    queue_history: Vec<Track>,
    karaoke: KaraokeSync,
    /// Bumped by every transport command; stale async loads are discarded
    generation: u64,
    /// True while a track load is in flight; the clock must not start
    /// another advance until it resolves
    pending_advance: bool,
}

/// A chosen track together with where it came from
struct Selection {
    track: Track,
    source: PlaySource,
    /// New library continuation index (library-sourced selections only)
    library_index: Option<usize>,
    /// Record the track in the queue history on commit
    push_history: bool,
}

/// Playback engine - owns all sessions and the playback clock
pub struct PlaybackEngine {
    state: Arc<SharedState>,
    backend: Arc<dyn AudioBackend>,
    library: Arc<RwLock<Library>>,
    queue: Arc<RwLock<Queue>>,
    settings: Arc<RwLock<PlaybackSettings>>,
    core: Arc<RwLock<EngineCore>>,
    running: Arc<RwLock<bool>>,
    tick_interval: Duration,
}

impl PlaybackEngine {
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        library: Library,
        settings: PlaybackSettings,
    ) -> Self {
        Self {
            state: Arc::new(SharedState::new()),
            backend,
            library: Arc::new(RwLock::new(library)),
            queue: Arc::new(RwLock::new(Queue::new())),
            settings: Arc::new(RwLock::new(settings)),
            core: Arc::new(RwLock::new(EngineCore {
                phase: Phase::Idle,
                paused: false,
                source: PlaySource::Library,
                library_index: None,
                queue_history: Vec::new(),
                karaoke: KaraokeSync::new(),
                generation: 0,
                pending_advance: false,
            })),
            running: Arc::new(RwLock::new(false)),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Override the clock tick interval (bounded to [50 ms, 1 s])
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval
            .clamp(Duration::from_millis(50), Duration::from_secs(1));
        self
    }

    /// Shared state handle for observers
    pub fn shared_state(&self) -> Arc<SharedState> {
        Arc::clone(&self.state)
    }

    /// Subscribe to engine events
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<PlayerEvent> {
        self.state.subscribe_events()
    }

    /// Library handle (shared with UI layers)
    pub fn library(&self) -> Arc<RwLock<Library>> {
        Arc::clone(&self.library)
    }

    /// Queue handle
    pub fn queue(&self) -> Arc<RwLock<Queue>> {
        Arc::clone(&self.queue)
    }

    pub async fn playback_state(&self) -> PlaybackState {
        self.state.get_playback_state().await
    }

    /// Start the playback clock task
    pub async fn run(&self) {
        *self.running.write().await = true;

        let engine = self.clone_handles();
        tokio::spawn(async move {
            let mut tick = interval(engine.tick_interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                if !*engine.running.read().await {
                    break;
                }
                engine.tick().await;
            }
            debug!("playback clock stopped");
        });

        info!(tick_ms = self.tick_interval.as_millis() as u64, "playback engine started");
    }

    /// Stop the clock task and release all sessions
    pub async fn shutdown(&self) {
        *self.running.write().await = false;
        self.stop().await;
        info!("playback engine stopped");
    }

    // ------------------------------------------------------------------
    // Transport commands
    // ------------------------------------------------------------------

    /// Play the library track at `index`
    ///
    /// Cancels any in-flight load or crossfade. `IndexOutOfRange` leaves
    /// the engine untouched.
    pub async fn play_from_library(&self, index: usize) -> Result<()> {
        let track = self.library.read().await.get(index)?.clone();
        info!(index, track = %track.source.describe(), "play from library");
        self.transition(
            Selection {
                track,
                source: PlaySource::Library,
                library_index: Some(index),
                push_history: false,
            },
            false,
            None,
        )
        .await
    }

    /// Play (and consume) the queue track at `index`
    pub async fn play_from_queue(&self, index: usize) -> Result<()> {
        let track = self.queue.write().await.take(index)?;
        self.state.broadcast_event(PlayerEvent::QueueChanged {
            timestamp: chrono::Utc::now(),
        });
        info!(index, track = %track.source.describe(), "play from queue");
        self.transition(
            Selection {
                track,
                source: PlaySource::Queue,
                library_index: None,
                push_history: true,
            },
            false,
            None,
        )
        .await
    }

    /// Pause playback; silent no-op from Idle or when already paused
    pub async fn pause(&self) {
        let mut core = self.core.write().await;
        if core.paused {
            return;
        }
        let EngineCore { phase, paused, .. } = &mut *core;
        match phase {
            Phase::Idle => return,
            Phase::Single { session } => session.pause(),
            Phase::Crossfading { fade } => {
                let (outgoing, incoming) = fade.sessions_mut();
                outgoing.pause();
                incoming.pause();
            }
        }
        *paused = true;
        drop(core);
        self.state.set_playback_state(PlaybackState::Paused).await;
    }

    /// Resume playback; silent no-op unless paused
    pub async fn unpause(&self) {
        let mut core = self.core.write().await;
        if !core.paused {
            return;
        }
        let EngineCore { phase, paused, .. } = &mut *core;
        let resumed_state = match phase {
            Phase::Idle => return,
            Phase::Single { session } => {
                session.play();
                PlaybackState::Playing
            }
            Phase::Crossfading { fade } => {
                let (outgoing, incoming) = fade.sessions_mut();
                outgoing.play();
                incoming.play();
                PlaybackState::Crossfading
            }
        };
        *paused = false;
        drop(core);
        self.state.set_playback_state(resumed_state).await;
    }

    /// Stop playback, cancel anything in flight, release all sessions
    pub async fn stop(&self) {
        let mut core = self.core.write().await;
        core.generation += 1;
        core.phase = Phase::Idle;
        core.paused = false;
        core.pending_advance = false;
        core.karaoke.set_track(None);
        drop(core);

        self.state.set_current_track(None).await;
        self.state.set_playback_state(PlaybackState::Idle).await;
        self.state.broadcast_event(PlayerEvent::PlaybackStopped {
            timestamp: chrono::Utc::now(),
        });
    }

    /// Advance to the next track
    ///
    /// The queue front pre-empts library continuation; otherwise the
    /// current source advances sequentially, clamped at the end. End of
    /// library with an empty queue stops playback. Skips crossfade when a
    /// ramp duration is configured.
    pub async fn next(&self) -> Result<()> {
        match self.select_next().await {
            Some(selection) => self.transition(selection, true, None).await,
            None => {
                info!("nothing left to play");
                self.stop().await;
                Ok(())
            }
        }
    }

    /// Return to the previously played queue track
    ///
    /// Only meaningful while sourced from the queue; otherwise a no-op.
    pub async fn previous(&self) -> Result<()> {
        let selection = {
            let mut core = self.core.write().await;
            if core.source != PlaySource::Queue || core.queue_history.len() < 2 {
                debug!("previous: no earlier queue track, ignoring");
                return Ok(());
            }
            // Drop the current entry; the one before it becomes current
            core.queue_history.pop();
            let track = core
                .queue_history
                .last()
                .cloned()
                .expect("history checked non-empty");
            Selection {
                track,
                source: PlaySource::Queue,
                library_index: None,
                push_history: false,
            }
        };
        self.transition(selection, true, None).await
    }

    /// Append a track to the play-next queue
    pub async fn enqueue(&self, track: Track) {
        self.queue.write().await.push(track);
        self.state.broadcast_event(PlayerEvent::QueueChanged {
            timestamp: chrono::Utc::now(),
        });
    }

    /// Load karaoke lines for the current track, resetting the cursor
    pub async fn set_karaoke(&self, track: Option<KaraokeTrack>) {
        self.core.write().await.karaoke.set_track(track);
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub async fn volume(&self) -> f32 {
        self.settings.read().await.volume()
    }

    pub async fn set_volume(&self, volume: f32) {
        let mut core = self.core.write().await;
        let mut settings = self.settings.write().await;
        settings.set_volume(volume);
        Self::push_gains(&mut core, &settings);
        let volume = settings.volume();
        drop(settings);
        drop(core);
        self.state.broadcast_event(PlayerEvent::VolumeChanged {
            volume,
            timestamp: chrono::Utc::now(),
        });
    }

    pub async fn balance(&self) -> f32 {
        self.settings.read().await.balance()
    }

    /// Set the left/right skew, applied to every live session (both
    /// sessions identically during a crossfade)
    pub async fn set_balance(&self, balance: f32) {
        let mut core = self.core.write().await;
        let mut settings = self.settings.write().await;
        settings.set_balance(balance);
        Self::push_gains(&mut core, &settings);
        let balance = settings.balance();
        drop(settings);
        drop(core);
        self.state.broadcast_event(PlayerEvent::BalanceChanged {
            balance,
            timestamp: chrono::Utc::now(),
        });
    }

    pub async fn crossfade_secs(&self) -> f32 {
        self.settings.read().await.crossfade_secs()
    }

    pub async fn set_crossfade_secs(&self, secs: f32) {
        self.settings.write().await.set_crossfade_secs(secs);
    }

    /// Equalizer band gains for rendering sliders
    pub async fn band_gains(&self) -> [f32; tonearm_common::equalizer::BAND_COUNT] {
        self.settings.read().await.equalizer.band_gains()
    }

    /// Set one equalizer band, pushing the new curve to live sessions
    pub async fn set_band_gain(&self, index: usize, gain_db: f32) -> Result<()> {
        let mut core = self.core.write().await;
        let mut settings = self.settings.write().await;
        settings.equalizer.set_band_gain(index, gain_db)?;
        let equalizer = settings.equalizer;
        drop(settings);
        match &mut core.phase {
            Phase::Idle => {}
            Phase::Single { session } => session.apply_equalizer(&equalizer),
            Phase::Crossfading { fade } => {
                let (outgoing, incoming) = fade.sessions_mut();
                outgoing.apply_equalizer(&equalizer);
                incoming.apply_equalizer(&equalizer);
            }
        }
        Ok(())
    }

    /// Snapshot of the current settings
    pub async fn settings(&self) -> PlaybackSettings {
        self.settings.read().await.clone()
    }

    // ------------------------------------------------------------------
    // Clock
    // ------------------------------------------------------------------

    /// One playback clock tick
    ///
    /// Samples the session position, publishes progress, drives the
    /// karaoke cursor, advances an active crossfade ramp, and resolves
    /// end-of-track. Called by the clock task; tests may call it directly.
    pub async fn tick(&self) {
        /// Why the tick wants a track change
        enum Advance {
            /// Media ended; stop if nothing is left to play
            EndOfTrack,
            /// Remaining time entered the crossfade window; only advance
            /// when a next track actually exists
            CrossfadeWindow,
        }

        let mut advance: Option<(Advance, u64)> = None;
        let mut snapshot: Option<CurrentTrack> = None;

        {
            let mut core = self.core.write().await;
            if core.paused {
                return;
            }
            let settings = self.settings.read().await;
            let EngineCore {
                phase,
                karaoke,
                generation,
                pending_advance,
                ..
            } = &mut *core;

            match phase {
                Phase::Idle => return,

                Phase::Single { session } => {
                    Self::publish_progress(&self.state, session);
                    Self::publish_karaoke(&self.state, karaoke, session.position_ms());
                    snapshot = Some(Self::snapshot(session));

                    // One advance at a time: while a load is in flight the
                    // window must not fire again, or the queue drains
                    if !*pending_advance {
                        if session.at_end() {
                            advance = Some((Advance::EndOfTrack, *generation));
                            *pending_advance = true;
                        } else if settings.crossfade_enabled() {
                            if let Some(remaining) = session.remaining() {
                                if remaining.as_secs_f32() <= settings.crossfade_secs() {
                                    advance = Some((Advance::CrossfadeWindow, *generation));
                                    *pending_advance = true;
                                }
                            }
                        }
                    }
                }

                Phase::Crossfading { fade } => {
                    match fade.advance(self.tick_interval) {
                        RampStep::Running {
                            outgoing_gain,
                            incoming_gain,
                        } => {
                            let (outgoing, incoming) = fade.sessions_mut();
                            outgoing.apply_gain(outgoing_gain, &settings);
                            incoming.apply_gain(incoming_gain, &settings);
                            Self::publish_progress(&self.state, incoming);
                            Self::publish_karaoke(&self.state, karaoke, incoming.position_ms());
                            snapshot = Some(Self::snapshot(incoming));
                        }
                        RampStep::Complete => {
                            // Outgoing gain hit 0.0 and the timer hit the
                            // configured duration: release the outgoing
                            // session, the incoming one plays on alone.
                            let old = std::mem::replace(phase, Phase::Idle);
                            if let Phase::Crossfading { fade } = old {
                                let mut session = fade.into_incoming();
                                session.apply_gain(1.0, &settings);
                                let source = session.track().source.clone();
                                snapshot = Some(Self::snapshot(&session));
                                *phase = Phase::Single { session };
                                drop(settings);
                                drop(core);
                                self.state.broadcast_event(PlayerEvent::CrossfadeCompleted {
                                    track: source,
                                    timestamp: chrono::Utc::now(),
                                });
                                self.state.set_current_track(snapshot).await;
                                self.state.set_playback_state(PlaybackState::Playing).await;
                                return;
                            }
                        }
                    }
                }
            }
        }

        if let Some(snapshot) = snapshot {
            self.state.set_current_track(Some(snapshot)).await;
        }

        match advance {
            Some((Advance::EndOfTrack, decided)) => {
                if let Err(e) = self.advance_track(decided, true).await {
                    warn!(error = %e, "automatic track advance failed");
                }
            }
            Some((Advance::CrossfadeWindow, decided)) => {
                if let Err(e) = self.advance_track(decided, false).await {
                    warn!(error = %e, "crossfade start failed");
                }
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Resolve a clock-decided advance
    ///
    /// A transport command issued after the decision bumps the generation;
    /// the advance is then abandoned without consuming a queue entry. With
    /// nothing selectable, end-of-track stops playback and the crossfade
    /// window lets the session play to its end.
    async fn advance_track(&self, decided_generation: u64, end_of_track: bool) -> Result<()> {
        if self.core.read().await.generation != decided_generation {
            debug!("advance superseded before selection, abandoning");
            return Ok(());
        }

        match self.select_next().await {
            Some(selection) => {
                self.transition(selection, true, Some(decided_generation))
                    .await
            }
            None => {
                self.core.write().await.pending_advance = false;
                if end_of_track {
                    info!("nothing left to play");
                    self.stop().await;
                }
                Ok(())
            }
        }
    }

    /// Pick the track next() should play, consuming the queue front when
    /// one is pending
    async fn select_next(&self) -> Option<Selection> {
        // Queue pre-empts library continuation
        if let Ok(track) = self.queue.write().await.pop() {
            self.state.broadcast_event(PlayerEvent::QueueChanged {
                timestamp: chrono::Utc::now(),
            });
            return Some(Selection {
                track,
                source: PlaySource::Queue,
                library_index: None,
                push_history: true,
            });
        }

        let next_index = self.core.read().await.library_index.map(|i| i + 1)?;
        let track = self.library.read().await.get(next_index).ok()?.clone();
        Some(Selection {
            track,
            source: PlaySource::Library,
            library_index: Some(next_index),
            push_history: false,
        })
    }

    /// Replace the current phase with a newly loaded session for
    /// `selection`, optionally ramping over the configured crossfade
    ///
    /// The load runs without the core lock; a generation check on commit
    /// discards it if a newer command arrived meanwhile. Clock-decided
    /// advances pass the generation they were decided under and abort here
    /// when a transport command got in first.
    async fn transition(
        &self,
        selection: Selection,
        allow_crossfade: bool,
        decided_generation: Option<u64>,
    ) -> Result<()> {
        // Decide up front whether this becomes a crossfade; a plain play
        // cancels whatever is active before loading.
        let (generation, crossfading, fade_duration) = {
            let mut core = self.core.write().await;
            if let Some(decided) = decided_generation {
                if core.generation != decided {
                    // The superseding command owns the pending flag now
                    debug!(
                        track = %selection.track.source.describe(),
                        "advance superseded, abandoning"
                    );
                    return Ok(());
                }
            }
            core.generation += 1;
            core.pending_advance = true;
            let settings = self.settings.read().await;
            let want_fade = allow_crossfade
                && settings.crossfade_enabled()
                && !core.paused
                && matches!(core.phase, Phase::Single { .. });
            let fade_duration = Duration::from_secs_f32(settings.crossfade_secs());
            drop(settings);
            if !want_fade {
                // Release prior sessions now; no tick can observe them again
                core.phase = Phase::Idle;
                core.paused = false;
            }
            (core.generation, want_fade, fade_duration)
        };

        let loaded = self.load_session(selection.track.clone()).await;

        let mut core = self.core.write().await;
        if core.generation != generation {
            debug!(track = %selection.track.source.describe(), "load superseded, discarding");
            return Ok(());
        }
        core.pending_advance = false;

        let mut session = match loaded {
            Ok(session) => session,
            Err(e) => {
                warn!(
                    error = %e,
                    track = %selection.track.source.describe(),
                    "track load failed"
                );
                // Move the continuation point past the bad track so the
                // next advance does not retry it forever
                if selection.source == PlaySource::Library {
                    core.library_index = selection.library_index;
                }
                if crossfading && matches!(core.phase, Phase::Single { .. }) {
                    // Keep the current session playing to its natural end
                    return Err(e);
                }
                core.phase = Phase::Idle;
                core.paused = false;
                core.karaoke.set_track(None);
                drop(core);
                self.state.set_current_track(None).await;
                self.state.set_playback_state(PlaybackState::Idle).await;
                return Err(
                    CommonError::TrackUnavailable(selection.track.source.describe()).into(),
                );
            }
        };

        // Apply current settings to the fresh session before it is audible
        {
            let settings = self.settings.read().await;
            session.apply_equalizer(&settings.equalizer);
            session.apply_gain(if crossfading { 0.0 } else { 1.0 }, &settings);
        }
        session.play();

        core.source = selection.source;
        if selection.source == PlaySource::Library {
            core.library_index = selection.library_index;
        }
        if selection.push_history {
            core.queue_history.push(selection.track.clone());
        }
        core.karaoke.set_track(None);
        core.paused = false;

        let snapshot = Self::snapshot(&session);
        let incoming_source = session.track().source.clone();
        let incoming_title = session.track().title.clone();

        let final_state = match std::mem::replace(&mut core.phase, Phase::Idle) {
            Phase::Single { session: outgoing } if crossfading => {
                let outgoing_source = outgoing.track().source.clone();
                core.phase = Phase::Crossfading {
                    fade: Crossfade::new(outgoing, session, fade_duration),
                };
                self.state.broadcast_event(PlayerEvent::CrossfadeStarted {
                    from: outgoing_source,
                    to: incoming_source.clone(),
                    duration_ms: fade_duration.as_millis() as u64,
                    timestamp: chrono::Utc::now(),
                });
                PlaybackState::Crossfading
            }
            _ => {
                core.phase = Phase::Single { session };
                PlaybackState::Playing
            }
        };
        drop(core);

        self.state.set_current_track(Some(snapshot)).await;
        if final_state == PlaybackState::Playing {
            self.state.set_playback_state(PlaybackState::Loaded).await;
        }
        self.state.broadcast_event(PlayerEvent::TrackStarted {
            source: incoming_source,
            title: incoming_title,
            timestamp: chrono::Utc::now(),
        });
        self.state.set_playback_state(final_state).await;
        Ok(())
    }

    /// Open a session on a blocking task with a bounded wait
    async fn load_session(&self, track: Track) -> Result<PlaybackSession> {
        let backend = Arc::clone(&self.backend);
        let to_open = track.clone();
        let join = tokio::task::spawn_blocking(move || backend.open(&to_open));

        let sink = tokio::time::timeout(Duration::from_secs(LOAD_TIMEOUT_SECS), join)
            .await
            .map_err(|_| Error::LoadTimeout {
                secs: LOAD_TIMEOUT_SECS,
            })?
            .map_err(|e| Error::Backend(format!("load task failed: {}", e)))??;

        Ok(PlaybackSession::new(track, sink))
    }

    /// Re-apply volume and balance to whatever sessions are live,
    /// preserving an active ramp's gains
    fn push_gains(core: &mut EngineCore, settings: &PlaybackSettings) {
        match &mut core.phase {
            Phase::Idle => {}
            Phase::Single { session } => session.apply_gain(1.0, settings),
            Phase::Crossfading { fade } => {
                let (outgoing_gain, incoming_gain) = fade.gains();
                let (outgoing, incoming) = fade.sessions_mut();
                outgoing.apply_gain(outgoing_gain, settings);
                incoming.apply_gain(incoming_gain, settings);
            }
        }
    }

    fn snapshot(session: &PlaybackSession) -> CurrentTrack {
        CurrentTrack {
            source: session.track().source.clone(),
            title: session.track().title.clone(),
            position_ms: session.position_ms(),
            duration_ms: session.duration_ms(),
        }
    }

    fn publish_progress(state: &SharedState, session: &PlaybackSession) {
        let position_ms = session.position_ms();
        let duration_ms = session.duration_ms();
        let (elapsed, total) = format_progress(position_ms, duration_ms);
        state.broadcast_event(PlayerEvent::PlaybackProgress {
            position_ms,
            duration_ms,
            ratio: session.progress(),
            elapsed,
            total,
            timestamp: chrono::Utc::now(),
        });
    }

    fn publish_karaoke(state: &SharedState, karaoke: &mut KaraokeSync, position_ms: u64) {
        if let Some(change) = karaoke.advance_to(position_ms) {
            state.broadcast_event(PlayerEvent::KaraokeLineChanged {
                index: change.index,
                text: change.text,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Clone handles for the spawned clock task
    fn clone_handles(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            backend: Arc::clone(&self.backend),
            library: Arc::clone(&self.library),
            queue: Arc::clone(&self.queue),
            settings: Arc::clone(&self.settings),
            core: Arc::clone(&self.core),
            running: Arc::clone(&self.running),
            tick_interval: self.tick_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SimulatedBackend;

    fn track(title: &str, path: &str, secs: u64) -> Track {
        Track::file(title, "Artist", "Rock", Duration::from_secs(secs), path)
    }

    fn engine_with(tracks: &[Track]) -> PlaybackEngine {
        let (backend, _clock) = SimulatedBackend::with_manual_clock();
        let mut library = Library::new("Test");
        for t in tracks {
            library.add(t.clone());
        }
        PlaybackEngine::new(Arc::new(backend), library, PlaybackSettings::new())
    }

    #[tokio::test]
    async fn test_play_from_library_out_of_range() {
        let engine = engine_with(&[track("A", "/music/a.mp3", 180)]);
        let err = engine.play_from_library(5).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Common(CommonError::IndexOutOfRange { index: 5, len: 1 })
        ));
        // No state change on caller misuse
        assert_eq!(engine.playback_state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_play_transitions_to_playing() {
        let engine = engine_with(&[track("A", "/music/a.mp3", 180)]);
        engine.play_from_library(0).await.unwrap();
        assert_eq!(engine.playback_state().await, PlaybackState::Playing);

        let current = engine.shared_state().get_current_track().await.unwrap();
        assert_eq!(current.title, "A");
    }

    #[tokio::test]
    async fn test_pause_from_idle_is_noop() {
        let engine = engine_with(&[]);
        engine.pause().await;
        engine.unpause().await;
        assert_eq!(engine.playback_state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_pause_unpause_cycle() {
        let engine = engine_with(&[track("A", "/music/a.mp3", 180)]);
        engine.play_from_library(0).await.unwrap();

        engine.pause().await;
        assert_eq!(engine.playback_state().await, PlaybackState::Paused);

        // Pause while paused stays paused
        engine.pause().await;
        assert_eq!(engine.playback_state().await, PlaybackState::Paused);

        engine.unpause().await;
        assert_eq!(engine.playback_state().await, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_unavailable_track_degrades_to_idle() {
        let (backend, _clock) = SimulatedBackend::with_manual_clock();
        let bad = track("A", "/music/a.mp3", 180);
        backend.fail_on(bad.source.clone());

        let mut library = Library::new("Test");
        library.add(bad);
        let engine =
            PlaybackEngine::new(Arc::new(backend), library, PlaybackSettings::new());

        let err = engine.play_from_library(0).await.unwrap_err();
        assert!(err.is_track_unavailable());
        assert_eq!(engine.playback_state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_run_spawns_clock_task_and_shuts_down() {
        let engine = engine_with(&[track("A", "/music/a.mp3", 180)]);
        engine.run().await;
        engine.play_from_library(0).await.unwrap();
        assert_eq!(engine.playback_state().await, PlaybackState::Playing);

        engine.shutdown().await;
        assert_eq!(engine.playback_state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_stop_releases_everything() {
        let engine = engine_with(&[track("A", "/music/a.mp3", 180)]);
        engine.play_from_library(0).await.unwrap();
        engine.stop().await;
        assert_eq!(engine.playback_state().await, PlaybackState::Idle);
        assert!(engine.shared_state().get_current_track().await.is_none());
    }

    #[tokio::test]
    async fn test_set_band_gain_reaches_settings() {
        let engine = engine_with(&[]);
        engine.set_band_gain(0, 999.0).await.unwrap();
        assert_eq!(
            engine.band_gains().await[0],
            tonearm_common::equalizer::MAX_GAIN_DB
        );
        assert!(engine.set_band_gain(10, 0.0).await.is_err());
    }
}
