//! # Tonearm Playback Engine (tonearm-player)
//!
//! Playback orchestration for the Tonearm music player: track selection
//! across Library and Queue, the playback state machine, crossfade
//! blending, equalizer and balance application, and karaoke highlighting
//! synchronized to the playback clock.
//!
//! Decoding and device output are delegated to an [`backend::AudioBackend`]
//! implementation; observers subscribe to engine events through
//! [`state::SharedState`].

pub mod backend;
pub mod error;
pub mod playback;
pub mod services;
pub mod state;

pub use error::{Error, Result};
pub use playback::PlaybackEngine;
pub use state::SharedState;
