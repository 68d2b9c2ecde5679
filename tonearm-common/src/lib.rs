//! # Tonearm Common Library
//!
//! Shared code for the Tonearm music player including:
//! - Track model (file-backed songs, stream-backed radio)
//! - Library and Queue collections
//! - Equalizer band gains
//! - Karaoke line model and LRC parsing
//! - Playback settings
//! - Event types (PlayerEvent enum)
//! - Time display formatting
//! - Configuration loading

pub mod config;
pub mod equalizer;
pub mod error;
pub mod events;
pub mod karaoke;
pub mod settings;
pub mod time;
pub mod track;

pub use equalizer::Equalizer;
pub use error::{Error, Result};
pub use events::{PlaybackState, PlayerEvent};
pub use settings::PlaybackSettings;
pub use track::{Library, Queue, Track, TrackSource};
