//! Playback orchestration
//!
//! - [`session`]: one owned track + decoder handle with position/progress
//! - [`crossfade`]: overlapping gain ramp between two sessions
//! - [`karaoke`]: active-line cursor driven by the playback clock
//! - [`engine`]: the state machine tying it all together

pub mod crossfade;
pub mod engine;
pub mod karaoke;
pub mod session;

pub use crossfade::Crossfade;
pub use engine::PlaybackEngine;
pub use karaoke::KaraokeSync;
pub use session::PlaybackSession;
