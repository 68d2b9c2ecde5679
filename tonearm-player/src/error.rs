//! Error types for tonearm-player
//!
//! Wraps the common taxonomy and adds engine-local failures. Runtime
//! transport errors are caught at the engine boundary, logged, and degrade
//! to Idle instead of propagating out of the control task.

use thiserror::Error;

/// Main error type for the playback engine
#[derive(Error, Debug)]
pub enum Error {
    /// Shared model errors (collections, equalizer, karaoke, streams)
    #[error(transparent)]
    Common(#[from] tonearm_common::Error),

    /// Audio backend failures (open, play, device)
    #[error("Audio backend error: {0}")]
    Backend(String),

    /// Track open did not complete within the load timeout
    #[error("Track load timed out after {secs}s")]
    LoadTimeout { secs: u64 },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for load-time failures the engine absorbs by returning to Idle
    pub fn is_track_unavailable(&self) -> bool {
        matches!(
            self,
            Error::Common(tonearm_common::Error::TrackUnavailable(_))
                | Error::Backend(_)
                | Error::LoadTimeout { .. }
        )
    }
}

/// Convenience Result type using the player Error
pub type Result<T> = std::result::Result<T, Error>;
