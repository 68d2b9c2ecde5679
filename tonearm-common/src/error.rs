//! Error types shared across Tonearm crates
//!
//! Defines the common error taxonomy using thiserror for clear error
//! propagation. Collection misuse and malformed external data are surfaced
//! to the caller; runtime transport failures are caught at the engine
//! boundary and degrade to a safe state.

use thiserror::Error;

/// Main error type for Tonearm common types
#[derive(Error, Debug)]
pub enum Error {
    /// Track file or stream is missing or unreadable at load time
    #[error("Track unavailable: {0}")]
    TrackUnavailable(String),

    /// Index outside the bounds of a Library or Queue
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Pop from an empty queue
    #[error("Queue is empty")]
    EmptyQueue,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Equalizer band index outside 0..BAND_COUNT
    #[error("Invalid equalizer band index: {0}")]
    InvalidBandIndex(usize),

    /// Malformed stream URL in a playlist reference
    #[error("Bad stream reference: {0}")]
    BadStreamReference(String),

    /// Malformed timestamp-tagged lyric file
    #[error("Bad karaoke file: {0}")]
    BadKaraokeFile(String),

    /// Construction-time validation failure
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Metadata service cannot handle the file format
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Metadata service found no usable tags
    #[error("Missing tags: {0}")]
    MissingTags(String),

    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the common Error
pub type Result<T> = std::result::Result<T, Error>;
