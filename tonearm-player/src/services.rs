//! External collaborator contracts
//!
//! Tag reading and on-disk persistence are not implemented here; the
//! player consumes them through these narrow interfaces.

use std::path::Path;
use std::time::Duration;
use tonearm_common::settings::PlaybackSettings;
use tonearm_common::track::Library;
use tonearm_common::Result;

/// Tags extracted from an audio file
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub duration: Duration,
    pub cover: Option<Vec<u8>>,
}

/// Metadata extraction service
///
/// Fails with `UnsupportedFileType` for formats the service cannot read
/// and `MissingTags` when a readable file carries no usable tags.
pub trait MetadataService: Send + Sync {
    fn read_metadata(&self, path: &Path) -> Result<TrackMetadata>;
}

/// Settings and library persistence service
pub trait PersistenceService: Send + Sync {
    fn load_libraries(&self) -> Result<Vec<Library>>;
    fn save_libraries(&self, libraries: &[Library]) -> Result<()>;
    fn load_settings(&self) -> Result<PlaybackSettings>;
    fn save_settings(&self, settings: &PlaybackSettings) -> Result<()>;
}
