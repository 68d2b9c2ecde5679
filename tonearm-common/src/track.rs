//! Track source model
//!
//! A [`Track`] is either a file-backed song or a stream-backed radio
//! station, dispatched by the [`TrackSource`] tagged variant. Identity
//! equality is by source locator only: two tracks pointing at the same file
//! or stream URL are the same track regardless of tag differences.
//!
//! [`Library`] is a named, ordered, duplicate-free collection; [`Queue`] is
//! a transient FIFO-biased play-next list.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Source locator for a track: the identity of the track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "locator")]
pub enum TrackSource {
    /// Local audio file
    File(PathBuf),
    /// Network radio stream URL
    Stream(String),
}

impl TrackSource {
    /// Display form of the locator (path or URL)
    pub fn describe(&self) -> String {
        match self {
            TrackSource::File(path) => path.display().to_string(),
            TrackSource::Stream(url) => url.clone(),
        }
    }
}

/// A playable item: file-backed song or stream-backed radio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub genre: String,
    /// Total duration; None for live streams
    pub duration: Option<Duration>,
    pub source: TrackSource,
    /// Raw cover image bytes, if any
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cover: Option<Vec<u8>>,
}

impl Track {
    /// Create a file-backed track
    pub fn file(
        title: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
        duration: Duration,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            genre: genre.into(),
            duration: Some(duration),
            source: TrackSource::File(path.into()),
            cover: None,
        }
    }

    /// Create a stream-backed radio track
    ///
    /// Fails with `BadStreamReference` if the URL is not a well-formed
    /// http/https locator.
    pub fn stream(title: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        validate_stream_url(&url)?;
        Ok(Self {
            title: title.into(),
            artist: String::new(),
            genre: String::new(),
            duration: None,
            source: TrackSource::Stream(url),
            cover: None,
        })
    }

    /// Create a radio track from the contents of a playlist file (M3U/PLS)
    ///
    /// Extracts the first stream URL from the playlist text. Malformed or
    /// URL-free input fails with `BadStreamReference`.
    pub fn stream_from_playlist(title: impl Into<String>, contents: &str) -> Result<Self> {
        let url = first_playlist_url(contents)?;
        Self::stream(title, url)
    }

    /// True for stream-backed radio tracks
    pub fn is_stream(&self) -> bool {
        matches!(self.source, TrackSource::Stream(_))
    }

    /// Case-insensitive substring match against title, artist, and genre
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.artist.to_lowercase().contains(needle_lower)
            || self.genre.to_lowercase().contains(needle_lower)
    }
}

// Identity is by source locator only
impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

/// Validate that a stream URL is well-formed (http/https with a host)
fn validate_stream_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| {
            Error::BadStreamReference(format!("not an http(s) URL: {}", url))
        })?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(Error::BadStreamReference(format!("missing host: {}", url)));
    }
    Ok(())
}

/// Extract the first stream URL from M3U or PLS playlist text
fn first_playlist_url(contents: &str) -> Result<String> {
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
            continue;
        }
        // PLS entries look like "File1=http://..."
        if let Some((key, value)) = line.split_once('=') {
            if key.trim().to_lowercase().starts_with("file") {
                return Ok(value.trim().to_string());
            }
            continue;
        }
        // M3U entries are bare URLs
        return Ok(line.to_string());
    }
    Err(Error::BadStreamReference(
        "playlist contains no stream URL".to_string(),
    ))
}

/// Named, ordered, user-curated collection of tracks
///
/// Insertion order is significant and no track appears twice (identity by
/// source locator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    tracks: Vec<Track>,
    /// Cover image for the library itself
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cover: Option<Vec<u8>>,
    /// Reserved libraries (main collection, favorites) are never deletable
    deletable: bool,
}

impl Library {
    /// Create a user library (deletable)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            cover: None,
            deletable: true,
        }
    }

    /// Create a reserved library (never deletable)
    pub fn reserved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            cover: None,
            deletable: false,
        }
    }

    pub fn is_deletable(&self) -> bool {
        self.deletable
    }

    /// Add a track; no-op with a warning if an identity-equal track exists
    pub fn add(&mut self, track: Track) {
        if self.tracks.contains(&track) {
            warn!(
                library = %self.name,
                track = %track.source.describe(),
                "track already in library, skipping"
            );
            return;
        }
        self.tracks.push(track);
    }

    /// Remove a track; fails with `NotFound` if absent
    pub fn remove(&mut self, track: &Track) -> Result<()> {
        let pos = self
            .tracks
            .iter()
            .position(|t| t == track)
            .ok_or_else(|| Error::NotFound(track.source.describe()))?;
        self.tracks.remove(pos);
        Ok(())
    }

    /// Track at `index`, or `IndexOutOfRange`
    pub fn get(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Lazy, restartable, case-insensitive substring search over title,
    /// artist, and genre, in original order
    pub fn search<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a Track> + 'a {
        let needle = text.to_lowercase();
        self.tracks.iter().filter(move |t| t.matches(&needle))
    }
}

/// The set of libraries known to the player
///
/// Always contains the two reserved entries, created up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySet {
    libraries: Vec<Library>,
}

/// Name of the reserved main collection
pub const MAIN_LIBRARY: &str = "Library";
/// Name of the reserved favorites collection
pub const FAVORITES_LIBRARY: &str = "Favorites";

impl LibrarySet {
    pub fn new() -> Self {
        Self {
            libraries: vec![
                Library::reserved(MAIN_LIBRARY),
                Library::reserved(FAVORITES_LIBRARY),
            ],
        }
    }

    /// Restore from persisted libraries, re-creating reserved entries if
    /// the persisted data lost them
    pub fn from_libraries(libraries: Vec<Library>) -> Self {
        let mut set = Self { libraries };
        for reserved in [MAIN_LIBRARY, FAVORITES_LIBRARY] {
            if set.get(reserved).is_none() {
                set.libraries.insert(0, Library::reserved(reserved));
            }
        }
        set
    }

    pub fn get(&self, name: &str) -> Option<&Library> {
        self.libraries.iter().find(|l| l.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Library> {
        self.libraries.iter_mut().find(|l| l.name == name)
    }

    /// Add a new empty user library; fails if the name is taken
    pub fn create(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(Error::InvalidArgument(format!(
                "library already exists: {}",
                name
            )));
        }
        self.libraries.push(Library::new(name));
        Ok(())
    }

    /// Remove a user library; reserved libraries are never deletable
    pub fn remove(&mut self, name: &str) -> Result<Library> {
        let pos = self
            .libraries
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        if !self.libraries[pos].is_deletable() {
            return Err(Error::InvalidArgument(format!(
                "library is not deletable: {}",
                name
            )));
        }
        Ok(self.libraries.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Library> {
        self.libraries.iter()
    }

    pub fn into_vec(self) -> Vec<Library> {
        self.libraries
    }
}

impl Default for LibrarySet {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient FIFO-biased play-next list
///
/// Distinct from a Library: tracks are consumed by popping from the front,
/// and a track already pending play is not enqueued twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Queue {
    tracks: Vec<Track>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track; no-op with a warning if it is already pending play
    pub fn push(&mut self, track: Track) {
        if self.tracks.contains(&track) {
            warn!(
                track = %track.source.describe(),
                "track already pending in queue, skipping"
            );
            return;
        }
        self.tracks.push(track);
    }

    /// Remove and return the front element; `EmptyQueue` if empty
    pub fn pop(&mut self) -> Result<Track> {
        if self.tracks.is_empty() {
            return Err(Error::EmptyQueue);
        }
        Ok(self.tracks.remove(0))
    }

    /// Front element without removing it
    pub fn peek(&self) -> Option<&Track> {
        self.tracks.first()
    }

    /// Track at `index`, or `IndexOutOfRange`
    pub fn get(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    /// Remove and return the track at `index`, or `IndexOutOfRange`
    pub fn take(&mut self, index: usize) -> Result<Track> {
        if index >= self.tracks.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        Ok(self.tracks.remove(index))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Same lazy search contract as [`Library::search`]
    pub fn search<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a Track> + 'a {
        let needle = text.to_lowercase();
        self.tracks.iter().filter(move |t| t.matches(&needle))
    }
}
