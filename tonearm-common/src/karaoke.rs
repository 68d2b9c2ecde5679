//! Karaoke line model and LRC parsing
//!
//! A karaoke track is an ordered-by-timestamp sequence of lyric lines. The
//! active line for a playback position is the last line whose timestamp is
//! at or before that position; the lookup is a binary search so the engine
//! can call it on every clock tick.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One lyric fragment tagged with the position at which it becomes active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaraokeLine {
    /// Offset from track start, in milliseconds
    pub timestamp_ms: u64,
    pub text: String,
}

impl KaraokeLine {
    /// Create a line, validating the timestamp and text
    ///
    /// Fails with `InvalidArgument` for negative or non-finite timestamps
    /// and for empty text.
    pub fn new(timestamp_secs: f64, text: impl Into<String>) -> Result<Self> {
        if !timestamp_secs.is_finite() || timestamp_secs < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "karaoke timestamp must be non-negative, got {}",
                timestamp_secs
            )));
        }
        let text = text.into();
        if text.is_empty() {
            return Err(Error::InvalidArgument(
                "karaoke line text must not be empty".to_string(),
            ));
        }
        Ok(Self {
            timestamp_ms: (timestamp_secs * 1000.0).round() as u64,
            text,
        })
    }
}

/// Ordered-by-timestamp sequence of karaoke lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaraokeTrack {
    lines: Vec<KaraokeLine>,
}

impl KaraokeTrack {
    /// Build a track, sorting lines by timestamp
    pub fn new(mut lines: Vec<KaraokeLine>) -> Self {
        lines.sort_by_key(|line| line.timestamp_ms);
        Self { lines }
    }

    /// Index of the active line for a position: the last line whose
    /// timestamp is <= `position_ms`, or None before the first line
    pub fn line_index_at(&self, position_ms: u64) -> Option<usize> {
        let after = self
            .lines
            .partition_point(|line| line.timestamp_ms <= position_ms);
        after.checked_sub(1)
    }

    /// Active line for a position
    pub fn line_at(&self, position_ms: u64) -> Option<&KaraokeLine> {
        self.line_index_at(position_ms).map(|i| &self.lines[i])
    }

    pub fn get(&self, index: usize) -> Option<&KaraokeLine> {
        self.lines.get(index)
    }

    /// Lazy, restartable sequence of all lines for initial rendering
    pub fn lines(&self) -> impl Iterator<Item = &KaraokeLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parse standard timestamp-tagged lyric text (LRC format)
///
/// Lines look like `[mm:ss.xx]text`; several timestamp tags may prefix one
/// text fragment. ID tags such as `[ar:...]` are skipped. Malformed
/// timestamps fail with `BadKaraokeFile`.
pub fn parse_lrc(contents: &str) -> Result<KaraokeTrack> {
    let mut lines = Vec::new();

    for (line_no, raw) in contents.lines().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() || !raw.starts_with('[') {
            continue;
        }

        let mut rest = raw;
        let mut timestamps = Vec::new();
        while let Some(stripped) = rest.strip_prefix('[') {
            let Some((tag, after)) = stripped.split_once(']') else {
                return Err(Error::BadKaraokeFile(format!(
                    "unterminated tag on line {}",
                    line_no + 1
                )));
            };
            if tag.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                timestamps.push(parse_lrc_timestamp(tag, line_no + 1)?);
            } else {
                // ID tag ([ar:..], [ti:..], [offset:..]); skip the line
                timestamps.clear();
                rest = "";
                break;
            }
            rest = after;
        }

        let text = rest.trim();
        if text.is_empty() {
            continue;
        }
        for timestamp_secs in timestamps {
            lines.push(KaraokeLine::new(timestamp_secs, text)?);
        }
    }

    Ok(KaraokeTrack::new(lines))
}

/// Parse one `mm:ss.xx` timestamp tag into seconds
fn parse_lrc_timestamp(tag: &str, line_no: usize) -> Result<f64> {
    let bad = || Error::BadKaraokeFile(format!("malformed timestamp [{}] on line {}", tag, line_no));

    let (minutes, seconds) = tag.split_once(':').ok_or_else(bad)?;
    let minutes: u64 = minutes.parse().map_err(|_| bad())?;
    let seconds: f64 = seconds.parse().map_err(|_| bad())?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(bad());
    }
    Ok(minutes as f64 * 60.0 + seconds)
}
