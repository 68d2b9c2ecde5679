//! Karaoke synchronizer
//!
//! Cursor over the loaded lyric track, driven by the playback clock. The
//! engine calls [`KaraokeSync::advance_to`] on every tick; a change is
//! reported only when the active line index moved, so observers see one
//! event per line.

use tonearm_common::karaoke::KaraokeTrack;

/// Reported when the active line changed since the last tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    /// New active line index; None when position precedes the first line
    pub index: Option<usize>,
    pub text: Option<String>,
}

/// Active-line cursor for the current track's lyrics
#[derive(Debug, Default)]
pub struct KaraokeSync {
    track: Option<KaraokeTrack>,
    active: Option<usize>,
}

impl KaraokeSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load lyrics for a new track, resetting the cursor to before the
    /// first line; `None` clears karaoke display
    pub fn set_track(&mut self, track: Option<KaraokeTrack>) {
        self.track = track;
        self.active = None;
    }

    pub fn track(&self) -> Option<&KaraokeTrack> {
        self.track.as_ref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Move the cursor to the line active at `position_ms`
    ///
    /// Returns `Some` only when the active line index changed since the
    /// previous call.
    pub fn advance_to(&mut self, position_ms: u64) -> Option<LineChange> {
        let track = self.track.as_ref()?;
        let index = track.line_index_at(position_ms);
        if index == self.active {
            return None;
        }
        self.active = index;
        Some(LineChange {
            index,
            text: index.map(|i| track.get(i).map(|l| l.text.clone()).unwrap_or_default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonearm_common::karaoke::KaraokeLine;

    fn lyrics() -> KaraokeTrack {
        KaraokeTrack::new(vec![
            KaraokeLine::new(2.0, "first").unwrap(),
            KaraokeLine::new(5.0, "second").unwrap(),
            KaraokeLine::new(9.0, "third").unwrap(),
        ])
    }

    #[test]
    fn test_reports_change_once_per_line() {
        let mut sync = KaraokeSync::new();
        sync.set_track(Some(lyrics()));

        // Before the first line: no change from the initial cursor
        assert_eq!(sync.advance_to(0), None);
        assert_eq!(sync.advance_to(1_900), None);

        let change = sync.advance_to(2_000).unwrap();
        assert_eq!(change.index, Some(0));
        assert_eq!(change.text.as_deref(), Some("first"));

        // Same line on subsequent ticks: silent
        assert_eq!(sync.advance_to(3_000), None);
        assert_eq!(sync.advance_to(4_900), None);

        let change = sync.advance_to(5_100).unwrap();
        assert_eq!(change.index, Some(1));
        assert_eq!(change.text.as_deref(), Some("second"));
    }

    #[test]
    fn test_track_change_resets_cursor() {
        let mut sync = KaraokeSync::new();
        sync.set_track(Some(lyrics()));
        sync.advance_to(6_000);
        assert_eq!(sync.active_index(), Some(1));

        sync.set_track(Some(lyrics()));
        assert_eq!(sync.active_index(), None);

        // Fresh track reports from scratch
        let change = sync.advance_to(6_000).unwrap();
        assert_eq!(change.index, Some(1));
    }

    #[test]
    fn test_no_track_is_silent() {
        let mut sync = KaraokeSync::new();
        assert_eq!(sync.advance_to(10_000), None);
        sync.set_track(None);
        assert_eq!(sync.advance_to(10_000), None);
    }

    #[test]
    fn test_seek_back_reports_earlier_line() {
        let mut sync = KaraokeSync::new();
        sync.set_track(Some(lyrics()));
        sync.advance_to(10_000);
        assert_eq!(sync.active_index(), Some(2));

        let change = sync.advance_to(3_000).unwrap();
        assert_eq!(change.index, Some(0));
    }
}
