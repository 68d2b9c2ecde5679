//! Clock-style time formatting for progress display
//!
//! Provides the elapsed/total strings carried in progress events: `M:SS`
//! below one hour, `H:MM:SS` above.

/// Placeholder shown for unknown durations (live streams)
pub const UNKNOWN_TIME: &str = "--:--";

/// Format a position in milliseconds as `M:SS` or `H:MM:SS`
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Format an optional duration, using the unknown placeholder for None
pub fn format_clock_opt(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => format_clock(ms),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// Elapsed/total display pair for a position within an optional duration
pub fn format_progress(position_ms: u64, duration_ms: Option<u64>) -> (String, String) {
    (format_clock(position_ms), format_clock_opt(duration_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(5_000), "0:05");
        assert_eq!(format_clock(65_000), "1:05");
        assert_eq!(format_clock(185_500), "3:05");
        assert_eq!(format_clock(3_599_000), "59:59");
    }

    #[test]
    fn test_hour_format() {
        assert_eq!(format_clock(3_600_000), "1:00:00");
        assert_eq!(format_clock(3_661_000), "1:01:01");
        assert_eq!(format_clock(7_325_000), "2:02:05");
    }

    #[test]
    fn test_unknown_duration() {
        assert_eq!(format_clock_opt(None), "--:--");
        let (elapsed, total) = format_progress(12_000, None);
        assert_eq!(elapsed, "0:12");
        assert_eq!(total, "--:--");
    }
}
