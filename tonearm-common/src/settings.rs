//! Playback settings
//!
//! Volume, balance, crossfade duration, and the equalizer, read by the
//! playback engine on each track load and on explicit updates. All setters
//! clamp into range; none of them fail.

use crate::equalizer::Equalizer;
use serde::{Deserialize, Serialize};

/// Default master volume
pub const DEFAULT_VOLUME: f32 = 0.75;

/// Default crossfade duration in seconds (0 disables crossfade)
pub const DEFAULT_CROSSFADE_SECS: f32 = 0.0;

/// Longest accepted crossfade duration in seconds
pub const MAX_CROSSFADE_SECS: f32 = 30.0;

/// Settings applied to every playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Master volume in [0.0, 1.0]
    volume: f32,

    /// Left/right gain skew in [-1.0, 1.0]; -1 routes fully left
    balance: f32,

    /// Crossfade ramp duration in seconds, >= 0
    crossfade_secs: f32,

    /// Ten-band equalizer gains
    pub equalizer: Equalizer,
}

impl PlaybackSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn balance(&self) -> f32 {
        self.balance
    }

    pub fn set_balance(&mut self, balance: f32) {
        self.balance = balance.clamp(-1.0, 1.0);
    }

    pub fn crossfade_secs(&self) -> f32 {
        self.crossfade_secs
    }

    pub fn set_crossfade_secs(&mut self, secs: f32) {
        self.crossfade_secs = if secs.is_finite() {
            secs.clamp(0.0, MAX_CROSSFADE_SECS)
        } else {
            0.0
        };
    }

    /// True when track transitions should overlap
    pub fn crossfade_enabled(&self) -> bool {
        self.crossfade_secs > 0.0
    }

    /// Balance mapped to independent left/right channel gain multipliers
    ///
    /// balance -1 -> (1.0, 0.0), 0 -> (1.0, 1.0), +1 -> (0.0, 1.0),
    /// linear in between.
    pub fn channel_gains(&self) -> (f32, f32) {
        let left = (1.0 - self.balance).min(1.0);
        let right = (1.0 + self.balance).min(1.0);
        (left, right)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            balance: 0.0,
            crossfade_secs: DEFAULT_CROSSFADE_SECS,
            equalizer: Equalizer::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_clamp() {
        let mut settings = PlaybackSettings::new();

        settings.set_volume(1.5);
        assert_eq!(settings.volume(), 1.0);
        settings.set_volume(-0.5);
        assert_eq!(settings.volume(), 0.0);

        settings.set_balance(2.0);
        assert_eq!(settings.balance(), 1.0);
        settings.set_balance(-2.0);
        assert_eq!(settings.balance(), -1.0);

        settings.set_crossfade_secs(-3.0);
        assert_eq!(settings.crossfade_secs(), 0.0);
        assert!(!settings.crossfade_enabled());

        settings.set_crossfade_secs(5.0);
        assert_eq!(settings.crossfade_secs(), 5.0);
        assert!(settings.crossfade_enabled());
    }

    #[test]
    fn test_channel_gains_mapping() {
        let mut settings = PlaybackSettings::new();

        assert_eq!(settings.channel_gains(), (1.0, 1.0));

        settings.set_balance(-1.0);
        assert_eq!(settings.channel_gains(), (1.0, 0.0));

        settings.set_balance(1.0);
        assert_eq!(settings.channel_gains(), (0.0, 1.0));

        settings.set_balance(0.5);
        let (left, right) = settings.channel_gains();
        assert!((left - 0.5).abs() < 1e-6);
        assert_eq!(right, 1.0);
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let mut settings = PlaybackSettings::new();
        settings.set_balance(0.25);
        settings.set_crossfade_secs(4.0);
        settings.equalizer.set_band_gain(3, 6.0).unwrap();

        let json = serde_json::to_string(&settings).unwrap();
        let restored: PlaybackSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, restored);
    }

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let restored: PlaybackSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, PlaybackSettings::default());
    }
}
