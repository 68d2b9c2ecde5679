//! Ten-band equalizer gains
//!
//! Pure in-memory state: the playback engine is responsible for pushing
//! gain values to the live audio pipeline whenever they change or a new
//! track loads.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of equalizer bands
pub const BAND_COUNT: usize = 10;

/// Fixed band-to-frequency mapping, ordinal: index 0 = 32 Hz ... index 9 = 16 kHz
pub const BAND_FREQUENCIES_HZ: [u32; BAND_COUNT] =
    [32, 64, 125, 250, 500, 1000, 2000, 4000, 8000, 16000];

/// Minimum band gain in dB
pub const MIN_GAIN_DB: f32 = -12.0;

/// Maximum band gain in dB
pub const MAX_GAIN_DB: f32 = 12.0;

/// Per-band gain state
///
/// An uninitialized equalizer is flat (all bands at 0 dB). Out-of-range
/// gain writes clamp silently; only an out-of-range band index is an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equalizer {
    gains_db: [f32; BAND_COUNT],
}

impl Equalizer {
    /// Flat response (all bands 0 dB)
    pub fn new() -> Self {
        Self {
            gains_db: [0.0; BAND_COUNT],
        }
    }

    /// Set the gain for one band, clamped into [MIN_GAIN_DB, MAX_GAIN_DB]
    ///
    /// Fails with `InvalidBandIndex` if `index` is outside [0, 9].
    pub fn set_band_gain(&mut self, index: usize, gain_db: f32) -> Result<()> {
        if index >= BAND_COUNT {
            return Err(Error::InvalidBandIndex(index));
        }
        self.gains_db[index] = gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB);
        Ok(())
    }

    /// Current (clamped) gain for one band
    pub fn band_gain(&self, index: usize) -> Result<f32> {
        if index >= BAND_COUNT {
            return Err(Error::InvalidBandIndex(index));
        }
        Ok(self.gains_db[index])
    }

    /// All band gains in band order
    pub fn band_gains(&self) -> [f32; BAND_COUNT] {
        self.gains_db
    }

    /// Center frequency of a band; `InvalidBandIndex` outside [0, 9]
    pub fn band_frequency(index: usize) -> Result<u32> {
        BAND_FREQUENCIES_HZ
            .get(index)
            .copied()
            .ok_or(Error::InvalidBandIndex(index))
    }

    /// Band index for a center frequency; `InvalidBandIndex` if the
    /// frequency is not in the fixed table
    pub fn band_index(frequency_hz: u32) -> Result<usize> {
        BAND_FREQUENCIES_HZ
            .iter()
            .position(|&f| f == frequency_hz)
            .ok_or(Error::InvalidBandIndex(frequency_hz as usize))
    }
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_flat() {
        let eq = Equalizer::new();
        assert_eq!(eq.band_gains(), [0.0; BAND_COUNT]);
        for i in 0..BAND_COUNT {
            assert_eq!(eq.band_gain(i).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_set_then_get_all_bands() {
        let mut eq = Equalizer::new();
        for i in 0..BAND_COUNT {
            eq.set_band_gain(i, 3.5).unwrap();
            assert_eq!(eq.band_gain(i).unwrap(), 3.5);
        }
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let mut eq = Equalizer::new();

        eq.set_band_gain(0, 999.0).unwrap();
        assert_eq!(eq.band_gain(0).unwrap(), MAX_GAIN_DB);

        eq.set_band_gain(0, -999.0).unwrap();
        assert_eq!(eq.band_gain(0).unwrap(), MIN_GAIN_DB);
    }

    #[test]
    fn test_invalid_band_index() {
        let mut eq = Equalizer::new();
        assert!(matches!(
            eq.set_band_gain(BAND_COUNT, 0.0),
            Err(Error::InvalidBandIndex(_))
        ));
        assert!(matches!(
            eq.band_gain(BAND_COUNT),
            Err(Error::InvalidBandIndex(_))
        ));
    }

    #[test]
    fn test_band_frequency_mapping() {
        assert_eq!(Equalizer::band_frequency(0).unwrap(), 32);
        assert_eq!(Equalizer::band_frequency(9).unwrap(), 16000);
        assert!(Equalizer::band_frequency(10).is_err());

        assert_eq!(Equalizer::band_index(32).unwrap(), 0);
        assert_eq!(Equalizer::band_index(1000).unwrap(), 5);
        assert!(matches!(
            Equalizer::band_index(31),
            Err(Error::InvalidBandIndex(_))
        ));
    }
}
