//! Crossfade ramp between two playback sessions
//!
//! Over the configured duration the outgoing track's gain ramps linearly
//! from 1.0 to 0.0 while the incoming track's gain ramps from 0.0 to 1.0,
//! sampled at the engine's clock tick rate. The pair of sessions exists
//! only for the life of the ramp; resolving or cancelling it releases the
//! outgoing session.

use crate::playback::session::PlaybackSession;
use std::time::Duration;

/// Result of stepping the ramp by one clock tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampStep {
    /// Ramp still running; gains to apply this tick
    Running {
        outgoing_gain: f32,
        incoming_gain: f32,
    },
    /// Ramp timer reached the configured duration
    Complete,
}

/// Pair of overlapping sessions with elapsed ramp time
pub struct Crossfade {
    outgoing: PlaybackSession,
    incoming: PlaybackSession,
    elapsed: Duration,
    duration: Duration,
}

impl Crossfade {
    /// Begin a ramp; `duration` must be non-zero (a zero-duration
    /// crossfade degenerates to stop-then-start and never constructs one)
    pub fn new(outgoing: PlaybackSession, incoming: PlaybackSession, duration: Duration) -> Self {
        debug_assert!(!duration.is_zero());
        Self {
            outgoing,
            incoming,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Linear gain pair at ramp time `elapsed` over `duration`
    ///
    /// Clamped to [0.0, 1.0] at every sample; at or past the end the exact
    /// endpoint values (0.0, 1.0) are forced regardless of float drift.
    pub fn gains_at(elapsed: Duration, duration: Duration) -> (f32, f32) {
        if elapsed >= duration {
            return (0.0, 1.0);
        }
        let progress = (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32;
        let incoming = progress.clamp(0.0, 1.0);
        (1.0 - incoming, incoming)
    }

    /// Current gain pair for the elapsed ramp time
    pub fn gains(&self) -> (f32, f32) {
        Self::gains_at(self.elapsed, self.duration)
    }

    /// Advance the ramp by one tick and report the gains to apply
    pub fn advance(&mut self, dt: Duration) -> RampStep {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.elapsed >= self.duration {
            RampStep::Complete
        } else {
            let (outgoing_gain, incoming_gain) = self.gains();
            RampStep::Running {
                outgoing_gain,
                incoming_gain,
            }
        }
    }

    /// Mutable access to both sessions (gain/equalizer pushes, pause)
    pub fn sessions_mut(&mut self) -> (&mut PlaybackSession, &mut PlaybackSession) {
        (&mut self.outgoing, &mut self.incoming)
    }

    /// Resolve or cancel the ramp: the outgoing session is dropped (its
    /// decoder handle released) and the incoming session survives
    pub fn into_incoming(self) -> PlaybackSession {
        self.incoming
    }
}

impl std::fmt::Debug for Crossfade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crossfade")
            .field("outgoing", &self.outgoing)
            .field("incoming", &self.incoming)
            .field("elapsed", &self.elapsed)
            .field("duration", &self.duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gains_sum_to_one() {
        let duration = Duration::from_secs(5);
        for ms in (0..=5_000).step_by(100) {
            let (out_gain, in_gain) = Crossfade::gains_at(Duration::from_millis(ms), duration);
            assert!((out_gain + in_gain - 1.0).abs() < 1e-6, "at {} ms", ms);
            assert!((0.0..=1.0).contains(&out_gain));
            assert!((0.0..=1.0).contains(&in_gain));
        }
    }

    #[test]
    fn test_gains_are_monotonic() {
        let duration = Duration::from_secs(5);
        let mut last = Crossfade::gains_at(Duration::ZERO, duration);
        for ms in (100..=5_000).step_by(100) {
            let gains = Crossfade::gains_at(Duration::from_millis(ms), duration);
            assert!(gains.0 <= last.0, "outgoing must decrease");
            assert!(gains.1 >= last.1, "incoming must increase");
            last = gains;
        }
    }

    #[test]
    fn test_endpoints_are_exact() {
        let duration = Duration::from_secs(3);
        assert_eq!(Crossfade::gains_at(Duration::ZERO, duration), (1.0, 0.0));
        assert_eq!(Crossfade::gains_at(duration, duration), (0.0, 1.0));
        // Past the end the endpoints hold
        assert_eq!(
            Crossfade::gains_at(Duration::from_secs(10), duration),
            (0.0, 1.0)
        );
    }

    #[test]
    fn test_midpoint() {
        let (out_gain, in_gain) =
            Crossfade::gains_at(Duration::from_millis(2_500), Duration::from_secs(5));
        assert!((out_gain - 0.5).abs() < 1e-6);
        assert!((in_gain - 0.5).abs() < 1e-6);
    }
}
