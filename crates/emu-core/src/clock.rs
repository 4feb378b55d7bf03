//! CPU clock configuration.

use crate::Ticks;

/// Clock feeding a CPU core.
///
/// The frequency is informational for the core itself: instructions are
/// counted in cycles, and the host converts cycles to wall time or to
/// video frames with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Frequency in Hz (e.g., `1_789_773` for an NTSC NES CPU).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Ticks per frame at the given frame rate (integer division).
    #[must_use]
    pub const fn ticks_per_frame(&self, frames_per_second: u64) -> Ticks {
        Ticks::new(self.frequency_hz / frames_per_second)
    }

    /// Wall-clock duration of `ticks` in microseconds, saturating at
    /// `u64::MAX`.
    #[must_use]
    pub const fn micros(&self, ticks: Ticks) -> u64 {
        let micros = ticks.get() as u128 * 1_000_000 / self.frequency_hz as u128;
        if micros > u64::MAX as u128 {
            u64::MAX
        } else {
            micros as u64
        }
    }
}
