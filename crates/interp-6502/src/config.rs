//! Interpreter configuration.

use std::fmt;

use emu_core::MasterClock;

/// Default clock: 1 MHz, as on most 6502 microcomputers.
pub const DEFAULT_CLOCK_HZ: u64 = 1_000_000;

/// Default number of cycles between host polls.
pub const DEFAULT_INTERRUPT_PERIOD: u32 = 20_000;

/// Settings fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// CPU clock. Informational: the interpreter counts cycles, the host
    /// turns them into time.
    pub clock: MasterClock,
    /// Cycles to run between calls to the host's poll callback.
    pub interrupt_period: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_HZ, DEFAULT_INTERRUPT_PERIOD)
    }
}

impl Config {
    #[must_use]
    pub const fn new(clock_hz: u64, interrupt_period: u32) -> Self {
        Self {
            clock: MasterClock::new(clock_hz),
            interrupt_period,
        }
    }

    /// Poll the host once per video frame at `frames_per_second`.
    #[must_use]
    pub fn per_frame(clock_hz: u64, frames_per_second: u64) -> Self {
        let clock = MasterClock::new(clock_hz);
        let period = if frames_per_second == 0 {
            0
        } else {
            u32::try_from(clock.ticks_per_frame(frames_per_second).get()).unwrap_or(u32::MAX)
        };
        Self {
            clock,
            interrupt_period: period,
        }
    }

    #[must_use]
    pub const fn with_interrupt_period(mut self, interrupt_period: u32) -> Self {
        self.interrupt_period = interrupt_period;
        self
    }

    /// Check the settings the interpreter relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.frequency_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.interrupt_period == 0 {
            return Err(ConfigError::ZeroInterruptPeriod);
        }
        if i32::try_from(self.interrupt_period).is_err() {
            return Err(ConfigError::PeriodTooLarge(self.interrupt_period));
        }
        Ok(())
    }

    /// The period as a signed budget. Only valid after `validate()`.
    pub(crate) fn budget(&self) -> i32 {
        i32::try_from(self.interrupt_period).unwrap_or(i32::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroClock,
    ZeroInterruptPeriod,
    PeriodTooLarge(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroClock => write!(f, "clock frequency must be non-zero"),
            Self::ZeroInterruptPeriod => {
                write!(f, "interrupt check period must be at least one cycle")
            }
            Self::PeriodTooLarge(period) => write!(
                f,
                "interrupt check period of {period} cycles exceeds {} cycles",
                i32::MAX
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
