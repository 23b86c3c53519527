//! Configuration type definitions

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum adjustable screws reported by one measurement pass
pub const MAX_SCREWS: usize = 15;

/// Maximum motors on the controller (base screw motor + adjustable screws)
pub const MAX_MOTORS: usize = MAX_SCREWS + 1;

/// Default time for one full screw turn (seconds)
pub const DEFAULT_FULL_TURN_TIME_S: f64 = 3.0;

/// Default measure/adjust attempts before giving up
pub const DEFAULT_MAXIMUM_ATTEMPTS: u32 = 10;

/// Default wait after opening the motor controller (seconds)
pub const DEFAULT_SETTLE_TIME_S: f64 = 5.0;

/// Configuration and argument errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Manual jog needs both a screw and a distance
    MissingScrewOrDistance,
    /// Screw number outside 1..=MAX_MOTORS
    ScrewOutOfRange(u8),
    /// Manual jog distance is not a finite number
    InvalidDistance,
    /// Attempt budget must be at least one
    InvalidMaximumAttempts,
    /// Full turn time must be finite and not negative
    InvalidFullTurnTime,
    /// Settle time must be finite and not negative
    InvalidSettleTime,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingScrewOrDistance => {
                f.write_str("SCREW and DISTANCE must be provided")
            }
            ConfigError::ScrewOutOfRange(screw) => {
                write!(f, "SCREW {screw} is out of range (1-{MAX_MOTORS})")
            }
            ConfigError::InvalidDistance => f.write_str("DISTANCE must be a finite number"),
            ConfigError::InvalidMaximumAttempts => {
                f.write_str("maximum_attempts must be at least 1")
            }
            ConfigError::InvalidFullTurnTime => {
                f.write_str("full_turn_time must be a finite, non-negative number of seconds")
            }
            ConfigError::InvalidSettleTime => {
                f.write_str("settle_time must be a finite, non-negative number of seconds")
            }
        }
    }
}

/// Leveler settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct LevelerConfig {
    /// Seconds the motor needs for one full screw turn
    pub full_turn_time: f64,
    /// Measure/adjust cycles before reporting failure
    pub maximum_attempts: u32,
    /// Seconds to wait after opening the motor controller
    pub settle_time: f64,
}

impl Default for LevelerConfig {
    fn default() -> Self {
        Self {
            full_turn_time: DEFAULT_FULL_TURN_TIME_S,
            maximum_attempts: DEFAULT_MAXIMUM_ATTEMPTS,
            settle_time: DEFAULT_SETTLE_TIME_S,
        }
    }
}

impl LevelerConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_duration(self.full_turn_time) {
            return Err(ConfigError::InvalidFullTurnTime);
        }
        if !is_duration(self.settle_time) {
            return Err(ConfigError::InvalidSettleTime);
        }
        if self.maximum_attempts == 0 {
            return Err(ConfigError::InvalidMaximumAttempts);
        }
        Ok(())
    }

    /// Settle time in whole milliseconds
    pub fn settle_time_ms(&self) -> u32 {
        // Float to int casts saturate
        (self.settle_time * 1000.0) as u32
    }

    /// Attempt budget, with an optional per-command override
    pub fn attempts(&self, max_override: Option<u32>) -> Result<u32, ConfigError> {
        match max_override.unwrap_or(self.maximum_attempts) {
            0 => Err(ConfigError::InvalidMaximumAttempts),
            n => Ok(n),
        }
    }
}

fn is_duration(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}
