//! Command-level errors
//!
//! Every variant is fatal for the running command. Non-matching diagnostic
//! lines are not errors and never show up here.

use core::fmt;

use crate::config::{ConfigError, MAX_SCREWS};
use crate::state::ErrorKind;
use crate::traits::{HostError, LinkError};

/// Errors surfaced by the leveler commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Invalid command arguments or configuration
    Config(ConfigError),
    /// Motor controller could not be opened
    Connection(LinkError),
    /// Write to the motor controller failed mid-session
    Device(LinkError),
    /// Host homing command failed
    Homing(HostError),
    /// Host tilt measurement routine failed
    Measurement(HostError),
    /// Measurement pass produced no adjust readings
    NoReadings,
    /// Measurement pass produced more readings than there are motors
    TooManyReadings,
    /// Bed did not reach level within the attempt budget
    ConvergenceExhausted { attempts: u32 },
}

impl Error {
    /// Classify for the state machine
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Connection(_) => ErrorKind::Connection,
            Error::Device(_) => ErrorKind::Device,
            Error::Homing(_) => ErrorKind::Homing,
            Error::Measurement(_) | Error::NoReadings | Error::TooManyReadings => {
                ErrorKind::Measurement
            }
            Error::ConvergenceExhausted { .. } => ErrorKind::NotConverged,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "{e}"),
            Error::Connection(e) => write!(f, "unable to open motor controller: {e}"),
            Error::Device(e) => write!(f, "motor controller write failed: {e}"),
            Error::Homing(e) => write!(f, "homing failed: {e}"),
            Error::Measurement(e) => write!(f, "bed tilt measurement failed: {e}"),
            Error::NoReadings => f.write_str("bed tilt measurement produced no adjust readings"),
            Error::TooManyReadings => write!(
                f,
                "bed tilt measurement reported more than {MAX_SCREWS} adjustable screws"
            ),
            Error::ConvergenceExhausted { attempts } => write!(
                f,
                "Unable to reach level after {attempts} attempts. Please check manually and retry."
            ),
        }
    }
}
