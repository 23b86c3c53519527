//! Motor command tokens
//!
//! Each command is a signed decimal identifier written as its own write
//! operation, with no framing, delimiter, or checksum:
//! - magnitude: 1-based motor number (0 = all motors)
//! - sign: rotation direction (negative = reverse)

use core::fmt::{self, Write};

use heapless::String;

/// Token that halts every engaged motor
pub const STOP_TOKEN: &str = "0";

/// Longest possible token ("-32768")
pub const MAX_TOKEN_LEN: usize = 6;

/// Motor rotation direction on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Positive identifier
    Forward,
    /// Negative identifier
    Reverse,
}

/// Errors when decoding a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Token has no characters
    Empty,
    /// Token contains something other than an optional `-` and digits
    InvalidDigit,
    /// Identifier does not fit a motor number
    OutOfRange,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => f.write_str("empty motor token"),
            CommandError::InvalidDigit => f.write_str("motor token is not a decimal integer"),
            CommandError::OutOfRange => f.write_str("motor token out of range"),
        }
    }
}

/// A single command for the screw motor controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorCommand {
    /// Stop all motors
    Stop,
    /// Engage one motor until the next command
    Run { motor: u8, rotation: Rotation },
}

impl MotorCommand {
    /// Build a run command; motor numbers start at 1
    pub fn run(motor: u8, rotation: Rotation) -> Option<Self> {
        if motor == 0 {
            return None;
        }
        Some(MotorCommand::Run { motor, rotation })
    }

    /// Signed identifier sent to the device
    pub fn identifier(&self) -> i16 {
        match *self {
            MotorCommand::Stop => 0,
            MotorCommand::Run {
                motor,
                rotation: Rotation::Forward,
            } => i16::from(motor),
            MotorCommand::Run {
                motor,
                rotation: Rotation::Reverse,
            } => -i16::from(motor),
        }
    }

    /// Interpret a signed identifier
    pub fn from_identifier(id: i16) -> Option<Self> {
        if id == 0 {
            return Some(MotorCommand::Stop);
        }
        let motor = u8::try_from(id.unsigned_abs()).ok()?;
        let rotation = if id < 0 {
            Rotation::Reverse
        } else {
            Rotation::Forward
        };
        Some(MotorCommand::Run { motor, rotation })
    }

    /// Encode as the ASCII decimal token
    pub fn encode(&self) -> String<MAX_TOKEN_LEN> {
        let mut token = String::new();
        // Cannot overflow: every i16 fits in MAX_TOKEN_LEN characters
        let _ = write!(token, "{}", self.identifier());
        token
    }

    /// Decode an ASCII decimal token
    pub fn parse(token: &str) -> Result<Self, CommandError> {
        if token.is_empty() {
            return Err(CommandError::Empty);
        }

        let digits = token.strip_prefix('-').unwrap_or(token);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommandError::InvalidDigit);
        }

        let id: i16 = token.parse().map_err(|_| CommandError::OutOfRange)?;
        Self::from_identifier(id).ok_or(CommandError::OutOfRange)
    }

    /// Check if this is the stop command
    pub fn is_stop(&self) -> bool {
        matches!(self, MotorCommand::Stop)
    }
}

impl fmt::Display for MotorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
