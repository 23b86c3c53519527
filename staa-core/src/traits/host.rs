//! Printer host collaborator
//!
//! The host owns homing and the bed-tilt measurement routine. All calls are
//! synchronous and block until the host command finishes.

use core::fmt;

/// Errors reported by host commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostError {
    /// Command ran and reported failure
    Failed,
    /// Command could not be started
    Unavailable,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Failed => f.write_str("host command failed"),
            HostError::Unavailable => f.write_str("host command unavailable"),
        }
    }
}

/// Homed axes as reported by the host kinematics status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSet {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisSet {
    /// All three axes homed
    pub const ALL: AxisSet = AxisSet {
        x: true,
        y: true,
        z: true,
    };

    /// Parse a `homed_axes` string such as `"xyz"` or `"xy"`
    ///
    /// Unknown characters and surrounding whitespace are ignored.
    pub fn parse(status: &str) -> Self {
        let mut axes = AxisSet::default();
        for c in status.chars() {
            match c.to_ascii_lowercase() {
                'x' => axes.x = true,
                'y' => axes.y = true,
                'z' => axes.z = true,
                _ => {}
            }
        }
        axes
    }

    /// Check if X, Y and Z are all homed
    pub fn is_fully_homed(&self) -> bool {
        self.x && self.y && self.z
    }
}

/// Receiver for diagnostic output lines
pub trait LineSink {
    /// Handle one line of host output
    fn on_output_line(&mut self, line: &str);
}

/// User-facing status output
pub trait Console {
    /// Emit one informational line to the user
    fn respond_info(&mut self, msg: fmt::Arguments<'_>);
}

/// Printer host operations the leveler depends on
pub trait MachineHost: Console {
    /// Query which axes are currently homed
    fn homed_axes(&mut self) -> Result<AxisSet, HostError>;

    /// Home all axes
    fn home_all(&mut self) -> Result<(), HostError>;

    /// Home the Z axis only
    fn home_z(&mut self) -> Result<(), HostError>;

    /// Run the bed-tilt measurement routine
    ///
    /// Every line of output produced while the routine runs must be passed
    /// to `output` in order.
    fn measure_tilt(&mut self, output: &mut dyn LineSink) -> Result<(), HostError>;
}

impl<T: Console + ?Sized> Console for &mut T {
    fn respond_info(&mut self, msg: fmt::Arguments<'_>) {
        T::respond_info(self, msg)
    }
}

impl<T: MachineHost + ?Sized> MachineHost for &mut T {
    fn homed_axes(&mut self) -> Result<AxisSet, HostError> {
        T::homed_axes(self)
    }

    fn home_all(&mut self) -> Result<(), HostError> {
        T::home_all(self)
    }

    fn home_z(&mut self) -> Result<(), HostError> {
        T::home_z(self)
    }

    fn measure_tilt(&mut self, output: &mut dyn LineSink) -> Result<(), HostError> {
        T::measure_tilt(self, output)
    }
}
