//! Motor controller link
//!
//! Byte transport to the screw motor controller. Implementations wrap a
//! serial port; tests use an in-memory recorder.

use core::fmt;

/// Errors that can occur on the motor link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Device path does not exist
    NotFound,
    /// Not allowed to open the device
    PermissionDenied,
    /// Transport I/O failure
    Io,
    /// Link is no longer open
    Disconnected,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::NotFound => f.write_str("device not found"),
            LinkError::PermissionDenied => f.write_str("permission denied"),
            LinkError::Io => f.write_str("I/O error"),
            LinkError::Disconnected => f.write_str("device disconnected"),
        }
    }
}

/// An open connection to the motor controller
pub trait MotorLink {
    /// Write data to the device
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), LinkError>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), LinkError>;

    /// Release the device
    fn close(self)
    where
        Self: Sized;
}

/// Opens links to the motor controller
pub trait MotorConnector {
    /// Link type produced by this connector
    type Link: MotorLink;

    /// Open the device
    fn connect(&mut self) -> Result<Self::Link, LinkError>;
}

impl<T: MotorConnector + ?Sized> MotorConnector for &mut T {
    type Link = T::Link;

    fn connect(&mut self) -> Result<Self::Link, LinkError> {
        T::connect(self)
    }
}
