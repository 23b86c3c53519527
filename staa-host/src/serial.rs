//! Serial link to the screw motor controller

use std::io::{self, Write};
use std::time::Duration;

use log::{info, warn};
use serialport::SerialPort;
use staa_core::traits::{LinkError, MotorConnector, MotorLink};

use crate::config::SerialConfig;

/// Write timeout for a single token
const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Opens the configured serial port on demand
#[derive(Debug, Clone)]
pub struct SerialConnector {
    device: String,
    baud: u32,
}

impl SerialConnector {
    pub fn new(config: &SerialConfig) -> Self {
        Self {
            device: config.device.clone(),
            baud: config.baud,
        }
    }
}

impl MotorConnector for SerialConnector {
    type Link = SerialLink;

    fn connect(&mut self) -> Result<SerialLink, LinkError> {
        info!("Opening serial port: {} at {} bps", self.device, self.baud);

        let port = serialport::new(&self.device, self.baud)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|e| {
                warn!("Failed to open serial port {}: {}", self.device, e);
                open_error(&e)
            })?;

        Ok(SerialLink { port })
    }
}

/// Open serial port; closed when dropped
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl MotorLink for SerialLink {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(data).map_err(write_error)
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        self.port.flush().map_err(write_error)
    }

    fn close(self) {
        info!(
            "Closing serial port: {}",
            self.port.name().unwrap_or_default()
        );
        drop(self.port);
    }
}

fn open_error(e: &serialport::Error) -> LinkError {
    match e.kind() {
        serialport::ErrorKind::NoDevice => LinkError::NotFound,
        serialport::ErrorKind::Io(io::ErrorKind::NotFound) => LinkError::NotFound,
        serialport::ErrorKind::Io(io::ErrorKind::PermissionDenied) => LinkError::PermissionDenied,
        _ => LinkError::Io,
    }
}

fn write_error(e: io::Error) -> LinkError {
    warn!("Serial write failed: {}", e);
    match e.kind() {
        io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected | io::ErrorKind::UnexpectedEof => {
            LinkError::Disconnected
        }
        _ => LinkError::Io,
    }
}
