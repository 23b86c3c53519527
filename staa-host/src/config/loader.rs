//! Configuration file loader

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use staa_core::config::ConfigError;
use thiserror::Error;

use super::types::HostConfig;

/// Errors when loading `staa.toml`
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("[serial] device must not be empty")]
    EmptyDevice,
    #[error("[serial] baud must be greater than zero")]
    InvalidBaud,
    #[error("[leveling] {0}")]
    Leveling(ConfigError),
    #[error("[host] {0} command must not be empty")]
    EmptyCommand(&'static str),
}

impl HostConfig {
    /// Read and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        info!("Loading configuration from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate configuration text
    pub fn from_toml(text: &str) -> Result<Self, LoadError> {
        let config: HostConfig = toml::from_str(text)?;
        config.validate()?;
        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.serial.device.trim().is_empty() {
            return Err(LoadError::EmptyDevice);
        }
        if self.serial.baud == 0 {
            return Err(LoadError::InvalidBaud);
        }

        self.leveling.validate().map_err(LoadError::Leveling)?;

        for (field, command) in self.host.entries() {
            if command.trim().is_empty() {
                return Err(LoadError::EmptyCommand(field));
            }
        }
        Ok(())
    }

    /// Apply command-line overrides for the serial port
    pub fn apply_overrides(
        &mut self,
        device: Option<String>,
        baud: Option<u32>,
    ) -> Result<(), LoadError> {
        if let Some(device) = device {
            self.serial.device = device;
        }
        if let Some(baud) = baud {
            self.serial.baud = baud;
        }
        self.validate()
    }
}
