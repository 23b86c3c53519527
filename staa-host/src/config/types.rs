//! Configuration file layout

use serde::Deserialize;
use staa_core::config::LevelerConfig;

/// Top-level `staa.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostConfig {
    pub serial: SerialConfig,
    #[serde(default)]
    pub leveling: LevelerConfig,
    pub host: HostCommands,
}

/// `[serial]`: motor controller port
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SerialConfig {
    pub device: String,
    pub baud: u32,
}

/// `[host]`: shell commands for the printer host collaborator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostCommands {
    /// Prints the homed axes, e.g. `xyz`
    pub homed_axes: String,
    /// Full home
    pub home: String,
    /// Z-only home
    pub home_z: String,
    /// Prints the bed-tilt routine output
    pub measure: String,
}

impl HostCommands {
    /// Field name and command, in file order
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("homed_axes", self.homed_axes.as_str()),
            ("home", self.home.as_str()),
            ("home_z", self.home_z.as_str()),
            ("measure", self.measure.as_str()),
        ]
    }
}
