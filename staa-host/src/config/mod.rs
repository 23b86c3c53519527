//! Configuration loading
//!
//! Reads `staa.toml` from disk. The `[leveling]` section falls back to the
//! core defaults; `[serial]` and `[host]` are required.

pub mod loader;
pub mod types;

pub use types::{HostCommands, HostConfig, SerialConfig};
