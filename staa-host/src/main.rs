//! Screws Tilt Adjust Auto
//!
//! Levels a printer bed by turning motorized bed screws:
//! - `auto`: measure tilt, turn the screws, repeat until level
//! - `manual`: turn a single motor by a number of turns
//!
//! The printer host is driven through shell commands from `staa.toml`;
//! the screw motors sit behind a serial motor controller.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use staa_core::leveler::Leveler;

mod config;
mod delay;
mod host;
mod serial;

use crate::config::HostConfig;
use crate::delay::StdDelay;
use crate::host::CommandHost;
use crate::serial::SerialConnector;

/// Default configuration file
const DEFAULT_CONFIG: &str = "staa.toml";

/// Motorized bed screw leveling
#[derive(Parser, Debug)]
#[command(name = "staa")]
#[command(about = "Automatically adjust bed level screws using motors")]
#[command(version)]
struct Args {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Motor controller serial device (overrides [serial] device)
    #[arg(long, global = true)]
    device: Option<String>,

    /// Motor controller baud rate (overrides [serial] baud)
    #[arg(long, global = true)]
    baud: Option<u32>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Cmd {
    /// Measure and adjust until the bed is level
    Auto {
        /// Attempts before giving up (overrides [leveling] maximum_attempts)
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Turn one screw motor
    Manual {
        /// Motor number (1 = base screw)
        #[arg(long)]
        screw: Option<u8>,

        /// Turns to apply; negative runs the motor in reverse
        #[arg(long, allow_negative_numbers = true)]
        distance: Option<f64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = HostConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    config
        .apply_overrides(args.device, args.baud)
        .context("Invalid command-line override")?;

    let host = CommandHost::new(config.host.clone(), io::stdout());
    let connector = SerialConnector::new(&config.serial);
    let mut leveler =
        Leveler::new(host, connector, StdDelay, config.leveling).map_err(anyhow::Error::msg)?;

    match args.command {
        Cmd::Auto { max_attempts } => {
            let report = leveler
                .run_auto(max_attempts)
                .map_err(anyhow::Error::msg)
                .context("Automatic leveling failed")?;
            info!("Level after {} attempt(s)", report.attempts);
        }
        Cmd::Manual { screw, distance } => {
            leveler
                .run_manual(screw, distance)
                .map_err(anyhow::Error::msg)
                .context("Manual adjustment failed")?;
        }
    }

    Ok(())
}
