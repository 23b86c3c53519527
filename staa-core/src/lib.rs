//! Board-agnostic core logic for automatic bed screw leveling
//!
//! This crate contains the whole measure/adjust control loop without
//! depending on a concrete serial port, printer host, or clock:
//!
//! - Measurement sink (adjust report capture while armed)
//! - Movement calculator (clock readings to signed motor turns)
//! - Actuation channel (timed motor tokens over an owned link)
//! - Convergence loop controller and its state machine
//! - Collaborator traits (host, motor link, delays via `embedded-hal`)
//! - Configuration and error types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod actuation;
pub mod config;
pub mod error;
pub mod leveler;
pub mod measure;
pub mod motion;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::Error;

/// Prefix for every user-facing status line
pub const STATUS_PREFIX: &str = "STAA: ";
