//! Screws Tilt Adjust text protocols
//!
//! This crate defines the two plain-text contracts the leveler sits between:
//!
//! - **Adjust reports** (input): diagnostic lines emitted by the bed-tilt
//!   measurement routine, e.g.
//!   `front right screw : x=225.0, y=25.0, z=2.48750 : adjust CW 00:18`.
//! - **Motor tokens** (output): ASCII decimal identifiers written to the
//!   screw motor controller over a serial link.
//!
//! # Motor Token Overview
//!
//! ```text
//! ┌─────────┬──────────────────────────────┐
//! │ TOKEN   │ MEANING                      │
//! ├─────────┼──────────────────────────────┤
//! │ "N"     │ run motor N forward          │
//! │ "-N"    │ run motor N in reverse       │
//! │ "0"     │ stop all motors              │
//! └─────────┴──────────────────────────────┘
//! ```
//!
//! There is no acknowledgement; the device is driven open-loop and only one
//! motor is engaged at a time.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod report;

pub use command::{CommandError, MotorCommand, Rotation, MAX_TOKEN_LEN, STOP_TOKEN};
pub use report::{parse_adjust, AdjustReport, Direction};
