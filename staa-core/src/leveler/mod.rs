//! Leveling commands
//!
//! The automatic measure/adjust convergence loop and the manual single-motor
//! jog, both driven through the collaborator traits.

pub mod controller;

pub use controller::{LevelReport, Leveler};
