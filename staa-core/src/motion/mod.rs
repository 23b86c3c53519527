//! Motion planning
//!
//! Converts tilt readings into signed motor turns.

pub mod planner;

pub use planner::{base_offset, MotorMove, MovementPlan};
