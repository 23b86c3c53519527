//! Motor actuation
//!
//! Open-loop driving of the screw motors over an owned controller link.

pub mod channel;

pub use channel::ActuationChannel;
