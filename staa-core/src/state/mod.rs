//! State machine for the leveling commands
//!
//! Tracks where a command is in the homing, connect, measure/adjust and
//! disconnect sequence. The state machine is explicit, finite, and
//! deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{ErrorKind, State};
