//! Collaborator traits
//!
//! These traits define the interface between the leveling logic and the
//! outside world: the printer host that homes and measures, and the serial
//! link to the screw motor controller. Blocking waits go through
//! [`embedded_hal::delay::DelayNs`].

pub mod host;
pub mod link;

pub use host::{AxisSet, Console, HostError, LineSink, MachineHost};
pub use link::{LinkError, MotorConnector, MotorLink};
