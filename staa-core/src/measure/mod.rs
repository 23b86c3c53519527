//! Measurement capture
//!
//! Turns the host's diagnostic output into per-screw tilt readings, but only
//! while a measurement pass is in progress.

pub mod sink;

pub use sink::{MeasurementSet, MeasurementSink, TiltReading};
