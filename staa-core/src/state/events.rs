//! Events that trigger state transitions

use super::machine::ErrorKind;

/// Events raised by the leveler while running a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Setup events
    /// Host reports axes that still need homing
    HomingRequired,
    /// Motor controller opened and settle delay elapsed
    LinkOpened,

    // Cycle events
    /// Measurement sink armed and host routine started
    StartMeasurement,
    /// Host routine finished with usable readings
    MeasurementComplete,
    /// Movement plan computed
    PlanReady,
    /// Driven plan was all zero
    PlanLevel,
    /// Driven plan still had corrections
    PlanNotLevel,
    /// No attempts left
    AttemptsExhausted,

    // Teardown events
    /// Motor controller closed
    LinkClosed,

    // Fault events
    /// Command aborted with an error
    ErrorDetected(ErrorKind),
}
