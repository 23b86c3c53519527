//! State machine definition

use super::events::Event;

/// Leveler states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No command running
    Idle,
    /// Full home in progress
    Homing,
    /// Motor controller open and settled
    Connected,
    /// Measurement sink armed, host routine running
    Measuring,
    /// Computing the movement plan
    Calculating,
    /// Motors being driven
    Driving,
    /// Last plan was all zero
    Converged,
    /// Plan was not level, measuring again
    Retrying,
    /// Attempt budget used up without converging
    Exhausted,
    /// Motor controller closed after a completed command
    Disconnected,
    /// Command aborted
    Error(ErrorKind),
}

/// Types of errors that abort a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Invalid arguments or configuration
    Config,
    /// Motor controller could not be opened
    Connection,
    /// Motor controller write failed
    Device,
    /// Host homing failed
    Homing,
    /// Measurement routine failed or reported unusable data
    Measurement,
    /// Attempt budget used up
    NotConverged,
}

impl State {
    /// Check if a command has finished in this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Disconnected | State::Error(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Faults abort from anywhere
            (_, ErrorDetected(kind)) => Error(kind),

            // Idle transitions
            (Idle, HomingRequired) => Homing,
            (Idle, LinkOpened) => Connected,

            // Homing transitions
            (Homing, LinkOpened) => Connected,

            // Measure/adjust cycle
            (Connected, StartMeasurement) => Measuring,
            (Retrying, StartMeasurement) => Measuring,
            (Measuring, MeasurementComplete) => Calculating,
            (Calculating, PlanReady) => Driving,
            (Driving, PlanLevel) => Converged,
            (Driving, PlanNotLevel) => Retrying,
            (Retrying, AttemptsExhausted) => Exhausted,

            // Manual jog drives straight after connecting
            (Connected, PlanReady) => Driving,

            // Disconnect
            (Converged, LinkClosed) => Disconnected,
            (Exhausted, LinkClosed) => Disconnected,
            (Driving, LinkClosed) => Disconnected,

            // Default: stay in current state
            _ => self,
        }
    }
}
