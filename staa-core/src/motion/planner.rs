//! Movement calculator
//!
//! Entry 0 of a plan drives the base screw motor, which the measurement
//! routine never reports on. Entries 1..=N drive the adjustable screws in
//! measurement order. When every screw needs a correction in the same
//! direction, the smallest one is moved onto the base screw instead, so at
//! least one adjustable screw stays put.
//!
//! Zero checks are exact. There is no tolerance band.

use core::fmt;

use heapless::Vec;
use staa_protocol::{MotorCommand, Rotation};

use crate::config::{ConfigError, MAX_MOTORS, MAX_SCREWS};
use crate::measure::MeasurementSet;

/// Shared correction for a set of per-screw turns
///
/// - all strictly positive: minus the smallest value
/// - all strictly negative: minus the value closest to zero
/// - otherwise (mixed signs, any zero, or empty): zero
pub fn base_offset(turns: &[f64]) -> f64 {
    if turns.is_empty() {
        return 0.0;
    }

    if turns.iter().all(|&t| t > 0.0) {
        -turns.iter().copied().fold(f64::INFINITY, f64::min)
    } else if turns.iter().all(|&t| t < 0.0) {
        -turns.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    } else {
        0.0
    }
}

/// One motor engagement derived from a plan entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorMove {
    /// Token command to start the motor
    pub command: MotorCommand,
    /// Unsigned number of turns
    pub turns: f64,
}

impl MotorMove {
    /// Seconds the motor must stay engaged
    pub fn duration_s(&self, full_turn_time: f64) -> f64 {
        self.turns * full_turn_time
    }

    /// Engagement time in whole microseconds (saturating)
    pub fn duration_us(&self, full_turn_time: f64) -> u64 {
        (self.duration_s(full_turn_time) * 1_000_000.0) as u64
    }
}

/// Signed motor turns, one entry per motor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementPlan {
    turns: Vec<f64, MAX_MOTORS>,
}

impl MovementPlan {
    /// Compute the plan for a measurement pass
    ///
    /// The result always has `measurements.len() + 1` entries.
    pub fn from_measurements(measurements: &MeasurementSet) -> Self {
        let mut screws: Vec<f64, MAX_SCREWS> = Vec::new();
        for reading in measurements.iter() {
            // Capacity matches MeasurementSet
            let _ = screws.push(reading.turns());
        }

        let offset = base_offset(&screws);

        let mut turns = Vec::new();
        let _ = turns.push(offset);
        for t in &screws {
            let _ = turns.push(t + offset);
        }

        Self { turns }
    }

    /// Plan that jogs a single motor
    ///
    /// `motor` is the 1-based number sent on the wire; every other entry is
    /// zero.
    pub fn manual(motor: u8, distance: f64) -> Result<Self, ConfigError> {
        if motor == 0 || motor as usize > MAX_MOTORS {
            return Err(ConfigError::ScrewOutOfRange(motor));
        }
        if !distance.is_finite() {
            return Err(ConfigError::InvalidDistance);
        }

        let mut turns = Vec::new();
        for _ in 1..motor {
            let _ = turns.push(0.0);
        }
        let _ = turns.push(distance);

        Ok(Self { turns })
    }

    /// Build a plan from raw entries; `None` if longer than `MAX_MOTORS`
    pub fn from_turns(turns: &[f64]) -> Option<Self> {
        let mut plan = Self::default();
        plan.turns.extend_from_slice(turns).ok()?;
        Some(plan)
    }

    /// Shared correction (entry 0)
    pub fn base_offset(&self) -> f64 {
        self.turns.first().copied().unwrap_or(0.0)
    }

    /// Per-screw deltas (entries 1..)
    pub fn screws(&self) -> &[f64] {
        self.turns.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Check if no motor needs to move
    pub fn is_level(&self) -> bool {
        self.turns.iter().all(|&t| t == 0.0)
    }

    /// Motor engagements in plan order, skipping zero entries
    ///
    /// Entry `i` drives motor `i + 1`; negative turns run it in reverse.
    pub fn moves(&self) -> impl Iterator<Item = MotorMove> + '_ {
        self.turns.iter().enumerate().filter_map(|(i, &t)| {
            if t == 0.0 {
                return None;
            }
            let (rotation, turns) = if t < 0.0 {
                (Rotation::Reverse, -t)
            } else {
                (Rotation::Forward, t)
            };
            // Plans never exceed MAX_MOTORS entries, so i + 1 fits in u8
            let command = MotorCommand::run((i + 1) as u8, rotation)?;
            Some(MotorMove { command, turns })
        })
    }
}

impl fmt::Display for MovementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.turns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t}")?;
        }
        Ok(())
    }
}
