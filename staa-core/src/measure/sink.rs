//! Measurement sink
//!
//! The sink is fed every host output line. It is disarmed by default and
//! only captures `adjust` readings between [`MeasurementSink::arm`] and
//! [`MeasurementSink::disarm`]. Readings keep their arrival order, which is
//! the only link between a reading and its screw.

use heapless::Vec;
use staa_protocol::{parse_adjust, AdjustReport, Direction};

use crate::config::MAX_SCREWS;
use crate::traits::LineSink;

/// Tilt reading for one adjustable screw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltReading {
    pub direction: Direction,
    pub hours: u32,
    pub minutes: u32,
}

impl TiltReading {
    /// Signed turns: one hour is a full turn, counter-clockwise is negative
    pub fn turns(&self) -> f64 {
        let magnitude = self.hours as f64 + self.minutes as f64 / 60.0;
        magnitude * self.direction.sign()
    }
}

impl From<AdjustReport> for TiltReading {
    fn from(report: AdjustReport) -> Self {
        Self {
            direction: report.direction,
            hours: report.hours,
            minutes: report.minutes,
        }
    }
}

/// Readings captured during one measurement pass, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementSet {
    readings: Vec<TiltReading, MAX_SCREWS>,
}

impl MeasurementSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from readings; `None` if there are more than `MAX_SCREWS`
    pub fn from_readings(readings: &[TiltReading]) -> Option<Self> {
        let mut set = Self::new();
        set.readings.extend_from_slice(readings).ok()?;
        Some(set)
    }

    /// Readings in emission order
    pub fn readings(&self) -> &[TiltReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TiltReading> {
        self.readings.iter()
    }
}

/// Armed capture of adjust readings from host output
#[derive(Debug, Default)]
pub struct MeasurementSink {
    armed: bool,
    measurements: MeasurementSet,
    overflowed: bool,
}

impl MeasurementSink {
    /// Create a disarmed sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new measurement pass, discarding previous readings
    pub fn arm(&mut self) {
        self.measurements.readings.clear();
        self.overflowed = false;
        self.armed = true;
    }

    /// End the measurement pass; readings stay available
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Readings from the current or most recent pass
    pub fn measurements(&self) -> &MeasurementSet {
        &self.measurements
    }

    /// Check if the last pass reported more screws than can be stored
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

impl LineSink for MeasurementSink {
    fn on_output_line(&mut self, line: &str) {
        if !self.armed {
            return;
        }

        let Some(report) = parse_adjust(line) else {
            return;
        };

        log::trace!("captured adjust reading: {:?}", report);
        if self.measurements.readings.push(report.into()).is_err() {
            log::warn!("more than {} adjust readings, dropping: {}", MAX_SCREWS, line);
            self.overflowed = true;
        }
    }
}
