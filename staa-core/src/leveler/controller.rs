//! Convergence loop controller
//!
//! Runs one command at a time, strictly sequentially:
//!
//! ```text
//! Idle ─► Homing ─► Connected ─► Measuring ─► Calculating ─► Driving
//!                        ▲                                      │
//!                        └──────────── Retrying ◄───────────────┤
//!                                         │                     ▼
//!                                     Exhausted             Converged
//!                                         └──► Disconnected ◄───┘
//! ```
//!
//! The motor controller is opened once per command and closed before the
//! command returns, on every path.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::actuation::ActuationChannel;
use crate::config::{ConfigError, LevelerConfig};
use crate::error::Error;
use crate::measure::{MeasurementSet, MeasurementSink};
use crate::motion::MovementPlan;
use crate::state::{Event, State};
use crate::traits::{MachineHost, MotorConnector};
use crate::STATUS_PREFIX;

/// Outcome of a converged automatic run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelReport {
    /// Measure/adjust cycles used, including the final level one
    pub attempts: u32,
}

/// Bed screw leveler
pub struct Leveler<H, C, D>
where
    H: MachineHost,
    C: MotorConnector,
    D: DelayNs,
{
    host: H,
    connector: C,
    delay: D,
    config: LevelerConfig,
    sink: MeasurementSink,
    state: State,
}

impl<H, C, D> Leveler<H, C, D>
where
    H: MachineHost,
    C: MotorConnector,
    D: DelayNs,
{
    /// Create a leveler; fails if `config` does not validate
    pub fn new(host: H, connector: C, delay: D, config: LevelerConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            host,
            connector,
            delay,
            config,
            sink: MeasurementSink::new(),
            state: State::Idle,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &LevelerConfig {
        &self.config
    }

    /// Readings captured by the most recent measurement pass
    pub fn measurements(&self) -> &MeasurementSet {
        self.sink.measurements()
    }

    /// Measure and adjust until the plan is level or attempts run out
    ///
    /// `max_attempts` replaces the configured maximum for this run only.
    pub fn run_auto(&mut self, max_attempts: Option<u32>) -> Result<LevelReport, Error> {
        self.state = State::Idle;
        let result = self.auto(max_attempts);
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    /// Turn a single motor by `distance` turns (negative = reverse)
    pub fn run_manual(&mut self, screw: Option<u8>, distance: Option<f64>) -> Result<(), Error> {
        self.state = State::Idle;
        let result = self.manual(screw, distance);
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    fn auto(&mut self, max_attempts: Option<u32>) -> Result<LevelReport, Error> {
        let attempts = self.config.attempts(max_attempts)?;

        self.report(format_args!("Starting"));
        self.home_if_necessary()?;

        let mut channel = ActuationChannel::open(
            &mut self.connector,
            self.config.settle_time_ms(),
            &mut self.delay,
        )?;
        self.transition(Event::LinkOpened);

        let outcome = self.converge(&mut channel, attempts);
        channel.close();
        if matches!(outcome, Ok(_) | Err(Error::ConvergenceExhausted { .. })) {
            self.transition(Event::LinkClosed);
        }
        let report = outcome?;

        self.host.home_z().map_err(Error::Homing)?;
        self.report(format_args!("Done"));

        log::info!("Bed level after {} attempt(s)", report.attempts);
        Ok(report)
    }

    fn converge(
        &mut self,
        channel: &mut ActuationChannel<C::Link>,
        attempts: u32,
    ) -> Result<LevelReport, Error> {
        for attempt in 1..=attempts {
            log::debug!("Attempt {}/{}", attempt, attempts);

            self.transition(Event::StartMeasurement);
            self.measure()?;
            self.transition(Event::MeasurementComplete);

            let plan = MovementPlan::from_measurements(self.sink.measurements());
            self.transition(Event::PlanReady);
            self.report(format_args!("Motor movements: {plan}"));

            channel.drive(
                &plan,
                self.config.full_turn_time,
                &mut self.delay,
                &mut self.host,
            )?;

            if plan.is_level() {
                self.transition(Event::PlanLevel);
                return Ok(LevelReport { attempts: attempt });
            }
            self.transition(Event::PlanNotLevel);
        }

        self.transition(Event::AttemptsExhausted);
        Err(Error::ConvergenceExhausted { attempts })
    }

    fn manual(&mut self, screw: Option<u8>, distance: Option<f64>) -> Result<(), Error> {
        let (Some(screw), Some(distance)) = (screw, distance) else {
            return Err(ConfigError::MissingScrewOrDistance.into());
        };
        let plan = MovementPlan::manual(screw, distance)?;

        let mut channel = ActuationChannel::open(
            &mut self.connector,
            self.config.settle_time_ms(),
            &mut self.delay,
        )?;
        self.transition(Event::LinkOpened);

        self.transition(Event::PlanReady);
        self.report(format_args!("Motor movements: {plan}"));
        let result = channel.drive(
            &plan,
            self.config.full_turn_time,
            &mut self.delay,
            &mut self.host,
        );
        channel.close();
        result?;

        self.transition(Event::LinkClosed);
        Ok(())
    }

    fn home_if_necessary(&mut self) -> Result<(), Error> {
        let axes = self.host.homed_axes().map_err(Error::Homing)?;
        if axes.is_fully_homed() {
            log::debug!("Toolhead already homed");
            return Ok(());
        }

        self.transition(Event::HomingRequired);
        self.report(format_args!("Homing toolhead"));
        self.host.home_all().map_err(Error::Homing)
    }

    /// Run one measurement pass with the sink armed
    fn measure(&mut self) -> Result<(), Error> {
        self.report(format_args!("Measuring bed tilt"));

        self.sink.arm();
        let result = self.host.measure_tilt(&mut self.sink);
        self.sink.disarm();
        result.map_err(Error::Measurement)?;

        if self.sink.overflowed() {
            return Err(Error::TooManyReadings);
        }
        if self.sink.measurements().is_empty() {
            return Err(Error::NoReadings);
        }

        log::debug!("Captured {} adjust readings", self.sink.measurements().len());
        Ok(())
    }

    fn report(&mut self, msg: fmt::Arguments<'_>) {
        self.host.respond_info(format_args!("{STATUS_PREFIX}{msg}"));
    }

    fn transition(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            log::debug!("State: {:?} -> {:?} on {:?}", self.state, next, event);
        }
        self.state = next;
    }

    fn fail(&mut self, error: &Error) {
        log::warn!("Command failed: {}", error);
        self.transition(Event::ErrorDetected(error.kind()));
    }
}
