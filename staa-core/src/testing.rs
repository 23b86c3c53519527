//! Deterministic fakes for the collaborator traits

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::traits::{
    AxisSet, Console, HostError, LineSink, LinkError, MachineHost, MotorConnector, MotorLink,
};

/// What the fake motor controller saw
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub opens: u32,
    pub closes: u32,
    pub tokens: Vec<String>,
    /// Fail `connect` with this error
    pub connect_error: Option<LinkError>,
    /// Fail every write once this many tokens were accepted
    pub fail_writes_after: Option<usize>,
}

#[derive(Debug, Default)]
pub struct FakeConnector {
    pub log: Rc<RefCell<DeviceLog>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: LinkError) -> Self {
        let connector = Self::default();
        connector.log.borrow_mut().connect_error = Some(error);
        connector
    }

    pub fn failing_writes_after(accepted: usize) -> Self {
        let connector = Self::default();
        connector.log.borrow_mut().fail_writes_after = Some(accepted);
        connector
    }

    pub fn opens(&self) -> u32 {
        self.log.borrow().opens
    }

    pub fn closes(&self) -> u32 {
        self.log.borrow().closes
    }

    pub fn tokens(&self) -> Vec<String> {
        self.log.borrow().tokens.clone()
    }
}

impl MotorConnector for FakeConnector {
    type Link = FakeLink;

    fn connect(&mut self) -> Result<FakeLink, LinkError> {
        let mut log = self.log.borrow_mut();
        if let Some(error) = log.connect_error {
            return Err(error);
        }
        log.opens += 1;
        Ok(FakeLink {
            log: Rc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
pub struct FakeLink {
    log: Rc<RefCell<DeviceLog>>,
}

impl MotorLink for FakeLink {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), LinkError> {
        let mut log = self.log.borrow_mut();
        if let Some(limit) = log.fail_writes_after {
            if log.tokens.len() >= limit {
                return Err(LinkError::Io);
            }
        }
        log.tokens.push(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        Ok(())
    }

    fn close(self) {
        self.log.borrow_mut().closes += 1;
    }
}

/// Delay that records requested durations instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub waits_ns: Vec<u64>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded waits in seconds
    pub fn waits_s(&self) -> Vec<f64> {
        self.waits_ns.iter().map(|&ns| ns as f64 / 1e9).collect()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.waits_ns.push(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ns.push(u64::from(ms) * 1_000_000);
    }
}

/// Host that replays canned measurement output
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub homed_axes: String,
    /// Output of each measurement pass; the last pass repeats
    pub passes: Vec<Vec<String>>,
    pub info: Vec<String>,
    pub home_all_calls: u32,
    pub home_z_calls: u32,
    pub measure_calls: u32,
    pub home_error: Option<HostError>,
    pub home_z_error: Option<HostError>,
    pub measure_error: Option<HostError>,
}

impl ScriptedHost {
    pub fn homed(passes: &[&[&str]]) -> Self {
        Self {
            homed_axes: "xyz".to_string(),
            passes: passes
                .iter()
                .map(|pass| pass.iter().map(|line| line.to_string()).collect())
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_homed_axes(mut self, axes: &str) -> Self {
        self.homed_axes = axes.to_string();
        self
    }
}

impl Console for ScriptedHost {
    fn respond_info(&mut self, msg: fmt::Arguments<'_>) {
        self.info.push(msg.to_string());
    }
}

impl MachineHost for ScriptedHost {
    fn homed_axes(&mut self) -> Result<AxisSet, HostError> {
        Ok(AxisSet::parse(&self.homed_axes))
    }

    fn home_all(&mut self) -> Result<(), HostError> {
        self.home_all_calls += 1;
        match self.home_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn home_z(&mut self) -> Result<(), HostError> {
        self.home_z_calls += 1;
        match self.home_z_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn measure_tilt(&mut self, output: &mut dyn LineSink) -> Result<(), HostError> {
        let pass = (self.measure_calls as usize).min(self.passes.len().saturating_sub(1));
        self.measure_calls += 1;

        if let Some(e) = self.measure_error {
            return Err(e);
        }
        if let Some(lines) = self.passes.get(pass) {
            for line in lines {
                output.on_output_line(line);
            }
        }
        Ok(())
    }
}
