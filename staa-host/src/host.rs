//! Printer host collaborator backed by shell commands
//!
//! Each configured command runs through `sh -c`. The measurement command's
//! stdout is streamed line by line into the sink while it runs.

use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, trace, warn};
use staa_core::traits::{AxisSet, Console, HostError, LineSink, MachineHost};

use crate::config::HostCommands;

/// Host that shells out for homing and measurement
pub struct CommandHost<W: Write> {
    commands: HostCommands,
    out: W,
}

impl<W: Write> CommandHost<W> {
    /// Status text is written to `out`, one line per message
    pub fn new(commands: HostCommands, out: W) -> Self {
        Self { commands, out }
    }

    /// Run a command to completion and capture its stdout
    fn capture(&self, label: &str, command: &str) -> Result<String, HostError> {
        debug!("Running {} command: {}", label, command);
        let output = shell(command)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| unavailable(label, e))?;

        check_status(label, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl<W: Write> Console for CommandHost<W> {
    fn respond_info(&mut self, msg: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{msg}").and_then(|()| self.out.flush()) {
            warn!("Unable to write status line: {}", e);
        }
    }
}

impl<W: Write> MachineHost for CommandHost<W> {
    fn homed_axes(&mut self) -> Result<AxisSet, HostError> {
        let status = self.capture("homed_axes", &self.commands.homed_axes)?;
        let axes = AxisSet::parse(status.trim());
        debug!("Homed axes: {:?}", axes);
        Ok(axes)
    }

    fn home_all(&mut self) -> Result<(), HostError> {
        self.capture("home", &self.commands.home).map(drop)
    }

    fn home_z(&mut self) -> Result<(), HostError> {
        self.capture("home_z", &self.commands.home_z).map(drop)
    }

    fn measure_tilt(&mut self, output: &mut dyn LineSink) -> Result<(), HostError> {
        debug!("Running measure command: {}", self.commands.measure);
        let mut child = shell(&self.commands.measure)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| unavailable("measure", e))?;

        let streamed = match child.stdout.take() {
            Some(stdout) => stream_lines(BufReader::new(stdout), output),
            None => Ok(()),
        };

        let status = child.wait().map_err(|e| unavailable("measure", e))?;
        check_status("measure", status)?;
        streamed.map_err(|e| {
            warn!("Unable to read measure output: {}", e);
            HostError::Failed
        })
    }
}

/// Feed every line to the sink; bytes that are not UTF-8 are replaced
fn stream_lines<R: BufRead>(mut reader: R, output: &mut dyn LineSink) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);
        trace!("measure: {}", line);
        output.on_output_line(&line);
    }
}

fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).stdin(Stdio::null());
    cmd
}

fn check_status(label: &str, status: ExitStatus) -> Result<(), HostError> {
    if status.success() {
        Ok(())
    } else {
        warn!("{} command failed: {}", label, status);
        Err(HostError::Failed)
    }
}

fn unavailable(label: &str, e: io::Error) -> HostError {
    warn!("Unable to start {} command: {}", label, e);
    HostError::Unavailable
}
