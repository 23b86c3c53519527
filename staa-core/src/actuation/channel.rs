//! Actuation channel
//!
//! Owns the only link to the motor controller for the duration of a command.
//! There is no position feedback: a motor turns for as long as it stays
//! engaged, so each wait is `turns * full_turn_time` seconds.
//!
//! # Usage
//!
//! ```ignore
//! let mut channel = ActuationChannel::open(&mut connector, config.settle_time_ms(), &mut delay)?;
//! channel.drive(&plan, config.full_turn_time, &mut delay, &mut console)?;
//! channel.close();
//! ```
//!
//! Dropping an open channel closes the link as well.

use embedded_hal::delay::DelayNs;
use staa_protocol::MotorCommand;

use crate::error::Error;
use crate::motion::MovementPlan;
use crate::traits::{Console, LinkError, MotorConnector, MotorLink};
use crate::STATUS_PREFIX;

/// Exclusive session with the motor controller
pub struct ActuationChannel<L: MotorLink> {
    link: Option<L>,
}

impl<L: MotorLink> ActuationChannel<L> {
    /// Open the motor controller and wait for it to settle
    ///
    /// The controller ignores commands while it boots, so no token may be
    /// sent before `settle_time_ms` has elapsed.
    pub fn open<C, D>(connector: &mut C, settle_time_ms: u32, delay: &mut D) -> Result<Self, Error>
    where
        C: MotorConnector<Link = L> + ?Sized,
        D: DelayNs + ?Sized,
    {
        let link = connector.connect().map_err(Error::Connection)?;
        let channel = Self { link: Some(link) };

        log::info!("Motor controller open, settling for {} ms", settle_time_ms);
        delay.delay_ms(settle_time_ms);

        Ok(channel)
    }

    /// Drive every non-zero plan entry in order, then stop all motors
    ///
    /// Blocks for the full engagement time of each motor. On a write failure
    /// a stop token is attempted once before the error is returned.
    pub fn drive<D>(
        &mut self,
        plan: &MovementPlan,
        full_turn_time: f64,
        delay: &mut D,
        console: &mut dyn Console,
    ) -> Result<(), Error>
    where
        D: DelayNs + ?Sized,
    {
        for step in plan.moves() {
            console.respond_info(format_args!(
                "{STATUS_PREFIX}{} for {} seconds.",
                step.command,
                step.duration_s(full_turn_time)
            ));

            if let Err(e) = self.send(step.command) {
                self.stop_best_effort();
                return Err(e);
            }
            wait_us(delay, step.duration_us(full_turn_time));
        }

        console.respond_info(format_args!("{STATUS_PREFIX}Stopping motors."));
        self.send(MotorCommand::Stop)
    }

    /// Release the motor controller
    pub fn close(mut self) {
        self.release();
    }

    /// Check if the link is still held
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    fn send(&mut self, command: MotorCommand) -> Result<(), Error> {
        let link = self
            .link
            .as_mut()
            .ok_or(Error::Device(LinkError::Disconnected))?;

        let token = command.encode();
        log::debug!("Motor token: {}", token);

        link.write_blocking(token.as_bytes())
            .and_then(|()| link.flush())
            .map_err(Error::Device)
    }

    fn stop_best_effort(&mut self) {
        if let Err(e) = self.send(MotorCommand::Stop) {
            log::warn!("Stop token after failed write also failed: {}", e);
        }
    }

    fn release(&mut self) {
        if let Some(link) = self.link.take() {
            link.close();
            log::info!("Motor controller closed");
        }
    }
}

/// Block for `us` microseconds, split into `DelayNs`-sized chunks
fn wait_us<D: DelayNs + ?Sized>(delay: &mut D, us: u64) {
    let mut remaining = us;
    loop {
        let chunk = remaining.min(u64::from(u32::MAX));
        // Fits: chunk <= u32::MAX
        delay.delay_us(chunk as u32);
        remaining -= chunk;
        if remaining == 0 {
            break;
        }
    }
}

impl<L: MotorLink> Drop for ActuationChannel<L> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeConnector, RecordingDelay, ScriptedHost};

    #[test]
    fn test_open_waits_for_settle() {
        let mut connector = FakeConnector::new();
        let mut delay = RecordingDelay::new();

        let channel = ActuationChannel::open(&mut connector, 5000, &mut delay).unwrap();
        assert!(channel.is_open());
        assert_eq!(delay.waits_ns, vec![5_000_000_000]);
        assert!(connector.tokens().is_empty());

        channel.close();
        assert_eq!(connector.opens(), 1);
        assert_eq!(connector.closes(), 1);
    }

    #[test]
    fn test_open_failure_is_connection_error() {
        let mut connector = FakeConnector::failing(LinkError::NotFound);
        let mut delay = RecordingDelay::new();

        let result = ActuationChannel::open(&mut connector, 5000, &mut delay);
        assert_eq!(result.err(), Some(Error::Connection(LinkError::NotFound)));
        assert!(delay.waits_ns.is_empty());
        assert_eq!(connector.closes(), 0);
    }

    #[test]
    fn test_drive_sends_signed_motor_tokens() {
        let mut connector = FakeConnector::new();
        let mut delay = RecordingDelay::new();
        let mut console = ScriptedHost::default();
        let plan = MovementPlan::from_turns(&[-0.5, 0.5, 0.0]).unwrap();

        let mut channel = ActuationChannel::open(&mut connector, 0, &mut delay).unwrap();
        channel.drive(&plan, 3.0, &mut delay, &mut console).unwrap();
        channel.close();

        assert_eq!(connector.tokens(), vec!["-1", "2", "0"]);
        assert_eq!(delay.waits_s(), vec![0.0, 1.5, 1.5]);
        assert_eq!(
            console.info,
            vec![
                "STAA: -1 for 1.5 seconds.",
                "STAA: 2 for 1.5 seconds.",
                "STAA: Stopping motors.",
            ]
        );
    }

    #[test]
    fn test_level_plan_only_stops() {
        let mut connector = FakeConnector::new();
        let mut delay = RecordingDelay::new();
        let mut console = ScriptedHost::default();
        let plan = MovementPlan::from_turns(&[0.0, 0.0, 0.0]).unwrap();

        let mut channel = ActuationChannel::open(&mut connector, 0, &mut delay).unwrap();
        channel.drive(&plan, 3.0, &mut delay, &mut console).unwrap();
        drop(channel);

        assert_eq!(connector.tokens(), vec!["0"]);
        assert_eq!(connector.closes(), 1);
    }

    #[test]
    fn test_zero_turn_time_does_not_wait() {
        let mut connector = FakeConnector::new();
        let mut delay = RecordingDelay::new();
        let mut console = ScriptedHost::default();
        let plan = MovementPlan::from_turns(&[0.0, 2.0]).unwrap();

        let mut channel = ActuationChannel::open(&mut connector, 0, &mut delay).unwrap();
        channel.drive(&plan, 0.0, &mut delay, &mut console).unwrap();

        assert_eq!(connector.tokens(), vec!["2", "0"]);
        assert!(delay.waits_ns.iter().all(|&ns| ns == 0));
    }

    #[test]
    fn test_long_wait_runs_full_duration() {
        let mut connector = FakeConnector::new();
        let mut delay = RecordingDelay::new();
        let mut console = ScriptedHost::default();
        let plan = MovementPlan::from_turns(&[0.0, 2000.0]).unwrap();

        let mut channel = ActuationChannel::open(&mut connector, 0, &mut delay).unwrap();
        channel.drive(&plan, 3.0, &mut delay, &mut console).unwrap();

        assert_eq!(console.info[0], "STAA: 2 for 6000 seconds.");
        assert_eq!(connector.tokens(), vec!["2", "0"]);
        // Settle wait first, then the motor wait in u32-sized chunks
        let motor_ns: u64 = delay.waits_ns[1..].iter().sum();
        assert_eq!(motor_ns, 6_000_000_000_000);
        assert!(delay.waits_ns.len() > 2);
    }

    #[test]
    fn test_write_failure_is_device_error() {
        let mut connector = FakeConnector::failing_writes_after(1);
        let mut delay = RecordingDelay::new();
        let mut console = ScriptedHost::default();
        let plan = MovementPlan::from_turns(&[1.0, 1.0]).unwrap();

        let mut channel = ActuationChannel::open(&mut connector, 0, &mut delay).unwrap();
        let result = channel.drive(&plan, 1.0, &mut delay, &mut console);
        drop(channel);

        assert_eq!(result, Err(Error::Device(LinkError::Io)));
        assert_eq!(connector.tokens(), vec!["1"]);
        assert_eq!(connector.closes(), 1);
    }

    #[test]
    fn test_drop_closes_exactly_once() {
        let mut connector = FakeConnector::new();
        let mut delay = RecordingDelay::new();

        {
            let _channel = ActuationChannel::open(&mut connector, 0, &mut delay).unwrap();
        }
        assert_eq!(connector.opens(), 1);
        assert_eq!(connector.closes(), 1);
    }
}
