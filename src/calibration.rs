//! Three-point calibration sequencing.
//!
//! EZO circuits store their calibration curve on-device: the driver's job is
//! to feed the operator stabilization readings while the probe sits in the
//! calibration solution, then commit exactly one calibration command once
//! the readings have settled. [`CalibrationSession`] models those two phases
//! explicitly so any front end (CLI keypress, timer, remote signal) can
//! drive them.
//!
//! Ordering contract, enforced by the hardware rather than this driver:
//! committing a midpoint erases previously stored low and high points, so a
//! fresh calibration run performs Mid first. Low and High affect neither
//! each other nor Mid.

use crate::common::command::{Command, DEFAULT_TEMPERATURE_C};
use crate::common::error::{DriverError, InvalidTarget};
use crate::driver::PhProbe;

/// One of the three calibration points defining the probe's response curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPoint {
    /// Lowpoint, typically pH 4.00 solution.
    Low,
    /// Midpoint, typically pH 7.00 solution. Erases Low/High on commit.
    Mid,
    /// Highpoint, typically pH 10.00 solution.
    High,
}

/// A validated calibration target: point, solution pH, and optionally the
/// solution temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationTarget {
    point: CalibrationPoint,
    ph: f64,
    temp_c: Option<f64>,
}

impl CalibrationTarget {
    /// Builds a target, rejecting pH values outside the open interval
    /// (0, 14).
    pub fn new(point: CalibrationPoint, ph: f64) -> Result<Self, InvalidTarget> {
        if !ph.is_finite() || ph <= 0.0 || ph >= 14.0 {
            return Err(InvalidTarget { ph });
        }
        Ok(CalibrationTarget {
            point,
            ph,
            temp_c: None,
        })
    }

    /// Declares the calibration solution's temperature, in degrees Celsius.
    /// Stabilization readings then use device-side compensation at this
    /// temperature; without it the device's own 25 °C reference applies.
    pub fn at_temperature(mut self, temp_c: f64) -> Self {
        self.temp_c = Some(temp_c);
        self
    }

    pub fn point(&self) -> CalibrationPoint {
        self.point
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temp_c
    }

    /// The reference temperature in effect for this target.
    pub fn temperature_or_default(&self) -> f64 {
        self.temp_c.unwrap_or(DEFAULT_TEMPERATURE_C)
    }

    /// The wire command committing this target.
    pub(crate) fn commit_command(&self) -> Command {
        match self.point {
            CalibrationPoint::Low => Command::CalibrateLow { ph: self.ph },
            CalibrationPoint::Mid => Command::CalibrateMid { ph: self.ph },
            CalibrationPoint::High => Command::CalibrateHigh { ph: self.ph },
        }
    }
}

/// A calibration run for one point: a stabilization phase feeding readings
/// to the operator, then a single commit.
///
/// Beginning a session enters the stabilization phase. [`sample`] produces
/// one reading per call and never exits the phase on its own; termination is
/// the front end's trigger (a keypress in the reference harness), which the
/// front end expresses by calling [`commit`] or by dropping the session.
/// [`commit`] consumes the session and issues exactly one calibration
/// command: a failed commit surfaces the error and cannot be replayed on the
/// same session, since silently re-committing could corrupt the on-device
/// calibration state.
///
/// Factory restore needs no stabilization and therefore no session; it is a
/// single [`PhProbe::restore_factory_calibration`] call.
///
/// [`sample`]: CalibrationSession::sample
/// [`commit`]: CalibrationSession::commit
#[derive(Debug)]
pub struct CalibrationSession<P: PhProbe> {
    probe: P,
    target: CalibrationTarget,
}

impl<P: PhProbe> CalibrationSession<P> {
    /// Starts the stabilization phase for `target`.
    pub fn begin(probe: P, target: CalibrationTarget) -> Self {
        CalibrationSession { probe, target }
    }

    pub fn target(&self) -> &CalibrationTarget {
        &self.target
    }

    /// Takes one stabilization reading, temperature-compensated when the
    /// target declared a solution temperature.
    ///
    /// Each call is an independent bus transaction; the shared-bus guard is
    /// not held between calls, so other contexts may run their own
    /// transactions between polls.
    pub fn sample(&mut self) -> Result<f64, DriverError<P::BusError>> {
        self.probe.read_ph(self.target.temperature())
    }

    /// Commits the calibration point.
    pub fn commit(mut self) -> Result<(), DriverError<P::BusError>> {
        self.probe.calibrate(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ProtocolError;
    use std::vec::Vec;

    #[test]
    fn test_target_range_is_open() {
        assert!(CalibrationTarget::new(CalibrationPoint::Mid, 7.0).is_ok());
        assert!(CalibrationTarget::new(CalibrationPoint::Low, 0.01).is_ok());
        assert!(CalibrationTarget::new(CalibrationPoint::High, 13.99).is_ok());

        assert_eq!(
            CalibrationTarget::new(CalibrationPoint::Mid, 0.0),
            Err(InvalidTarget { ph: 0.0 })
        );
        assert_eq!(
            CalibrationTarget::new(CalibrationPoint::High, 14.0),
            Err(InvalidTarget { ph: 14.0 })
        );
        assert!(CalibrationTarget::new(CalibrationPoint::Mid, -3.0).is_err());
        assert!(CalibrationTarget::new(CalibrationPoint::Mid, f64::NAN).is_err());
    }

    #[test]
    fn test_commit_command_forms() {
        let mid = CalibrationTarget::new(CalibrationPoint::Mid, 7.0).unwrap();
        assert_eq!(
            mid.commit_command(),
            Command::CalibrateMid { ph: 7.0 }
        );

        let low = CalibrationTarget::new(CalibrationPoint::Low, 4.0).unwrap();
        assert_eq!(low.commit_command(), Command::CalibrateLow { ph: 4.0 });

        let high = CalibrationTarget::new(CalibrationPoint::High, 10.0).unwrap();
        assert_eq!(high.commit_command(), Command::CalibrateHigh { ph: 10.0 });
    }

    #[test]
    fn test_temperature_defaulting() {
        let target = CalibrationTarget::new(CalibrationPoint::Mid, 7.0).unwrap();
        assert_eq!(target.temperature(), None);
        assert_eq!(target.temperature_or_default(), DEFAULT_TEMPERATURE_C);

        let target = target.at_temperature(21.5);
        assert_eq!(target.temperature(), Some(21.5));
        assert_eq!(target.temperature_or_default(), 21.5);
    }

    // --- Scripted probe for session-flow tests ---

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Read(Option<f64>),
        Calibrate(CalibrationTarget),
    }

    struct ScriptedProbe {
        calls: Vec<Call>,
        reading: f64,
        fail_commit: Option<ProtocolError>,
    }

    impl ScriptedProbe {
        fn new(reading: f64) -> Self {
            ScriptedProbe {
                calls: Vec::new(),
                reading,
                fail_commit: None,
            }
        }
    }

    impl PhProbe for ScriptedProbe {
        type BusError = ();

        fn read_ph(&mut self, temp_c: Option<f64>) -> Result<f64, DriverError<()>> {
            self.calls.push(Call::Read(temp_c));
            Ok(self.reading)
        }

        fn calibrate(&mut self, target: CalibrationTarget) -> Result<(), DriverError<()>> {
            self.calls.push(Call::Calibrate(target));
            match self.fail_commit {
                Some(e) => Err(e.into()),
                None => Ok(()),
            }
        }

        fn restore_factory_calibration(&mut self) -> Result<(), DriverError<()>> {
            Ok(())
        }

        fn set_protocol_lock(&mut self, _enabled: bool) -> Result<(), DriverError<()>> {
            Ok(())
        }
    }

    #[test]
    fn test_session_samples_then_commits_once() {
        let mut probe = ScriptedProbe::new(6.97);
        let target = CalibrationTarget::new(CalibrationPoint::Mid, 7.0)
            .unwrap()
            .at_temperature(23.5);

        let mut session = CalibrationSession::begin(&mut probe, target);
        assert_eq!(session.sample().unwrap(), 6.97);
        assert_eq!(session.sample().unwrap(), 6.97);
        session.commit().unwrap();

        assert_eq!(
            probe.calls,
            [
                Call::Read(Some(23.5)),
                Call::Read(Some(23.5)),
                Call::Calibrate(target),
            ]
        );
    }

    #[test]
    fn test_session_without_temperature_samples_plain() {
        let mut probe = ScriptedProbe::new(4.02);
        let target = CalibrationTarget::new(CalibrationPoint::Low, 4.0).unwrap();

        let mut session = CalibrationSession::begin(&mut probe, target);
        session.sample().unwrap();
        session.commit().unwrap();

        assert_eq!(probe.calls[0], Call::Read(None));
    }

    #[test]
    fn test_failed_commit_surfaces_and_consumes_session() {
        let mut probe = ScriptedProbe::new(7.0);
        probe.fail_commit = Some(ProtocolError::Syntax);
        let target = CalibrationTarget::new(CalibrationPoint::Mid, 7.0).unwrap();

        let session = CalibrationSession::begin(&mut probe, target);
        let result = session.commit();
        assert!(matches!(
            result,
            Err(DriverError::Protocol(ProtocolError::Syntax))
        ));
        // Exactly one calibration command went out; the session is gone, so
        // nothing can replay it.
        assert_eq!(probe.calls, [Call::Calibrate(target)]);
    }
}
