//! Driver for Atlas Scientific EZO-class pH circuits operating in I2C mode.
//!
//! The EZO circuit speaks a small ASCII command set over I2C: a command
//! string is written to the device, the device needs a command-dependent
//! settle time to process it, and the response is then read back as a status
//! byte followed by ASCII data. This crate provides the command codec, a
//! transaction layer that handles settle delays and bounded busy-status
//! re-reads, a mutex-guarded handle so a sampling loop and a calibration
//! routine can share one bus, and a two-phase calibration session
//! (stabilize, then commit).
//!
//! Example on a Raspberry-Pi-class host (with the `linux` feature):
//!
//! ```ignore
//! use ezo_ph::{linux, CalibrationPoint, CalibrationSession, CalibrationTarget};
//!
//! let sensor = linux::open("/dev/i2c-1")?;
//!
//! // Plain and temperature-compensated readings.
//! let ph = sensor.read_ph(None)?;
//! let ph_at_18 = sensor.read_ph(Some(18.3))?;
//!
//! // Midpoint calibration: watch readings settle in pH 7.00 solution,
//! // then commit. Mid erases any previous low/high points on the device,
//! // so perform it first in a fresh calibration run.
//! let target = CalibrationTarget::new(CalibrationPoint::Mid, 7.00)?;
//! let mut session = CalibrationSession::begin(&sensor, target);
//! while operator_is_waiting() {
//!     println!("pH = {:.2}", session.sample()?);
//! }
//! session.commit()?;
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod calibration;
pub mod common;
pub mod driver;
#[cfg(feature = "linux")]
pub mod linux;

// Re-export key types for convenience
pub use calibration::{CalibrationPoint, CalibrationSession, CalibrationTarget};
pub use common::{BusError, Command, DriverError, ProtocolError, DEFAULT_TEMPERATURE_C};
pub use driver::{DriverConfig, PhDriver, PhProbe, DEFAULT_ADDRESS};
#[cfg(feature = "std")]
pub use driver::PhSensor;
#[cfg(feature = "linux")]
pub use linux::InitError;
