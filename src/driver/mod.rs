// src/driver/mod.rs

mod io;
mod transaction;

#[cfg(feature = "std")]
mod shared;
#[cfg(feature = "std")]
pub use shared::PhSensor;

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, I2c};

use crate::calibration::CalibrationTarget;
use crate::common::{
    command::Command,
    error::{DriverError, ProtocolError},
    response::Value,
};

/// Factory-default I2C address of the EZO pH circuit.
pub const DEFAULT_ADDRESS: u8 = 0x63;

/// Default number of times a pending status is re-read before giving up.
pub const DEFAULT_NOT_READY_RETRIES: u8 = 3;

/// Tunable driver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Seven-bit device address. EZO circuits can be readdressed, so this is
    /// configurable, but no bus discovery is ever performed.
    pub address: u8,
    /// How many times a pending status is re-read (with the issuing
    /// command's settle delay) before the transaction fails with
    /// [`ProtocolError::NotReady`].
    pub max_not_ready_retries: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            address: DEFAULT_ADDRESS,
            max_not_ready_retries: DEFAULT_NOT_READY_RETRIES,
        }
    }
}

/// The probe operations a front end drives.
///
/// Implemented by [`PhDriver`] for exclusive ownership and by
/// [`&PhSensor`](PhSensor) for guarded shared access, so calibration flows
/// and sampling loops can be written once against either.
pub trait PhProbe {
    /// Transport error type of the underlying bus.
    type BusError: Debug;

    /// Takes one pH reading, temperature-compensated when `temp_c` is given.
    fn read_ph(&mut self, temp_c: Option<f64>)
        -> Result<f64, DriverError<Self::BusError>>;

    /// Commits one calibration point.
    ///
    /// Ordering contract (device-level, not enforced here): committing a
    /// midpoint erases previously stored low and high points, so in a fresh
    /// calibration run perform Mid before Low and High. Low and High affect
    /// neither each other nor Mid.
    fn calibrate(
        &mut self,
        target: CalibrationTarget,
    ) -> Result<(), DriverError<Self::BusError>>;

    /// Restores the factory calibration curve.
    fn restore_factory_calibration(&mut self) -> Result<(), DriverError<Self::BusError>>;

    /// Enables or disables the device's I2C protocol lock.
    fn set_protocol_lock(&mut self, enabled: bool)
        -> Result<(), DriverError<Self::BusError>>;
}

impl<T: PhProbe + ?Sized> PhProbe for &mut T {
    type BusError = T::BusError;

    fn read_ph(&mut self, temp_c: Option<f64>) -> Result<f64, DriverError<Self::BusError>> {
        (**self).read_ph(temp_c)
    }

    fn calibrate(
        &mut self,
        target: CalibrationTarget,
    ) -> Result<(), DriverError<Self::BusError>> {
        (**self).calibrate(target)
    }

    fn restore_factory_calibration(&mut self) -> Result<(), DriverError<Self::BusError>> {
        (**self).restore_factory_calibration()
    }

    fn set_protocol_lock(&mut self, enabled: bool) -> Result<(), DriverError<Self::BusError>> {
        (**self).set_protocol_lock(enabled)
    }
}

/// Exclusive-ownership driver for one EZO pH circuit.
///
/// Owns the bus handle and the delay source; every operation is one blocking
/// write-then-read transaction. For use from multiple logical call sites,
/// wrap it in a [`PhSensor`], which adds the mutual-exclusion guard.
#[derive(Debug)]
pub struct PhDriver<I2C, D> {
    i2c: I2C,
    delay: D,
    config: DriverConfig,
}

impl<I2C, D, E> PhDriver<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    E: i2c::Error,
{
    /// Binds a driver to an already-initialized bus at the factory address.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, DriverConfig::default())
    }

    pub fn with_config(i2c: I2C, delay: D, config: DriverConfig) -> Self {
        PhDriver { i2c, delay, config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Releases the bus and delay handles.
    pub fn free(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Takes one pH reading, temperature-compensated when `temp_c` is given.
    ///
    /// `None` issues `R` (the device compensates at its stored reference,
    /// 25 °C from the factory); `Some(t)` issues `RT,<t>`.
    pub fn read_ph(&mut self, temp_c: Option<f64>) -> Result<f64, DriverError<E>> {
        let command = match temp_c {
            Some(temp_c) => Command::ReadAtTemperature { temp_c },
            None => Command::Read,
        };
        match self.execute(&command)? {
            Value::Ph(ph) => Ok(ph),
            Value::Ack => Err(ProtocolError::Malformed.into()),
        }
    }

    /// Commits one calibration point. See [`PhProbe::calibrate`] for the
    /// Mid-before-Low/High ordering contract.
    pub fn calibrate(&mut self, target: CalibrationTarget) -> Result<(), DriverError<E>> {
        self.execute(&target.commit_command())?;
        Ok(())
    }

    /// Restores the factory calibration curve (`Cal,clear`).
    pub fn restore_factory_calibration(&mut self) -> Result<(), DriverError<E>> {
        self.execute(&Command::ClearCalibration)?;
        Ok(())
    }

    /// Enables or disables the device's I2C protocol lock.
    pub fn set_protocol_lock(&mut self, enabled: bool) -> Result<(), DriverError<E>> {
        self.execute(&Command::ProtocolLock { enabled })?;
        Ok(())
    }
}

impl<I2C, D, E> PhProbe for PhDriver<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    E: i2c::Error,
{
    type BusError = E;

    fn read_ph(&mut self, temp_c: Option<f64>) -> Result<f64, DriverError<E>> {
        PhDriver::read_ph(self, temp_c)
    }

    fn calibrate(&mut self, target: CalibrationTarget) -> Result<(), DriverError<E>> {
        PhDriver::calibrate(self, target)
    }

    fn restore_factory_calibration(&mut self) -> Result<(), DriverError<E>> {
        PhDriver::restore_factory_calibration(self)
    }

    fn set_protocol_lock(&mut self, enabled: bool) -> Result<(), DriverError<E>> {
        PhDriver::set_protocol_lock(self, enabled)
    }
}
