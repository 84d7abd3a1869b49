// src/driver/shared.rs

use std::sync::{Mutex, MutexGuard, PoisonError};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, I2c};

use super::{DriverConfig, PhDriver, PhProbe};
use crate::calibration::CalibrationTarget;
use crate::common::error::DriverError;

/// Process-wide handle to one physical pH probe.
///
/// Wraps the exclusive [`PhDriver`] in a mutual-exclusion lock so a
/// background sampling loop and a foreground calibration routine can share
/// the bus. The lock is held for one full write-then-read transaction,
/// including any bounded busy-status re-reads, and released on every exit
/// path before control returns. It is never held across a calibration's
/// stabilization polling loop: each poll is its own transaction, so other
/// contexts may interleave whole transactions between polls.
#[derive(Debug)]
pub struct PhSensor<I2C, D> {
    driver: Mutex<PhDriver<I2C, D>>,
}

impl<I2C, D, E> PhSensor<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    E: i2c::Error,
{
    /// Binds a guarded handle to an already-initialized bus at the factory
    /// address.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, DriverConfig::default())
    }

    pub fn with_config(i2c: I2C, delay: D, config: DriverConfig) -> Self {
        PhSensor {
            driver: Mutex::new(PhDriver::with_config(i2c, delay, config)),
        }
    }

    /// Unwraps the guarded handle back into the exclusive driver.
    pub fn into_inner(self) -> PhDriver<I2C, D> {
        self.driver
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, PhDriver<I2C, D>> {
        // The driver holds no cross-call state, so a lock poisoned by a
        // panicking caller leaves nothing inconsistent to protect.
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes one pH reading, temperature-compensated when `temp_c` is given.
    pub fn read_ph(&self, temp_c: Option<f64>) -> Result<f64, DriverError<E>> {
        self.lock().read_ph(temp_c)
    }

    /// Commits one calibration point. See [`PhProbe::calibrate`] for the
    /// Mid-before-Low/High ordering contract.
    pub fn calibrate(&self, target: CalibrationTarget) -> Result<(), DriverError<E>> {
        self.lock().calibrate(target)
    }

    /// Restores the factory calibration curve.
    pub fn restore_factory_calibration(&self) -> Result<(), DriverError<E>> {
        self.lock().restore_factory_calibration()
    }

    /// Enables or disables the device's I2C protocol lock.
    pub fn set_protocol_lock(&self, enabled: bool) -> Result<(), DriverError<E>> {
        self.lock().set_protocol_lock(enabled)
    }
}

impl<I2C, D, E> PhProbe for &PhSensor<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    E: i2c::Error,
{
    type BusError = E;

    fn read_ph(&mut self, temp_c: Option<f64>) -> Result<f64, DriverError<E>> {
        PhSensor::read_ph(self, temp_c)
    }

    fn calibrate(&mut self, target: CalibrationTarget) -> Result<(), DriverError<E>> {
        PhSensor::calibrate(self, target)
    }

    fn restore_factory_calibration(&mut self) -> Result<(), DriverError<E>> {
        PhSensor::restore_factory_calibration(self)
    }

    fn set_protocol_lock(&mut self, enabled: bool) -> Result<(), DriverError<E>> {
        PhSensor::set_protocol_lock(self, enabled)
    }
}
