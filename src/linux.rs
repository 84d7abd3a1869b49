//! Linux bus adapter for Raspberry-Pi-class hosts.
//!
//! Opening the I2C character device is the one piece of platform setup this
//! driver depends on; it must succeed before any bus transaction is
//! attempted, and a failure here is unrecoverable for the process.

use std::path::Path;

use linux_embedded_hal::i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::{Delay, I2cdev};

use crate::driver::{DriverConfig, PhSensor};

/// Platform initialization failure. Distinct from [`DriverError`] so a
/// command-line caller can exit differently for "the bus never came up"
/// than for a device or protocol failure mid-run.
///
/// [`DriverError`]: crate::common::error::DriverError
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The I2C character device could not be opened.
    #[error("failed to open I2C bus device: {0}")]
    Bus(#[from] LinuxI2CError),
}

/// Opens an I2C character device (e.g. `/dev/i2c-1`) and binds a guarded
/// sensor handle to it at the factory address.
pub fn open<P: AsRef<Path>>(path: P) -> Result<PhSensor<I2cdev, Delay>, InitError> {
    open_with_config(path, DriverConfig::default())
}

/// [`open`] with explicit driver parameters.
pub fn open_with_config<P: AsRef<Path>>(
    path: P,
    config: DriverConfig,
) -> Result<PhSensor<I2cdev, Delay>, InitError> {
    let bus = I2cdev::new(path)?;
    Ok(PhSensor::with_config(bus, Delay {}, config))
}
