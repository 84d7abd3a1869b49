// src/driver/io.rs

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, I2c};

use super::PhDriver;
use crate::common::error::BusError;

// Bus transport: raw write/read transactions against the device address.
// No retries happen at this level; every failure surfaces to the caller.
impl<I2C, D, E> PhDriver<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    E: i2c::Error,
{
    /// Transmits one complete command string as a single I2C write.
    pub(super) fn write_command(&mut self, bytes: &[u8]) -> Result<(), BusError<E>> {
        // The codec never renders an empty or oversized command.
        debug_assert!(!bytes.is_empty());
        self.i2c
            .write(self.config.address, bytes)
            .map_err(BusError::from_i2c)
    }

    /// Waits out the command's settle delay, then performs exactly one read
    /// of `needed` response bytes into `buf`.
    pub(super) fn read_response(
        &mut self,
        buf: &mut [u8],
        needed: usize,
        settle: Duration,
    ) -> Result<(), BusError<E>> {
        if buf.len() < needed {
            return Err(BusError::Truncated {
                needed,
                got: buf.len(),
            });
        }

        self.delay.delay_ms(settle.as_millis() as u32);
        self.i2c
            .read(self.config.address, &mut buf[..needed])
            .map_err(BusError::from_i2c)
    }
}
