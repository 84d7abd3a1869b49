// src/driver/transaction.rs

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, I2c};

use super::PhDriver;
use crate::common::{
    command::{Command, MAX_RESPONSE_LEN},
    error::{DriverError, ProtocolError},
    response::{self, Value},
};

impl<I2C, D, E> PhDriver<I2C, D>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    E: i2c::Error,
{
    /// Executes one full command-response transaction.
    ///
    /// The command is written exactly once. A pending status re-reads the
    /// response after another settle delay, up to the configured bound;
    /// re-writing the command instead could double-commit a calibration, so
    /// it never happens. Every other non-success status fails immediately.
    pub(super) fn execute(&mut self, command: &Command) -> Result<Value, DriverError<E>> {
        let encoded = command.format_into()?;
        let kind = command.response_kind();
        let needed = command.response_len();
        let settle = command.settle_delay();

        self.write_command(encoded.as_bytes())?;

        let mut buf = [0u8; MAX_RESPONSE_LEN];
        let mut retries_left = self.config.max_not_ready_retries;
        loop {
            self.read_response(&mut buf, needed, settle)?;
            match response::decode(kind, &buf[..needed]) {
                Err(ProtocolError::NotReady) if retries_left > 0 => {
                    retries_left -= 1;
                }
                Ok(value) => return Ok(value),
                Err(e) => return Err(e.into()),
            }
        }
    }
}
