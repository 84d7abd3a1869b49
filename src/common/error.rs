// src/common/error.rs

use core::fmt::Debug;

use embedded_hal::i2c::{Error as I2cError, ErrorKind};

use super::command::CommandFormatError;

/// Transport-level failure. Always fatal to the current transaction and
/// never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum BusError<E>
where
    E: Debug,
{
    /// The device did not acknowledge its address or a data byte.
    #[error("device unresponsive (no I2C acknowledge): {0:?}")]
    DeviceUnresponsive(E),

    /// The read would have cut the response short.
    #[error("truncated response: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    /// Any other transport failure reported by the HAL.
    #[error("I2C transport failure: {0:?}")]
    Io(E),
}

impl<E: I2cError> BusError<E> {
    /// Classifies a HAL error by its reported kind.
    pub fn from_i2c(e: E) -> Self {
        match e.kind() {
            ErrorKind::NoAcknowledge(_) => BusError::DeviceUnresponsive(e),
            _ => BusError::Io(e),
        }
    }
}

/// The device answered with something meaningful other than success.
///
/// `NotReady` is retryable up to a bounded attempt count (the read path
/// re-reads the response, it never re-writes the command); the others
/// propagate immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The device is still processing the command.
    #[error("device still processing the command")]
    NotReady,

    /// The device rejected the command string.
    #[error("device reported a syntax error")]
    Syntax,

    /// The device has no pending data to return.
    #[error("device has no data to return")]
    NoData,

    /// A status byte outside the documented set.
    #[error("unknown status byte {0:#04x}")]
    UnknownStatus(u8),

    /// The payload was not the ASCII the response shape requires.
    #[error("malformed response payload")]
    Malformed,
}

/// A calibration target pH outside the open interval (0, 14).
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("calibration target pH {ph} is outside the open interval (0, 14)")]
pub struct InvalidTarget {
    pub ph: f64,
}

/// Top-level driver failure surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum DriverError<E>
where
    E: Debug,
{
    /// Transport failure underneath the protocol.
    #[error("bus error: {0}")]
    Bus(#[from] BusError<E>),

    /// The device answered, but not with success.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The command could not be rendered to its wire form.
    #[error("command encoding failed: {0}")]
    Encode(#[from] CommandFormatError),

    /// The requested calibration target is out of range.
    #[error(transparent)]
    InvalidTarget(#[from] InvalidTarget),
}
