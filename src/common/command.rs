//! EZO pH command definitions.
//!
//! Wire forms follow the Atlas Scientific EZO pH datasheet. The command set
//! is fixed and case-sensitive on the wire; reproducing it byte-exact is
//! required for hardware compatibility.

use core::fmt;
use core::time::Duration;

use arrayvec::ArrayString;

use super::timing;

/// Largest command string the device command buffer accepts.
pub const MAX_COMMAND_LEN: usize = 32;

/// Largest response the device produces, including the leading status byte.
pub const MAX_RESPONSE_LEN: usize = 32;

/// Reference temperature the device assumes when no compensation value has
/// been supplied, in degrees Celsius.
pub const DEFAULT_TEMPERATURE_C: f64 = 25.0;

/// Response shape a command produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Status byte only.
    Ack,
    /// Status byte followed by an ASCII pH value.
    Ph,
}

/// Represents one command of the EZO pH wire command set.
///
/// The `Display` implementation generates the exact wire string (e.g. `R`,
/// `RT,18.3`, `Cal,mid,7`). Numeric arguments are rendered with Rust's
/// shortest-roundtrip float formatting, which the device's ASCII decimal
/// parser accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Single reading (`R`), compensated at the device's stored reference
    /// temperature.
    Read,

    /// Single reading compensated at the given temperature (`RT,<temp>`).
    /// Compensation happens on-device; the temperature is in degrees Celsius.
    ReadAtTemperature { temp_c: f64 },

    /// Midpoint calibration (`Cal,mid,<pH>`). Committing a midpoint erases
    /// any previously stored low and high points on the device.
    CalibrateMid { ph: f64 },

    /// Lowpoint calibration (`Cal,low,<pH>`).
    CalibrateLow { ph: f64 },

    /// Highpoint calibration (`Cal,high,<pH>`).
    CalibrateHigh { ph: f64 },

    /// Restore the factory calibration curve (`Cal,clear`).
    ClearCalibration,

    /// Enable or disable the I2C protocol lock (`Plock,<0|1>`).
    ProtocolLock { enabled: bool },
}

/// Error producing the wire form of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandFormatError {
    /// A numeric argument was NaN or infinite.
    #[error("numeric command argument is not a finite value")]
    NonFinite,
    /// The rendered command would exceed the device command buffer.
    #[error("encoded command exceeds the device command buffer")]
    TooLong,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Read => f.write_str("R"),
            Command::ReadAtTemperature { temp_c } => {
                if !temp_c.is_finite() {
                    return Err(fmt::Error);
                }
                write!(f, "RT,{}", temp_c)
            }
            Command::CalibrateMid { ph } => {
                if !ph.is_finite() {
                    return Err(fmt::Error);
                }
                write!(f, "Cal,mid,{}", ph)
            }
            Command::CalibrateLow { ph } => {
                if !ph.is_finite() {
                    return Err(fmt::Error);
                }
                write!(f, "Cal,low,{}", ph)
            }
            Command::CalibrateHigh { ph } => {
                if !ph.is_finite() {
                    return Err(fmt::Error);
                }
                write!(f, "Cal,high,{}", ph)
            }
            Command::ClearCalibration => f.write_str("Cal,clear"),
            Command::ProtocolLock { enabled } => {
                write!(f, "Plock,{}", if *enabled { 1 } else { 0 })
            }
        }
    }
}

impl Command {
    /// Renders the wire form into a fixed-capacity buffer.
    pub fn format_into(&self) -> Result<ArrayString<MAX_COMMAND_LEN>, CommandFormatError> {
        use fmt::Write;

        if let Some(arg) = self.numeric_arg() {
            if !arg.is_finite() {
                return Err(CommandFormatError::NonFinite);
            }
        }

        let mut buf = ArrayString::new();
        write!(buf, "{}", self).map_err(|_| CommandFormatError::TooLong)?;
        Ok(buf)
    }

    /// The numeric argument carried by this command, if any.
    fn numeric_arg(&self) -> Option<f64> {
        match self {
            Command::ReadAtTemperature { temp_c } => Some(*temp_c),
            Command::CalibrateMid { ph }
            | Command::CalibrateLow { ph }
            | Command::CalibrateHigh { ph } => Some(*ph),
            Command::Read | Command::ClearCalibration | Command::ProtocolLock { .. } => None,
        }
    }

    /// Minimum wait between writing this command and reading its response.
    pub fn settle_delay(&self) -> Duration {
        match self {
            Command::Read | Command::ReadAtTemperature { .. } => timing::READ_SETTLE,
            Command::CalibrateMid { .. }
            | Command::CalibrateLow { .. }
            | Command::CalibrateHigh { .. }
            | Command::ClearCalibration => timing::CALIBRATION_SETTLE,
            Command::ProtocolLock { .. } => timing::PLOCK_SETTLE,
        }
    }

    /// The response shape this command produces.
    pub fn response_kind(&self) -> ResponseKind {
        match self {
            Command::Read | Command::ReadAtTemperature { .. } => ResponseKind::Ph,
            Command::CalibrateMid { .. }
            | Command::CalibrateLow { .. }
            | Command::CalibrateHigh { .. }
            | Command::ClearCalibration
            | Command::ProtocolLock { .. } => ResponseKind::Ack,
        }
    }

    /// How many bytes to request when reading this command's response.
    pub fn response_len(&self) -> usize {
        match self.response_kind() {
            // Status byte plus NUL padding; one spare byte keeps the read
            // shape uniform across firmware revisions that echo a reason.
            ResponseKind::Ack => 2,
            ResponseKind::Ph => MAX_RESPONSE_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use std::string::ToString;

    #[test]
    fn test_command_formatting() {
        assert_eq!(Command::Read.to_string(), "R");
        assert_eq!(
            Command::ReadAtTemperature { temp_c: 18.3 }.to_string(),
            "RT,18.3"
        );
        assert_eq!(
            Command::ReadAtTemperature { temp_c: 25.0 }.to_string(),
            "RT,25"
        );
        assert_eq!(Command::CalibrateMid { ph: 7.0 }.to_string(), "Cal,mid,7");
        assert_eq!(Command::CalibrateMid { ph: 7.01 }.to_string(), "Cal,mid,7.01");
        assert_eq!(Command::CalibrateLow { ph: 4.0 }.to_string(), "Cal,low,4");
        assert_eq!(
            Command::CalibrateHigh { ph: 10.25 }.to_string(),
            "Cal,high,10.25"
        );
        assert_eq!(Command::ClearCalibration.to_string(), "Cal,clear");
        assert_eq!(Command::ProtocolLock { enabled: true }.to_string(), "Plock,1");
        assert_eq!(Command::ProtocolLock { enabled: false }.to_string(), "Plock,0");
    }

    #[test]
    fn test_read_encoding_tracks_temperature_presence() {
        // The encoded command must match the presence/absence of the
        // temperature argument.
        assert_eq!(Command::Read.format_into().unwrap().as_str(), "R");
        for temp_c in [-5.0, 0.0, 18.3, 25.0, 99.9] {
            let encoded = Command::ReadAtTemperature { temp_c }.format_into().unwrap();
            assert!(encoded.starts_with("RT,"), "got {:?}", encoded);
        }
    }

    #[test]
    fn test_non_finite_arguments_rejected() {
        let cmd = Command::ReadAtTemperature { temp_c: f64::NAN };
        assert_eq!(cmd.format_into(), Err(CommandFormatError::NonFinite));

        let cmd = Command::CalibrateMid { ph: f64::INFINITY };
        assert_eq!(cmd.format_into(), Err(CommandFormatError::NonFinite));

        // Display refuses to render a non-finite argument at all.
        let mut out = ArrayString::<MAX_COMMAND_LEN>::new();
        assert!(write!(out, "{}", Command::CalibrateLow { ph: f64::NAN }).is_err());
    }

    #[test]
    fn test_settle_delays() {
        // Calibration commands write flash and settle longest.
        assert!(
            Command::CalibrateMid { ph: 7.0 }.settle_delay() > Command::Read.settle_delay()
        );
        assert_eq!(
            Command::ClearCalibration.settle_delay(),
            Command::CalibrateLow { ph: 4.0 }.settle_delay()
        );
        assert_eq!(
            Command::Read.settle_delay(),
            Command::ReadAtTemperature { temp_c: 20.0 }.settle_delay()
        );
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(Command::Read.response_kind(), ResponseKind::Ph);
        assert_eq!(
            Command::ReadAtTemperature { temp_c: 20.0 }.response_kind(),
            ResponseKind::Ph
        );
        assert_eq!(Command::CalibrateMid { ph: 7.0 }.response_kind(), ResponseKind::Ack);
        assert_eq!(Command::ClearCalibration.response_kind(), ResponseKind::Ack);
        assert_eq!(
            Command::ProtocolLock { enabled: true }.response_kind(),
            ResponseKind::Ack
        );

        assert_eq!(Command::Read.response_len(), MAX_RESPONSE_LEN);
        assert!(Command::ProtocolLock { enabled: false }.response_len() < MAX_RESPONSE_LEN);
    }
}
