//! EZO response decoding.
//!
//! Every response begins with a status byte; only a successful status is
//! followed by usable payload bytes. The payload is ASCII, NUL-padded to the
//! length the host requested.

use super::command::ResponseKind;
use super::error::ProtocolError;

/// Device status codes (first byte of every response).
pub mod status {
    /// Command accepted but the result is not ready yet.
    pub const PENDING: u8 = 0;
    /// Command succeeded; payload (if any) follows.
    pub const SUCCESS: u8 = 1;
    /// The device could not parse the command.
    pub const SYNTAX_ERROR: u8 = 2;
    /// The device is still processing the previous command.
    pub const STILL_PROCESSING: u8 = 254;
    /// There is no pending data to return.
    pub const NO_DATA: u8 = 255;
}

/// A decoded response value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Acknowledgement with no payload.
    Ack,
    /// A pH reading.
    Ph(f64),
}

/// Classifies a status byte, mapping every non-success code to its error.
pub fn check_status(status: u8) -> Result<(), ProtocolError> {
    match status {
        status::SUCCESS => Ok(()),
        status::PENDING | status::STILL_PROCESSING => Err(ProtocolError::NotReady),
        status::SYNTAX_ERROR => Err(ProtocolError::Syntax),
        status::NO_DATA => Err(ProtocolError::NoData),
        other => Err(ProtocolError::UnknownStatus(other)),
    }
}

/// Strips the NUL padding the device appends after the payload.
pub fn trim_payload(payload: &[u8]) -> &[u8] {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    &payload[..end]
}

/// Decodes a raw response (status byte plus payload) against the shape the
/// issuing command expects.
pub fn decode(kind: ResponseKind, raw: &[u8]) -> Result<Value, ProtocolError> {
    let (&status, payload) = raw.split_first().ok_or(ProtocolError::Malformed)?;
    check_status(status)?;

    match kind {
        ResponseKind::Ack => Ok(Value::Ack),
        ResponseKind::Ph => parse_ph(trim_payload(payload)).map(Value::Ph),
    }
}

/// Parses a NUL-trimmed ASCII payload as a pH value.
pub fn parse_ph(payload: &[u8]) -> Result<f64, ProtocolError> {
    let text = core::str::from_utf8(payload).map_err(|_| ProtocolError::Malformed)?;
    text.parse::<f64>().map_err(|_| ProtocolError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ph_success() {
        let raw = [status::SUCCESS, b'7', b'.', b'0', b'2'];
        assert_eq!(decode(ResponseKind::Ph, &raw), Ok(Value::Ph(7.02)));
    }

    #[test]
    fn test_decode_ph_trims_nul_padding() {
        let raw = [status::SUCCESS, b'9', b'.', b'5', b'6', b'0', 0, 0, 0];
        assert_eq!(decode(ResponseKind::Ph, &raw), Ok(Value::Ph(9.56)));
    }

    #[test]
    fn test_decode_ack() {
        assert_eq!(decode(ResponseKind::Ack, &[status::SUCCESS, 0]), Ok(Value::Ack));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(check_status(status::SUCCESS), Ok(()));
        assert_eq!(check_status(status::PENDING), Err(ProtocolError::NotReady));
        assert_eq!(
            check_status(status::STILL_PROCESSING),
            Err(ProtocolError::NotReady)
        );
        assert_eq!(check_status(status::SYNTAX_ERROR), Err(ProtocolError::Syntax));
        assert_eq!(check_status(status::NO_DATA), Err(ProtocolError::NoData));
        assert_eq!(check_status(7), Err(ProtocolError::UnknownStatus(7)));
    }

    #[test]
    fn test_error_statuses_propagate_through_decode() {
        let raw = [status::SYNTAX_ERROR, 0, 0];
        assert_eq!(decode(ResponseKind::Ack, &raw), Err(ProtocolError::Syntax));

        let raw = [status::NO_DATA];
        assert_eq!(decode(ResponseKind::Ph, &raw), Err(ProtocolError::NoData));
    }

    #[test]
    fn test_malformed_payloads() {
        // Empty response.
        assert_eq!(decode(ResponseKind::Ph, &[]), Err(ProtocolError::Malformed));
        // Success status but nothing where the reading should be.
        assert_eq!(
            decode(ResponseKind::Ph, &[status::SUCCESS, 0, 0]),
            Err(ProtocolError::Malformed)
        );
        // Non-UTF8 payload.
        assert_eq!(
            decode(ResponseKind::Ph, &[status::SUCCESS, 0xFE, 0xFF]),
            Err(ProtocolError::Malformed)
        );
        // Not a number.
        assert_eq!(
            decode(ResponseKind::Ph, &[status::SUCCESS, b'p', b'H']),
            Err(ProtocolError::Malformed)
        );
    }

    #[test]
    fn test_negative_reading_parses() {
        let raw = [status::SUCCESS, b'-', b'0', b'.', b'1', b'2', 0];
        assert_eq!(decode(ResponseKind::Ph, &raw), Ok(Value::Ph(-0.12)));
    }
}
