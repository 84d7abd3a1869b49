// src/common/timing.rs

use core::time::Duration;

// Settle delays: the minimum wait after writing a command before the
// response is guaranteed to be available for reading. Reading earlier
// returns a pending status, which the transaction layer re-reads a bounded
// number of times with the same delay.

/// Settle delay for measurement commands (`R`, `RT,<t>`).
pub const READ_SETTLE: Duration = Duration::from_millis(300);

/// Settle delay for calibration commands (`Cal,mid`/`Cal,low`/`Cal,high`/
/// `Cal,clear`). These commit calibration data to on-device flash and take
/// the longest to complete.
pub const CALIBRATION_SETTLE: Duration = Duration::from_millis(900);

/// Settle delay for the protocol lock command (`Plock,<0|1>`).
pub const PLOCK_SETTLE: Duration = Duration::from_millis(300);
