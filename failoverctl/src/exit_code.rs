//! Process exit codes.
//!
//! Check mode keeps three classes apart: on duty (`0`), standby (`3`) and
//! "could not determine" (`100..=255`). Interactive failures use `1`, flag
//! misuse `2`.

use failover_core::{DutyStatus, FailoverError};

/// Success, or "this machine is active" in check mode
pub const SUCCESS: u8 = 0;

/// Generic failure: configuration, transport or API error outside check mode
pub const FAILURE: u8 = 1;

/// Contradictory or incomplete flags
pub const USAGE: u8 = 2;

/// Check mode: another server is active
pub const STANDBY: u8 = 3;

/// Lowest code of the check-mode failure band
pub const REMOTE_MIN: u8 = 100;

/// Highest code of the check-mode failure band
pub const REMOTE_MAX: u8 = 255;

/// Exit code for a duty check result
pub fn for_duty(status: DutyStatus) -> u8 {
    match status {
        DutyStatus::OnDuty => SUCCESS,
        DutyStatus::Standby => STANDBY,
    }
}

/// Exit code for a failed duty check.
///
/// An HTTP status `s` maps to `s - 300`, clamped into the failure band;
/// failures without a status map to [`REMOTE_MIN`].
pub fn for_remote_error(err: &FailoverError) -> u8 {
    match err.http_status() {
        Some(status) => {
            let code = i32::from(status) - 300;
            code.clamp(i32::from(REMOTE_MIN), i32::from(REMOTE_MAX)) as u8
        }
        None => REMOTE_MIN,
    }
}

/// Same as [`for_remote_error`] for an error that went through `anyhow`
pub fn for_check_failure(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<FailoverError>()
        .map(for_remote_error)
        .unwrap_or(REMOTE_MIN)
}
