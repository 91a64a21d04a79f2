//! Exit codes for the `sc-core` CLI.
//!
//! Exit code ranges:
//! - 0-2: fit outcomes (parse outcome from code, not output)
//! - 10-19: user/input errors (fixable by the caller)
//! - 20-29: internal errors (bugs, should be reported)

use crate::error::CalibrationError;

/// Exit codes for calibration runs.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Fit outcomes (0-2)
    // ========================================================================
    /// Fit converged with a positive slope, or nothing to fit.
    Clean = 0,

    /// Optimizer stopped on a budget or line-search failure.
    NotConverged = 1,

    /// Fitted slope is not positive; calibration reverses or flattens scores.
    DegenerateCalibration = 2,

    // ========================================================================
    // User / input errors (10-19)
    // ========================================================================
    /// Invalid arguments.
    ArgsError = 10,

    /// Unreadable input or data that cannot define a calibration.
    InputError = 11,

    /// Config file missing, malformed or out of range.
    ConfigError = 12,

    // ========================================================================
    // Internal errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report).
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes below 10 describe a completed run.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Stable name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::NotConverged => "OK_NOT_CONVERGED",
            ExitCode::DegenerateCalibration => "OK_DEGENERATE",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<&CalibrationError> for ExitCode {
    fn from(err: &CalibrationError) -> Self {
        if err.is_convergence_error() {
            ExitCode::NotConverged
        } else if err.is_domain_error() {
            ExitCode::InputError
        } else {
            ExitCode::InternalError
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
