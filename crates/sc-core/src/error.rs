//! Error types for score calibration.
//!
//! Three families of failure exist:
//! - **Domain errors**: the input cannot define the quantity asked for
//!   (single-class labels, empty or mismatched inputs, bad labels/scores).
//! - **Convergence errors**: the optimizer ran out of budget. The fit is
//!   still returned as a flagged [`PlattFit`](crate::platt::PlattFit); this
//!   variant is produced only when a caller asks for a converged fit.
//! - **Optimizer contract errors**: the objective was unusable at the start.
//!
//! Saturated probabilities are not an error: the objective is evaluated in
//! the log domain and never produces NaN for finite inputs.

use crate::optimize::{OptimizeError, Termination};
use thiserror::Error;

/// Result type alias for calibration operations.
pub type Result<T> = std::result::Result<T, CalibrationError>;

/// Errors raised by fitting and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("no samples provided")]
    Empty,

    #[error("length mismatch: {scores} scores but {labels} labels")]
    LengthMismatch { scores: usize, labels: usize },

    #[error("non-finite score {value} at index {index}")]
    NonFiniteScore { index: usize, value: f64 },

    #[error("invalid label {value} at index {index}: {reason}")]
    InvalidLabel {
        index: usize,
        value: f64,
        reason: String,
    },

    #[error(
        "degenerate labels: {positives} target and {negatives} non-target samples; both classes are required"
    )]
    SingleClass { positives: usize, negatives: usize },

    #[error("invalid target prior {0}: must lie strictly inside (0, 1)")]
    InvalidTargetPrior(f64),

    #[error(
        "calibration did not converge ({termination}) after {iterations} iterations: \
         slope={slope}, intercept={intercept}, gradient norm={gradient_norm:e}"
    )]
    NotConverged {
        slope: f64,
        intercept: f64,
        iterations: usize,
        gradient_norm: f64,
        termination: Termination,
    },

    #[error("optimizer error: {0}")]
    Optimizer(#[from] OptimizeError),
}

impl CalibrationError {
    /// True for degenerate-input failures that no retry can fix.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            CalibrationError::Empty
                | CalibrationError::LengthMismatch { .. }
                | CalibrationError::NonFiniteScore { .. }
                | CalibrationError::InvalidLabel { .. }
                | CalibrationError::SingleClass { .. }
                | CalibrationError::InvalidTargetPrior(_)
        )
    }

    /// True when the optimizer exhausted its budget.
    pub fn is_convergence_error(&self) -> bool {
        matches!(self, CalibrationError::NotConverged { .. })
    }

    /// Stable numeric code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            CalibrationError::Empty => 30,
            CalibrationError::LengthMismatch { .. } => 31,
            CalibrationError::NonFiniteScore { .. } => 32,
            CalibrationError::InvalidLabel { .. } => 33,
            CalibrationError::SingleClass { .. } => 34,
            CalibrationError::InvalidTargetPrior(_) => 35,
            CalibrationError::NotConverged { .. } => 40,
            CalibrationError::Optimizer(_) => 41,
        }
    }
}

/// Check that scores and labels are non-empty, aligned and finite.
pub(crate) fn check_scores(scores: &[f64], n_labels: usize) -> Result<()> {
    if scores.is_empty() {
        return Err(CalibrationError::Empty);
    }
    if scores.len() != n_labels {
        return Err(CalibrationError::LengthMismatch {
            scores: scores.len(),
            labels: n_labels,
        });
    }
    if let Some((index, &value)) = scores.iter().enumerate().find(|(_, s)| !s.is_finite()) {
        return Err(CalibrationError::NonFiniteScore { index, value });
    }
    Ok(())
}
