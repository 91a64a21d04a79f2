//! Platt scaling: affine score calibration by logistic regression.
//!
//! Fits `(A, B)` so that `A·s + B` behaves like a log-likelihood ratio:
//! the posterior of the target class is `sigmoid(A·s + B + a)` where `a` is
//! the prior log-odds of the training data. The targets are smoothed with
//! Bayesian priors (see [`targets`]) and the loss is minimized with an
//! injectable quasi-Newton [`Minimizer`].
//!
//! # Usage
//!
//! ```
//! use sc_core::{apply_calibration, fit_calibration, Labels, OptimizerSettings};
//!
//! let scores = [2.0, 1.5, 0.2, -0.4, -1.0, -2.2];
//! let labels = Labels::from(vec![true, true, false, true, false, false]);
//! let fit = fit_calibration(&scores, &labels, &OptimizerSettings::default()).unwrap();
//! assert!(fit.converged);
//! let calibrated = apply_calibration(&scores, fit.model.slope, fit.model.intercept);
//! assert_eq!(calibrated.len(), scores.len());
//! ```
//!
//! References: J. Platt, "Probabilistic outputs for support vector machines
//! and comparisons to regularized likelihood methods", 1999.

pub mod objective;
pub mod targets;

pub use objective::CalibrationObjective;
pub use targets::SmoothedTargets;

use crate::error::{check_scores, CalibrationError, Result};
use crate::labels::Labels;
use crate::optimize::{Lbfgs, Minimizer, OptimizeError, OptimizerSettings, Termination};
use sc_math::sigmoid;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Fitted affine calibration `calibrated = slope · raw + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattModel {
    pub slope: f64,
    pub intercept: f64,
}

/// Whether a fitted model preserves score order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitQuality {
    /// Slope > 0: calibration preserves score order.
    Monotonic,
    /// Slope <= 0: scores carry no usable separation, or the fit failed.
    Degenerate,
}

impl std::fmt::Display for FitQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitQuality::Monotonic => write!(f, "monotonic"),
            FitQuality::Degenerate => write!(f, "degenerate"),
        }
    }
}

impl PlattModel {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Calibrate one score.
    #[inline]
    pub fn calibrate(&self, score: f64) -> f64 {
        self.slope * score + self.intercept
    }

    /// Calibrate every score.
    pub fn apply(&self, scores: &[f64]) -> Vec<f64> {
        scores.iter().map(|&s| self.calibrate(s)).collect()
    }

    /// Posterior target probability for `score` under the given prior log-odds.
    pub fn probability(&self, score: f64, prior_log_odds: f64) -> f64 {
        sigmoid(self.calibrate(score) + prior_log_odds)
    }

    pub fn is_monotonic(&self) -> bool {
        self.slope > 0.0
    }

    pub fn quality(&self) -> FitQuality {
        if self.is_monotonic() {
            FitQuality::Monotonic
        } else {
            FitQuality::Degenerate
        }
    }
}

/// Apply `A·s + B` elementwise.
pub fn apply_calibration(scores: &[f64], slope: f64, intercept: f64) -> Vec<f64> {
    PlattModel::new(slope, intercept).apply(scores)
}

/// Outcome of a calibration fit.
///
/// A fit that ran out of optimizer budget is still returned, with
/// `converged == false`; use [`PlattFit::ensure_converged`] to turn that
/// into an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlattFit {
    pub model: PlattModel,
    /// Final objective value.
    pub loss: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// Gradient infinity norm at the returned parameters.
    pub gradient_norm: f64,
    pub termination: Termination,
    pub converged: bool,
    pub initial_guess: [f64; 2],
    pub targets: SmoothedTargets,
}

impl PlattFit {
    pub fn quality(&self) -> FitQuality {
        self.model.quality()
    }

    /// Return the fit if the optimizer converged, else a convergence error.
    pub fn ensure_converged(self) -> Result<Self> {
        if self.converged {
            return Ok(self);
        }
        Err(CalibrationError::NotConverged {
            slope: self.model.slope,
            intercept: self.model.intercept,
            iterations: self.iterations,
            gradient_norm: self.gradient_norm,
            termination: self.termination,
        })
    }
}

/// Fit Platt calibration with the default L-BFGS minimizer.
pub fn fit_calibration(
    scores: &[f64],
    labels: &Labels,
    settings: &OptimizerSettings,
) -> Result<PlattFit> {
    fit_calibration_with(scores, labels, &Lbfgs::new(settings.clone()))
}

/// Fit Platt calibration with a caller-supplied minimizer.
///
/// Fails with a domain error for empty, mismatched or non-finite input and
/// for single-class labels.
pub fn fit_calibration_with(
    scores: &[f64],
    labels: &Labels,
    minimizer: &dyn Minimizer,
) -> Result<PlattFit> {
    check_scores(scores, labels.len())?;
    let targets = SmoothedTargets::from_labels(labels)?;
    let initial_guess = targets.initial_guess();

    debug!(
        n = scores.len(),
        targets = targets.prior1,
        nontargets = targets.prior0,
        prior_log_odds = targets.prior_log_odds,
        b0 = initial_guess[1],
        "fitting platt calibration"
    );

    let objective = CalibrationObjective::new(scores, &targets);
    let minimum = minimizer.minimize(&objective, &initial_guess)?;
    if minimum.x.len() != 2 {
        return Err(OptimizeError::DimensionMismatch {
            expected: 2,
            actual: minimum.x.len(),
        }
        .into());
    }

    let model = PlattModel::new(minimum.x[0], minimum.x[1]);
    let converged = minimum.converged();

    if converged {
        info!(
            slope = model.slope,
            intercept = model.intercept,
            loss = minimum.value,
            iterations = minimum.iterations,
            "platt calibration fitted"
        );
    } else {
        warn!(
            slope = model.slope,
            intercept = model.intercept,
            iterations = minimum.iterations,
            gradient_norm = minimum.gradient_norm,
            termination = %minimum.termination,
            "platt calibration did not converge"
        );
    }
    if !model.is_monotonic() {
        warn!(
            slope = model.slope,
            "calibration slope is not positive; scores do not separate the classes"
        );
    }

    Ok(PlattFit {
        model,
        loss: minimum.value,
        iterations: minimum.iterations,
        evaluations: minimum.evaluations,
        gradient_norm: minimum.gradient_norm,
        termination: minimum.termination,
        converged,
        initial_guess,
        targets,
    })
}
