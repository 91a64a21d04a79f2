//! Detection cost function (DCF) evaluation.
//!
//! With unit miss/false-alarm costs and target prior `p`, the cost of an
//! operating point is `P_miss + β·P_fa` where `β = (1 − p) / p`. For scores
//! that are true log-likelihood ratios the Bayes decision threshold is
//! `θ = ln β`.
//!
//! - **minDCF**: the lowest cost over every threshold (chosen in hindsight).
//! - **actDCF**: the cost at the fixed threshold θ.
//!
//! The gap between the two measures calibration: well-calibrated scores
//! make θ (nearly) the best threshold.

pub mod det;

pub use det::{det_curve, DetCurve};

use crate::error::{check_scores, CalibrationError, Result};
use crate::labels::Labels;
use serde::{Deserialize, Serialize};

/// Cost weighting derived from a target prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub p_target: f64,
    /// (1 − p_target) / p_target.
    pub beta: f64,
    /// ln(beta), the Bayes threshold for log-likelihood-ratio scores.
    pub theta: f64,
}

impl OperatingPoint {
    pub fn from_p_target(p_target: f64) -> Result<Self> {
        if !(p_target > 0.0 && p_target < 1.0) {
            return Err(CalibrationError::InvalidTargetPrior(p_target));
        }
        let beta = (1.0 - p_target) / p_target;
        Ok(Self {
            p_target,
            beta,
            theta: beta.ln(),
        })
    }
}

/// Minimum and actual DCF for one score set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfSummary {
    pub min_dcf: f64,
    pub act_dcf: f64,
    /// act_dcf − min_dcf (never negative).
    pub calibration_gap: f64,
    pub operating_point: OperatingPoint,
}

/// min over the curve of `fnr + β·fpr`, for an externally supplied DET curve.
pub fn min_dcf_from_curve(curve: &DetCurve, beta: f64) -> Result<f64> {
    if curve.is_empty() {
        return Err(CalibrationError::Empty);
    }
    Ok(curve
        .fnr
        .iter()
        .zip(&curve.fpr)
        .map(|(fnr, fpr)| fnr + beta * fpr)
        .fold(f64::INFINITY, f64::min))
}

/// Minimum DCF over the full threshold sweep.
pub fn compute_min_dcf(labels: &Labels, scores: &[f64], beta: f64) -> Result<f64> {
    let curve = det_curve(labels, scores)?;
    min_dcf_from_curve(&curve, beta)
}

/// Actual DCF with decisions `score > theta`.
///
/// Fails with a domain error when either class is absent (miss or
/// false-alarm rate would be 0/0).
pub fn compute_actual_dcf(labels: &Labels, scores: &[f64], theta: f64, beta: f64) -> Result<f64> {
    check_scores(scores, labels.len())?;
    let (positives, negatives) = labels.require_both_classes()?;

    let mut tp = 0usize;
    let mut fp = 0usize;
    for (&score, is_target) in scores.iter().zip(labels.iter()) {
        if score > theta {
            if is_target {
                tp += 1;
            } else {
                fp += 1;
            }
        }
    }

    let miss = (positives - tp) as f64 / positives as f64;
    let fa = fp as f64 / negatives as f64;
    Ok(miss + beta * fa)
}

/// Compute both metrics at one operating point.
pub fn evaluate(labels: &Labels, scores: &[f64], point: &OperatingPoint) -> Result<DcfSummary> {
    let min_dcf = compute_min_dcf(labels, scores, point.beta)?;
    let act_dcf = compute_actual_dcf(labels, scores, point.theta, point.beta)?;
    Ok(DcfSummary {
        min_dcf,
        act_dcf,
        calibration_gap: (act_dcf - min_dcf).max(0.0),
        operating_point: *point,
    })
}
