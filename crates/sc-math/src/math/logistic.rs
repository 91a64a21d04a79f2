//! Logistic link helpers.
//!
//! The logistic (sigmoid) function maps log-odds to probabilities:
//! `sigmoid(z) = 1 / (1 + exp(-z))`.
//! The log-domain variants never evaluate `ln(0)`, so cross-entropy terms
//! stay finite even when the probability saturates in floating point.

use super::stable::softplus;

/// Logistic sigmoid, stable for large |z|.
pub fn sigmoid(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// ln(sigmoid(z)) = -softplus(-z).
///
/// Finite for every finite z, including values where `sigmoid(z)` rounds to 0.
pub fn log_sigmoid(z: f64) -> f64 {
    -softplus(-z)
}
