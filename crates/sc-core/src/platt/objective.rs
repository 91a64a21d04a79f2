//! Logistic loss for the two-parameter calibration fit.
//!
//! For parameters `(A, B)`, scores `s`, smoothed targets `T` and prior
//! log-odds `a`:
//!
//! ```text
//! z_i = A·s_i + B + a
//! P_i = sigmoid(z_i)
//! L   = −Σ [ T_i·ln P_i + (1 − T_i)·ln(1 − P_i) ]
//! ∇L  = Σ (P_i − T_i) · (s_i, 1)
//! ```
//!
//! `ln P_i` and `ln(1 − P_i)` are taken as `log_sigmoid(±z_i)`, so the loss
//! stays finite when `P_i` rounds to 0 or 1.

use super::targets::SmoothedTargets;
use crate::optimize::Objective;
use sc_math::{log_sigmoid, sigmoid, x_times_log};

/// Negative Bernoulli log-likelihood of the smoothed targets.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationObjective<'a> {
    scores: &'a [f64],
    targets: &'a [f64],
    prior_log_odds: f64,
}

impl<'a> CalibrationObjective<'a> {
    /// `scores` and `targets.targets` must have equal length.
    pub fn new(scores: &'a [f64], targets: &'a SmoothedTargets) -> Self {
        debug_assert_eq!(scores.len(), targets.targets.len());
        Self {
            scores,
            targets: &targets.targets,
            prior_log_odds: targets.prior_log_odds,
        }
    }

    #[inline]
    fn linear_predictor(&self, ab: &[f64], score: f64) -> f64 {
        ab[0] * score + ab[1] + self.prior_log_odds
    }

    #[inline]
    fn sample_loss(z: f64, t: f64) -> f64 {
        -(x_times_log(t, log_sigmoid(z)) + x_times_log(1.0 - t, log_sigmoid(-z)))
    }
}

impl Objective for CalibrationObjective<'_> {
    fn dimension(&self) -> usize {
        2
    }

    fn value(&self, ab: &[f64]) -> f64 {
        self.scores
            .iter()
            .zip(self.targets)
            .map(|(&s, &t)| Self::sample_loss(self.linear_predictor(ab, s), t))
            .sum()
    }

    fn gradient(&self, ab: &[f64], grad: &mut [f64]) {
        let mut d_a = 0.0;
        let mut d_b = 0.0;
        for (&s, &t) in self.scores.iter().zip(self.targets) {
            let error = sigmoid(self.linear_predictor(ab, s)) - t;
            d_a += error * s;
            d_b += error;
        }
        grad[0] = d_a;
        grad[1] = d_b;
    }

    fn value_and_gradient(&self, ab: &[f64], grad: &mut [f64]) -> f64 {
        let mut loss = 0.0;
        let mut d_a = 0.0;
        let mut d_b = 0.0;
        for (&s, &t) in self.scores.iter().zip(self.targets) {
            let z = self.linear_predictor(ab, s);
            loss += Self::sample_loss(z, t);
            let error = sigmoid(z) - t;
            d_a += error * s;
            d_b += error;
        }
        grad[0] = d_a;
        grad[1] = d_b;
        loss
    }
}
