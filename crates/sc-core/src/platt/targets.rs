//! Prior-smoothed regression targets.
//!
//! Platt's method does not regress on hard 0/1 labels. Each class is
//! replaced by the posterior mean of a Beta(1, 1) prior updated with that
//! class's count (Laplace's rule of succession):
//! - target trials: `(N₊ + 1) / (N₊ + 2)`
//! - non-target trials: `1 / (N₋ + 2)`
//!
//! Both values lie strictly inside (0, 1), which bounds the achievable loss
//! and keeps the fit from becoming overconfident on separable data.

use crate::error::Result;
use crate::labels::Labels;
use serde::{Deserialize, Serialize};

/// Smoothed targets plus the class statistics they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedTargets {
    /// Count of non-target trials (N₋).
    pub prior0: usize,
    /// Count of target trials (N₊).
    pub prior1: usize,
    /// Empirical target prevalence π = N₊ / n.
    pub prevalence: f64,
    /// ln(π / (1 − π)), added inside the logistic link.
    pub prior_log_odds: f64,
    /// Target value assigned to target trials.
    pub hi_target: f64,
    /// Target value assigned to non-target trials.
    pub lo_target: f64,
    /// Per-trial targets, aligned with the labels.
    #[serde(skip)]
    pub targets: Vec<f64>,
}

impl SmoothedTargets {
    /// Build targets from labels.
    ///
    /// Fails with a domain error unless both classes are present.
    pub fn from_labels(labels: &Labels) -> Result<Self> {
        let (prior1, prior0) = labels.require_both_classes()?;
        let n = labels.len() as f64;
        let p1 = prior1 as f64;
        let p0 = prior0 as f64;

        let prevalence = p1 / n;
        let hi_target = (p1 + 1.0) / (p1 + 2.0);
        let lo_target = 1.0 / (p0 + 2.0);
        let targets = labels
            .iter()
            .map(|is_target| if is_target { hi_target } else { lo_target })
            .collect();

        Ok(Self {
            prior0,
            prior1,
            prevalence,
            // ln(π / (1 − π)) = ln(N₊ / N₋), without the intermediate ratio.
            prior_log_odds: p1.ln() - p0.ln(),
            hi_target,
            lo_target,
            targets,
        })
    }

    /// Starting point for the optimizer: zero slope, smoothed log-odds intercept.
    ///
    /// `B₀ = ln((N₋ + 1) / (N₊ + 1))`.
    pub fn initial_guess(&self) -> [f64; 2] {
        let p0 = self.prior0 as f64;
        let p1 = self.prior1 as f64;
        [0.0, (p0 + 1.0).ln() - (p1 + 1.0).ln()]
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
