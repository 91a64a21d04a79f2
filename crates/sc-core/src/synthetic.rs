//! Synthetic detector scores for demos, tests and benchmarks.
//!
//! Target and non-target scores are drawn from two Gaussians with a shared
//! spread. With equal spreads the true log-likelihood ratio is affine in the
//! score, so a correct Platt fit recovers it:
//!
//! ```text
//! llr(s) = (μ₊ − μ₋)/σ² · s − (μ₊² − μ₋²)/(2σ²)
//! ```

use crate::labels::Labels;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use sc_config::SyntheticSection;
use thiserror::Error;

/// Errors from synthetic generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntheticError {
    #[error("invalid score distribution: mean={mean}, std_dev={std_dev}")]
    InvalidDistribution { mean: f64, std_dev: f64 },

    #[error("both classes need at least one trial (targets={n_target}, non-targets={n_nontarget})")]
    EmptyClass { n_target: usize, n_nontarget: usize },
}

/// Labeled synthetic trials: targets first, then non-targets.
#[derive(Debug, Clone)]
pub struct SyntheticTrials {
    pub scores: Vec<f64>,
    pub labels: Labels,
}

impl SyntheticTrials {
    /// The exact LLR for these class distributions, as (slope, intercept).
    pub fn true_llr(section: &SyntheticSection) -> (f64, f64) {
        let var = section.std_dev * section.std_dev;
        let slope = (section.target_mean - section.nontarget_mean) / var;
        let intercept = -(section.target_mean.powi(2) - section.nontarget_mean.powi(2)) / (2.0 * var);
        (slope, intercept)
    }
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>, SyntheticError> {
    Normal::new(mean, std_dev).map_err(|_| SyntheticError::InvalidDistribution { mean, std_dev })
}

/// Draw target and non-target scores with a seeded RNG.
pub fn generate(section: &SyntheticSection) -> Result<SyntheticTrials, SyntheticError> {
    if section.n_target == 0 || section.n_nontarget == 0 {
        return Err(SyntheticError::EmptyClass {
            n_target: section.n_target,
            n_nontarget: section.n_nontarget,
        });
    }
    if !(section.std_dev.is_finite() && section.std_dev > 0.0) {
        return Err(SyntheticError::InvalidDistribution {
            mean: section.target_mean,
            std_dev: section.std_dev,
        });
    }
    let target = normal(section.target_mean, section.std_dev)?;
    let nontarget = normal(section.nontarget_mean, section.std_dev)?;

    let mut rng = StdRng::seed_from_u64(section.seed);
    let total = section.n_target + section.n_nontarget;
    let mut scores = Vec::with_capacity(total);
    scores.extend((0..section.n_target).map(|_| target.sample(&mut rng)));
    scores.extend((0..section.n_nontarget).map(|_| nontarget.sample(&mut rng)));

    let labels = (0..total).map(|i| i < section.n_target).collect();

    Ok(SyntheticTrials { scores, labels })
}
