//! Typed configuration for calibration runs.
//!
//! Every field carries a default, so an empty file (or no file at all)
//! yields the same settings as [`CalibrationConfig::default`].

use crate::validate::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How numeric label values are interpreted.
///
/// Both policies partition labels as `value > 0` (target) versus
/// `value <= 0` (non-target). They differ only in what they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Any finite value is accepted.
    #[default]
    Permissive,
    /// Only `{0, 1}` or `{-1, 1}` encodings are accepted, never mixed.
    Strict,
}

impl std::str::FromStr for LabelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" | "lenient" => Ok(LabelPolicy::Permissive),
            "strict" => Ok(LabelPolicy::Strict),
            _ => Err(format!("unknown label policy: {}", s)),
        }
    }
}

impl std::fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelPolicy::Permissive => write!(f, "permissive"),
            LabelPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Quasi-Newton optimizer settings.
///
/// Defaults follow the classic L-BFGS-B defaults (m=10, pgtol=1e-5,
/// factr=1e7, maxiter=maxfun=15000).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSection {
    /// Number of correction pairs kept in memory.
    pub memory: usize,
    /// Maximum quasi-Newton iterations.
    pub max_iterations: usize,
    /// Maximum objective/gradient evaluations.
    pub max_evaluations: usize,
    /// Stop when the gradient infinity norm falls to this value.
    pub gradient_tolerance: f64,
    /// Stop when (f_k - f_{k+1}) / max(|f_k|, |f_{k+1}|, 1) falls to this value.
    pub relative_reduction_tolerance: f64,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            memory: 10,
            max_iterations: 15_000,
            max_evaluations: 15_000,
            gradient_tolerance: 1e-5,
            relative_reduction_tolerance: 1e7 * f64::EPSILON,
        }
    }
}

/// DCF evaluation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSection {
    /// Target prior used to derive beta and the Bayes threshold.
    pub p_target: f64,
}

impl Default for EvaluationSection {
    fn default() -> Self {
        Self { p_target: 0.01 }
    }
}

/// Label handling settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSection {
    pub policy: LabelPolicy,
}

/// Synthetic score generation used by the demo command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSection {
    pub n_target: usize,
    pub n_nontarget: usize,
    pub target_mean: f64,
    pub nontarget_mean: f64,
    pub std_dev: f64,
    pub seed: u64,
}

impl Default for SyntheticSection {
    fn default() -> Self {
        Self {
            n_target: 1000,
            n_nontarget: 10_000,
            target_mean: 0.0,
            nontarget_mean: -3.0,
            std_dev: 1.0,
            seed: 42,
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub schema_version: String,
    pub optimizer: OptimizerSection,
    pub evaluation: EvaluationSection,
    pub labels: LabelSection,
    pub synthetic: SyntheticSection,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            optimizer: OptimizerSection::default(),
            evaluation: EvaluationSection::default(),
            labels: LabelSection::default(),
            synthetic: SyntheticSection::default(),
        }
    }
}

impl CalibrationConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ValidationError> {
        toml::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Render as TOML (used by `sc-core config show`).
    pub fn to_toml_string(&self) -> Result<String, ValidationError> {
        toml::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Cannot serialize config: {}", e)))
    }
}
