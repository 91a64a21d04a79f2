//! Unconstrained gradient-based minimization.
//!
//! The calibration fit only needs "minimize f given f and ∇f from a starting
//! point". That capability is the [`Minimizer`] trait; [`Lbfgs`] is the
//! implementation used by default. Anything that satisfies the trait (plain
//! gradient descent with a line search, a wrapper around another library)
//! can be injected through [`crate::platt::fit_calibration_with`].

pub mod lbfgs;

pub use lbfgs::Lbfgs;

use sc_config::OptimizerSection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A differentiable scalar objective over ℝⁿ.
///
/// Implementations must be pure: `value(x)` and `gradient(x)` depend only on
/// `x` and immutable data captured by the objective.
pub trait Objective {
    /// Number of parameters.
    fn dimension(&self) -> usize;

    /// Objective value at `x`.
    fn value(&self, x: &[f64]) -> f64;

    /// Gradient at `x`, written into `grad` (length `dimension()`).
    fn gradient(&self, x: &[f64], grad: &mut [f64]);

    /// Value and gradient in one pass.
    ///
    /// The default calls [`Objective::value`] then [`Objective::gradient`];
    /// objectives that share work between the two should override it.
    fn value_and_gradient(&self, x: &[f64], grad: &mut [f64]) -> f64 {
        self.gradient(x, grad);
        self.value(x)
    }
}

/// Why the minimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Gradient infinity norm fell below `gradient_tolerance`.
    GradientTolerance,
    /// Relative objective reduction fell below `relative_reduction_tolerance`.
    RelativeReduction,
    /// Iteration budget exhausted.
    MaxIterations,
    /// Evaluation budget exhausted.
    MaxEvaluations,
    /// No step along the search direction decreased the objective.
    LineSearchFailed,
}

impl Termination {
    /// True for the stopping reasons that mean "converged".
    pub fn is_converged(self) -> bool {
        matches!(
            self,
            Termination::GradientTolerance | Termination::RelativeReduction
        )
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::GradientTolerance => write!(f, "gradient tolerance reached"),
            Termination::RelativeReduction => write!(f, "relative reduction tolerance reached"),
            Termination::MaxIterations => write!(f, "iteration limit reached"),
            Termination::MaxEvaluations => write!(f, "evaluation limit reached"),
            Termination::LineSearchFailed => write!(f, "line search failed"),
        }
    }
}

/// Best point found by a minimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    /// Infinity norm of the gradient at `x`.
    pub gradient_norm: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub termination: Termination,
}

impl Minimum {
    pub fn converged(&self) -> bool {
        self.termination.is_converged()
    }
}

/// Contract violations detected before any iteration runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("starting point has {actual} components, objective expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("starting point contains non-finite components")]
    NonFiniteStart,

    #[error("objective is not finite at the starting point (value={value})")]
    NonFiniteObjective { value: f64 },
}

/// Unconstrained minimizer capability.
pub trait Minimizer {
    /// Minimize `objective` starting from `x0`.
    ///
    /// Budget exhaustion is reported through [`Minimum::termination`], not as
    /// an error, so the best iterate is always available to the caller.
    fn minimize(&self, objective: &dyn Objective, x0: &[f64]) -> Result<Minimum, OptimizeError>;
}

/// Settings for [`Lbfgs`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub memory: usize,
    pub max_iterations: usize,
    pub max_evaluations: usize,
    pub gradient_tolerance: f64,
    pub relative_reduction_tolerance: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self::from(&OptimizerSection::default())
    }
}

impl From<&OptimizerSection> for OptimizerSettings {
    fn from(section: &OptimizerSection) -> Self {
        Self {
            memory: section.memory.max(1),
            max_iterations: section.max_iterations,
            max_evaluations: section.max_evaluations,
            gradient_tolerance: section.gradient_tolerance,
            relative_reduction_tolerance: section.relative_reduction_tolerance,
        }
    }
}
