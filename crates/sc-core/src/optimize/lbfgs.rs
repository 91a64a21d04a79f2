//! Limited-memory BFGS.
//!
//! Standard two-loop recursion over the last `memory` correction pairs,
//! with a backtracking Armijo line search. A correction pair is stored only
//! when it has positive curvature (`sᵀy > 0`), which keeps the implicit
//! inverse-Hessian approximation positive definite. If the resulting
//! direction is not a descent direction the memory is discarded and the
//! iteration restarts from steepest descent.

use super::{Minimizer, Minimum, Objective, OptimizeError, OptimizerSettings, Termination};
use sc_math::vector::{all_finite, axpy, dot, norm2, norm_inf, sub};
use std::collections::VecDeque;
use tracing::trace;

/// Sufficient-decrease constant for the Armijo condition.
const ARMIJO_C1: f64 = 1e-4;
/// Step shrink factor per backtracking trial.
const BACKTRACK: f64 = 0.5;
const MAX_LINE_SEARCH_STEPS: usize = 40;
/// Minimum sᵀy relative to yᵀy for a correction pair to be stored.
const CURVATURE_EPS: f64 = 1e-10;

struct Correction {
    s: Vec<f64>,
    y: Vec<f64>,
    rho: f64,
}

/// L-BFGS minimizer.
#[derive(Debug, Clone, Default)]
pub struct Lbfgs {
    settings: OptimizerSettings,
}

impl Lbfgs {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }
}

/// Compute -H·g with the two-loop recursion.
fn search_direction(grad: &[f64], history: &VecDeque<Correction>) -> Vec<f64> {
    let mut q = grad.to_vec();
    let mut alphas = Vec::with_capacity(history.len());

    for c in history.iter().rev() {
        let alpha = c.rho * dot(&c.s, &q);
        axpy(-alpha, &c.y, &mut q);
        alphas.push(alpha);
    }

    if let Some(last) = history.back() {
        let gamma = dot(&last.s, &last.y) / dot(&last.y, &last.y);
        q.iter_mut().for_each(|v| *v *= gamma);
    }

    for (c, alpha) in history.iter().zip(alphas.iter().rev()) {
        let beta = c.rho * dot(&c.y, &q);
        axpy(alpha - beta, &c.s, &mut q);
    }

    q.iter_mut().for_each(|v| *v = -*v);
    q
}

impl Minimizer for Lbfgs {
    fn minimize(&self, objective: &dyn Objective, x0: &[f64]) -> Result<Minimum, OptimizeError> {
        let n = objective.dimension();
        if x0.len() != n {
            return Err(OptimizeError::DimensionMismatch {
                expected: n,
                actual: x0.len(),
            });
        }
        if !all_finite(x0) {
            return Err(OptimizeError::NonFiniteStart);
        }

        let settings = &self.settings;
        let memory = settings.memory.max(1);

        let mut x = x0.to_vec();
        let mut grad = vec![0.0; n];
        let mut f = objective.value_and_gradient(&x, &mut grad);
        let mut evaluations = 1usize;
        if !f.is_finite() || !all_finite(&grad) {
            return Err(OptimizeError::NonFiniteObjective { value: f });
        }

        let mut history: VecDeque<Correction> = VecDeque::with_capacity(memory);
        let mut iterations = 0usize;

        let termination = loop {
            if norm_inf(&grad) <= settings.gradient_tolerance {
                break Termination::GradientTolerance;
            }
            if iterations >= settings.max_iterations {
                break Termination::MaxIterations;
            }
            if evaluations >= settings.max_evaluations {
                break Termination::MaxEvaluations;
            }

            let mut direction = search_direction(&grad, &history);
            let mut slope = dot(&grad, &direction);
            if !(slope < 0.0) || !all_finite(&direction) {
                history.clear();
                direction = grad.iter().map(|g| -g).collect();
                slope = -dot(&grad, &grad);
            }

            // Without curvature information, take a unit-length first step.
            let mut step = if history.is_empty() {
                1.0 / norm2(&grad)
            } else {
                1.0
            };

            let mut accepted = None;
            for _ in 0..MAX_LINE_SEARCH_STEPS {
                if evaluations >= settings.max_evaluations {
                    break;
                }
                let mut x_new = x.clone();
                axpy(step, &direction, &mut x_new);
                let mut g_new = vec![0.0; n];
                let f_new = objective.value_and_gradient(&x_new, &mut g_new);
                evaluations += 1;

                if f_new.is_finite() && all_finite(&g_new) && f_new <= f + ARMIJO_C1 * step * slope
                {
                    accepted = Some((x_new, f_new, g_new));
                    break;
                }
                step *= BACKTRACK;
            }

            let Some((x_new, f_new, g_new)) = accepted else {
                break if evaluations >= settings.max_evaluations {
                    Termination::MaxEvaluations
                } else {
                    Termination::LineSearchFailed
                };
            };
            iterations += 1;

            let s = sub(&x_new, &x);
            let y = sub(&g_new, &grad);
            let sy = dot(&s, &y);
            if sy > CURVATURE_EPS * dot(&y, &y) {
                if history.len() == memory {
                    history.pop_front();
                }
                history.push_back(Correction { s, y, rho: 1.0 / sy });
            }

            let f_old = f;
            x = x_new;
            f = f_new;
            grad = g_new;

            trace!(
                iteration = iterations,
                value = f,
                gradient_norm = norm_inf(&grad),
                step,
                "lbfgs step"
            );

            let scale = f_old.abs().max(f.abs()).max(1.0);
            if f_old - f <= settings.relative_reduction_tolerance * scale {
                break Termination::RelativeReduction;
            }
        };

        Ok(Minimum {
            gradient_norm: norm_inf(&grad),
            x,
            value: f,
            iterations,
            evaluations,
            termination,
        })
    }
}
