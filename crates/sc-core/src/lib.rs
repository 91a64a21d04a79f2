//! Score Calibration Core Library
//!
//! Fits Platt-style affine calibration (slope, intercept) that maps raw
//! detector scores onto a log-likelihood-ratio scale, and evaluates the
//! result with the detection cost function (DCF):
//! - Prior-smoothed regression targets and the logistic objective
//! - A pluggable quasi-Newton minimizer (L-BFGS by default)
//! - Minimum DCF over a full threshold sweep, actual DCF at the Bayes threshold
//!
//! The binary entry point is in `main.rs`.

pub mod dcf;
pub mod error;
pub mod exit_codes;
pub mod input;
pub mod labels;
pub mod logging;
pub mod optimize;
pub mod platt;
pub mod report;
pub mod synthetic;

pub use dcf::{
    compute_actual_dcf, compute_min_dcf, det_curve, evaluate, min_dcf_from_curve, DcfSummary,
    DetCurve, OperatingPoint,
};
pub use error::{CalibrationError, Result};
pub use labels::{LabelPolicy, Labels};
pub use optimize::{Lbfgs, Minimizer, Minimum, Objective, OptimizeError, OptimizerSettings, Termination};
pub use platt::{
    apply_calibration, fit_calibration, fit_calibration_with, FitQuality, PlattFit, PlattModel,
    SmoothedTargets,
};
