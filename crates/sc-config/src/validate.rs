//! Configuration validation errors and semantic validation.

use crate::settings::CalibrationConfig;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn invalid(field: &str, message: String) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

fn check_tolerance(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            field,
            format!("Must be finite and >= 0, got {}", value),
        ));
    }
    Ok(())
}

/// Validate a configuration semantically.
pub fn validate_config(config: &CalibrationConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let opt = &config.optimizer;
    if opt.memory == 0 {
        return Err(invalid("optimizer.memory", "Must be >= 1".to_string()));
    }
    if opt.max_iterations == 0 {
        return Err(invalid("optimizer.max_iterations", "Must be >= 1".to_string()));
    }
    if opt.max_evaluations == 0 {
        return Err(invalid("optimizer.max_evaluations", "Must be >= 1".to_string()));
    }
    check_tolerance("optimizer.gradient_tolerance", opt.gradient_tolerance)?;
    check_tolerance(
        "optimizer.relative_reduction_tolerance",
        opt.relative_reduction_tolerance,
    )?;

    let p = config.evaluation.p_target;
    if !(p > 0.0 && p < 1.0) {
        return Err(invalid(
            "evaluation.p_target",
            format!("Must be in (0, 1), got {}", p),
        ));
    }

    let syn = &config.synthetic;
    if syn.n_target == 0 {
        return Err(invalid("synthetic.n_target", "Must be >= 1".to_string()));
    }
    if syn.n_nontarget == 0 {
        return Err(invalid("synthetic.n_nontarget", "Must be >= 1".to_string()));
    }
    if !syn.target_mean.is_finite() || !syn.nontarget_mean.is_finite() {
        return Err(invalid(
            "synthetic",
            "Class means must be finite".to_string(),
        ));
    }
    if !(syn.std_dev.is_finite() && syn.std_dev > 0.0) {
        return Err(invalid(
            "synthetic.std_dev",
            format!("Must be finite and > 0, got {}", syn.std_dev),
        ));
    }

    Ok(())
}
