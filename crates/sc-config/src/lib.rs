//! Score calibration configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for `calibration.toml`
//! - Config resolution (CLI → env → defaults)
//! - Semantic validation with stable error codes

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{load_config, resolve_config_path, ConfigError, ConfigSource, ResolvedConfig};
pub use settings::{
    CalibrationConfig, EvaluationSection, LabelPolicy, LabelSection, OptimizerSection,
    SyntheticSection,
};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
