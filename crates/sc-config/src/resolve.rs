//! Configuration resolution and loading.
//!
//! Resolution order: CLI argument → `SC_CONFIG` environment variable → defaults.

use crate::settings::CalibrationConfig;
use crate::validate::{validate_config, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "SC_CONFIG";

/// Where the configuration was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid config {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("Invalid builtin config: {0}")]
    InvalidDefault(#[from] ValidationError),
}

impl ConfigError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 60,
            ConfigError::Invalid { source, .. } => source.code(),
            ConfigError::InvalidDefault(source) => source.code(),
        }
    }
}

/// Loaded configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: CalibrationConfig,
    /// Path to the config file (None if using defaults).
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve the configuration file path.
///
/// An explicit path (CLI or environment) is returned even if it does not
/// exist, so the loader can report it instead of silently using defaults.
pub fn resolve_config_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        if !env_path.trim().is_empty() {
            return (Some(PathBuf::from(env_path)), ConfigSource::Environment);
        }
    }

    (None, ConfigSource::BuiltinDefault)
}

/// Load and validate configuration with the standard resolution order.
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let (path, source) = resolve_config_path(cli_path);

    let config = match &path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound { path: p.clone() });
            }
            let config = CalibrationConfig::from_file(p).map_err(|source| ConfigError::Invalid {
                path: p.clone(),
                source,
            })?;
            validate_config(&config).map_err(|source| ConfigError::Invalid {
                path: p.clone(),
                source,
            })?;
            config
        }
        None => {
            let config = CalibrationConfig::default();
            validate_config(&config)?;
            config
        }
    };

    Ok(ResolvedConfig {
        config,
        path,
        source,
    })
}
