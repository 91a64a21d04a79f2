//! Logging setup for the calibration CLI.
//!
//! - Human-readable console lines for interactive use
//! - JSON lines for pipelines
//!
//! stdout is reserved for command payloads (reports, calibrated scores);
//! every log line goes to stderr.
//!
//! ```ignore
//! use sc_core::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//! tracing::info!(run_id = %sc_core::logging::generate_run_id(), "starting");
//! ```

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel, ENV_LOG_FORMAT, ENV_LOG_LEVEL};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Directives applying `level` to this workspace's crates.
fn level_directives(level: LogLevel) -> String {
    format!("sc_core={level},sc_config={level}", level = LevelFilter::from(level))
}

/// Build the event filter. An explicit level wins; otherwise `RUST_LOG`
/// directives are used when present and valid.
fn build_filter(config: &LogConfig) -> EnvFilter {
    if !config.explicit_level {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::new(level_directives(config.level))
}

/// Install the global subscriber.
///
/// Returns false if a subscriber was already installed (the existing one
/// stays in place).
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .try_init()
                    .is_ok()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .try_init()
                    .is_ok()
            }
        }
        LogFormat::Jsonl => {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .flatten_event(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
                .is_ok()
        }
    }
}

/// Unique id for one invocation, `run-` plus 12 hex characters.
pub fn generate_run_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("run-{}", &uuid.simple().to_string()[..12])
}
