//! Configuration loading + resolution tests against real files.
//!
//! Covers:
//! - Resolution order (CLI > env > defaults)
//! - Validation failures surfacing with the offending path
//! - Partial documents falling back to defaults

use sc_config::resolve::ENV_CONFIG_PATH;
use sc_config::{load_config, CalibrationConfig, ConfigError, ConfigSource, LabelPolicy};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    key: &'static str,
    saved: Option<String>,
}

impl EnvGuard {
    fn new(key: &'static str) -> Self {
        Self {
            key,
            saved: env::var(key).ok(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.saved {
            Some(val) => env::set_var(self.key, val),
            None => env::remove_var(self.key),
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_config(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn defaults_when_nothing_configured() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_CONFIG_PATH);
        env::remove_var(ENV_CONFIG_PATH);

        let resolved = load_config(None).expect("defaults load");
        assert_eq!(resolved.source, ConfigSource::BuiltinDefault);
        assert!(resolved.path.is_none());
        assert_eq!(resolved.config, CalibrationConfig::default());
    });
}

#[test]
fn env_path_is_used() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_CONFIG_PATH);
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "env.toml", "[evaluation]\np_target = 0.05\n");
        env::set_var(ENV_CONFIG_PATH, &path);

        let resolved = load_config(None).expect("env config load");
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.config.evaluation.p_target, 0.05);
    });
}

#[test]
fn cli_path_overrides_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(ENV_CONFIG_PATH);
        let dir = TempDir::new().unwrap();
        let env_path = write_config(dir.path(), "env.toml", "[labels]\npolicy = \"permissive\"\n");
        let cli_path = write_config(dir.path(), "cli.toml", "[labels]\npolicy = \"strict\"\n");
        env::set_var(ENV_CONFIG_PATH, &env_path);

        let resolved = load_config(Some(&cli_path)).expect("cli config load");
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path.as_deref(), Some(cli_path.as_path()));
        assert_eq!(resolved.config.labels.policy, LabelPolicy::Strict);
    });
}

#[test]
fn invalid_values_report_path_and_code() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "bad.toml", "[optimizer]\nmemory = 0\n");

    let err = load_config(Some(&path)).expect_err("memory = 0 must be rejected");
    assert_eq!(err.code(), 65);
    match err {
        ConfigError::Invalid { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unparseable_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "broken.toml", "optimizer = [1, 2\n");

    let err = load_config(Some(&path)).expect_err("broken TOML must be rejected");
    assert_eq!(err.code(), 61);
}
