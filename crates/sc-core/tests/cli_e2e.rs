//! CLI tests for the sc-core binary.
//!
//! These run the real binary and check stdout payloads, stderr messages and
//! exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the sc-core binary with a clean environment.
fn sc_core() -> Command {
    let mut cmd = Command::cargo_bin("sc-core").expect("sc-core binary should exist");
    cmd.env_remove("SC_CONFIG")
        .env_remove("SC_LOG")
        .env_remove("SC_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

const TRIALS: &str = "\
# score label
4.0 1
3.1 1
2.2 1
0.5 1
1.0 0
-0.3 0
-1.2 0
-2.0 0
-2.5 0
-3.3 0
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

// ============================================================================
// demo
// ============================================================================

mod demo {
    use super::*;

    #[test]
    fn prints_before_and_after_lines() {
        sc_core()
            .args(["demo", "--n-target", "200", "--n-nontarget", "2000", "-q"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Before: minDCF="))
            .stdout(predicate::str::contains("After:  minDCF="));
    }

    #[test]
    fn json_report_parses() {
        let output = sc_core()
            .args(["demo", "--n-target", "100", "--n-nontarget", "1000", "--format", "json", "-q"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["n_trials"], 1100);
        assert!(report["run_id"].as_str().unwrap().starts_with("run-"));
        assert!(report["before"]["act_dcf"].as_f64().unwrap() >= report["before"]["min_dcf"].as_f64().unwrap());
    }

    #[test]
    fn empty_class_is_an_argument_error() {
        sc_core()
            .args(["demo", "--n-target", "0"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("Error"));
    }

    #[test]
    fn bad_p_target_is_an_argument_error() {
        sc_core()
            .args(["demo", "--p-target", "1.5"])
            .assert()
            .code(10);
    }
}

// ============================================================================
// fit / apply
// ============================================================================

mod fit {
    use super::*;

    #[test]
    fn fits_text_file_and_writes_model() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "trials.txt", TRIALS);
        let model = dir.path().join("model.json");

        sc_core()
            .args(["fit", "--input", arg(&input), "--model-out", arg(&model), "--p-target", "0.25"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Before:"))
            .stdout(predicate::str::contains("After:"));

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&model).unwrap()).unwrap();
        assert!(saved["slope"].as_f64().unwrap() > 0.0);
        assert!(saved["intercept"].is_number());
    }

    #[test]
    fn fits_json_file() {
        let dir = TempDir::new().unwrap();
        let input = write(
            &dir,
            "trials.json",
            r#"[{"score": 2.0, "label": 1}, {"score": 0.1, "label": 1},
                {"score": 0.4, "label": 0}, {"score": -1.0, "label": 0}]"#,
        );
        sc_core()
            .args(["fit", "--input", arg(&input), "--format", "json", "-q"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"min_dcf\""));
    }

    #[test]
    fn strict_policy_rejects_other_labels() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "trials.txt", "1.0 2\n0.0 0\n");
        sc_core()
            .args(["fit", "--input", arg(&input)])
            .assert()
            .success();
        sc_core()
            .args(["fit", "--input", arg(&input), "--label-policy", "strict"])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("invalid label"));
    }

    #[test]
    fn single_class_is_an_input_error() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "trials.txt", "1.0 1\n0.5 1\n");
        sc_core()
            .args(["fit", "--input", arg(&input)])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("both classes"));
    }

    #[test]
    fn missing_input_is_an_input_error() {
        sc_core()
            .args(["fit", "--input", "/nonexistent/trials.txt"])
            .assert()
            .code(11);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "trials.txt", "1.0 1\nnot-a-number 0\n");
        sc_core()
            .args(["fit", "--input", arg(&input)])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("line 2"));
    }

    #[test]
    fn apply_uses_saved_model() {
        let dir = TempDir::new().unwrap();
        let model = write(&dir, "model.json", r#"{"slope": 2.0, "intercept": -1.0}"#);
        let scores = write(&dir, "scores.txt", "0.0\n1.5\n# skipped\n-2\n");
        sc_core()
            .args(["apply", "--model", arg(&model), "--input", arg(&scores)])
            .assert()
            .success()
            .stdout("-1\n2\n-5\n");
    }

    #[test]
    fn apply_rejects_invalid_model() {
        let dir = TempDir::new().unwrap();
        let model = write(&dir, "model.json", "{\"slope\": 1.0}");
        let scores = write(&dir, "scores.txt", "0.0\n");
        sc_core()
            .args(["apply", "--model", arg(&model), "--input", arg(&scores)])
            .assert()
            .code(11);
    }
}

// ============================================================================
// fit outcome exit codes
// ============================================================================

mod outcome {
    use super::*;

    const ONE_ITERATION: &str = "[optimizer]\nmax_iterations = 1\n";

    #[test]
    fn optimizer_budget_exhaustion_exits_not_converged() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "sc.toml", ONE_ITERATION);
        sc_core()
            .args(["demo", "--config", arg(&config), "--n-target", "200", "--n-nontarget", "2000"])
            .args(["--seed", "7", "-q"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Optimizer stopped early"));
    }

    #[test]
    fn constant_scores_exit_degenerate() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "trials.txt", "0.5 1\n0.5 0\n0.5 1\n0.5 0\n");
        sc_core()
            .args(["fit", "--input", arg(&input), "-q"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("Degenerate"));
    }

    #[test]
    fn not_converged_takes_precedence_over_degenerate() {
        let dir = TempDir::new().unwrap();
        let config = write(&dir, "sc.toml", ONE_ITERATION);
        // Targets score low, so the fitted slope goes negative.
        let input = write(&dir, "trials.txt", "-2 1\n-1 1\n-0.5 1\n0.5 0\n1 0\n2 0\n");
        sc_core()
            .args(["fit", "--config", arg(&config), "--input", arg(&input), "-q"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Degenerate"));
    }
}

// ============================================================================
// logging
// ============================================================================

mod logging {
    use super::*;

    const DEMO: [&str; 5] = ["demo", "--n-target", "100", "--n-nontarget", "1000"];

    #[test]
    fn cli_level_overrides_rust_log() {
        sc_core()
            .env("RUST_LOG", "error")
            .args(DEMO)
            .args(["--log-level", "debug"])
            .assert()
            .success()
            .stderr(predicate::str::contains("DEBUG"));
    }

    #[test]
    fn quiet_overrides_rust_log() {
        sc_core()
            .env("RUST_LOG", "info")
            .args(DEMO)
            .arg("-q")
            .assert()
            .success()
            .stderr(predicate::str::contains("INFO").not());
    }

    #[test]
    fn rust_log_applies_without_explicit_level() {
        sc_core()
            .env("RUST_LOG", "sc_core=debug")
            .args(DEMO)
            .assert()
            .success()
            .stderr(predicate::str::contains("DEBUG"));
    }

    #[test]
    fn sc_log_overrides_rust_log() {
        sc_core()
            .env("RUST_LOG", "debug")
            .env("SC_LOG", "warn")
            .args(DEMO)
            .assert()
            .success()
            .stderr(predicate::str::contains("DEBUG").not())
            .stderr(predicate::str::contains("INFO").not());
    }
}

// ============================================================================
// config and argument errors
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn show_prints_defaults() {
        sc_core()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[optimizer]"))
            .stdout(predicate::str::contains("p_target = 0.01"));
    }

    #[test]
    fn missing_config_file_exits_with_config_error() {
        sc_core()
            .args(["demo", "--config", "/nonexistent/sc.toml"])
            .assert()
            .code(12)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn config_from_environment_is_validated() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "sc.toml", "[evaluation]\np_target = 2.0\n");
        sc_core()
            .env("SC_CONFIG", arg(&path))
            .args(["config", "show"])
            .assert()
            .code(12);
    }

    #[test]
    fn unknown_command_fails() {
        sc_core()
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn fit_without_input_fails() {
        sc_core().arg("fit").assert().code(10);
    }
}
