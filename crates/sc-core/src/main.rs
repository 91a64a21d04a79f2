//! Score Calibration CLI
//!
//! The entry point for `sc-core`:
//! - `demo`: synthetic before/after comparison
//! - `fit`: fit a Platt calibration on labeled scores and report DCF
//! - `apply`: calibrate raw scores with a saved model
//! - `config show`: print the effective configuration

use clap::{Args, Parser, Subcommand, ValueEnum};
use sc_config::{load_config, CalibrationConfig, ConfigError, ResolvedConfig};
use sc_core::exit_codes::ExitCode;
use sc_core::input::{into_scores_and_labels, read_scores, read_trials};
use sc_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use sc_core::report::CalibrationReport;
use sc_core::synthetic;
use sc_core::{
    fit_calibration, FitQuality, LabelPolicy, Labels, OperatingPoint, OptimizerSettings,
    PlattModel,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Platt score calibration with detection-cost evaluation
#[derive(Parser)]
#[command(name = "sc-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (falls back to $SC_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for stdout payloads
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate synthetic Gaussian scores and compare DCF before/after
    Demo(DemoArgs),

    /// Fit a calibration on a labeled score file
    Fit(FitArgs),

    /// Apply a saved calibration model to raw scores
    Apply(ApplyArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Number of target trials
    #[arg(long)]
    n_target: Option<usize>,

    /// Number of non-target trials
    #[arg(long)]
    n_nontarget: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Target prior for DCF evaluation
    #[arg(long)]
    p_target: Option<f64>,
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Score file: `score label` lines, or a JSON array when named *.json
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Label interpretation (permissive, strict)
    #[arg(long)]
    label_policy: Option<LabelPolicy>,

    /// Write the fitted model as JSON
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Target prior for DCF evaluation
    #[arg(long)]
    p_target: Option<f64>,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Model JSON written by `fit --model-out`
    #[arg(long, short = 'm')]
    model: PathBuf,

    /// Raw scores, one per line (extra columns ignored)
    #[arg(long, short = 'i')]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    init_logging(&log_config(&cli.global));

    let exit_code = match &cli.command {
        Commands::Demo(args) => run_demo(&cli.global, args),
        Commands::Fit(args) => run_fit(&cli.global, args),
        Commands::Apply(args) => run_apply(&cli.global, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
        },
    };

    std::process::exit(exit_code.as_i32());
}

fn log_config(global: &GlobalOpts) -> LogConfig {
    let mut config = LogConfig::from_env(global.log_level, global.log_format);
    if global.log_level.is_none() {
        if global.quiet {
            config = config.with_level(LogLevel::Error);
        } else if global.verbose > 0 {
            let level = (0..global.verbose).fold(config.level, |level, _| level.louder());
            config = config.with_level(level);
        }
    }
    config
}

// ============================================================================
// Shared helpers
// ============================================================================

fn output_error(global: &GlobalOpts, exit_code: ExitCode, message: &str) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "error": {
                    "code": exit_code.code_name(),
                    "exit_code": exit_code.as_i32(),
                    "message": message,
                }
            });
            eprintln!("{}", response);
        }
        OutputFormat::Human => {
            eprintln!("Error: {}", message);
        }
    }
    exit_code
}

fn output_config_error(global: &GlobalOpts, error: &ConfigError) -> ExitCode {
    output_error(
        global,
        ExitCode::ConfigError,
        &format!("{} (code {})", error, error.code()),
    )
}

fn load(global: &GlobalOpts) -> Result<ResolvedConfig, ExitCode> {
    let resolved = load_config(global.config.as_deref())
        .map_err(|e| output_config_error(global, &e))?;
    debug!(
        source = %resolved.source,
        path = ?resolved.path,
        "configuration loaded"
    );
    Ok(resolved)
}

fn operating_point(global: &GlobalOpts, p_target: f64) -> Result<OperatingPoint, ExitCode> {
    OperatingPoint::from_p_target(p_target)
        .map_err(|e| output_error(global, ExitCode::ArgsError, &e.to_string()))
}

/// Write `payload` to stdout; a closed pipe is not an error.
fn emit(payload: &str) {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let _ = out.write_all(payload.as_bytes());
    let _ = out.flush();
}

fn outcome(quality: FitQuality, converged: bool) -> ExitCode {
    if !converged {
        ExitCode::NotConverged
    } else if quality == FitQuality::Degenerate {
        ExitCode::DegenerateCalibration
    } else {
        ExitCode::Clean
    }
}

/// Fit, evaluate before/after, print the report, optionally save the model.
fn fit_and_report(
    global: &GlobalOpts,
    config: &CalibrationConfig,
    scores: &[f64],
    labels: &Labels,
    point: &OperatingPoint,
    model_out: Option<&Path>,
) -> ExitCode {
    let settings = OptimizerSettings::from(&config.optimizer);
    let fit = match fit_calibration(scores, labels, &settings) {
        Ok(fit) => fit,
        Err(e) => return output_error(global, ExitCode::from(&e), &e.to_string()),
    };
    let exit_code = outcome(fit.quality(), fit.converged);

    if let Some(path) = model_out {
        if let Err(code) = save_model(global, &fit.model, path) {
            return code;
        }
    }

    let report = match CalibrationReport::from_fit(labels, scores, fit, point) {
        Ok(report) => report,
        Err(e) => return output_error(global, ExitCode::from(&e), &e.to_string()),
    };
    info!(
        run_id = %report.run_id,
        min_dcf_before = report.before.min_dcf,
        act_dcf_before = report.before.act_dcf,
        min_dcf_after = report.after.min_dcf,
        act_dcf_after = report.after.act_dcf,
        "calibration evaluated"
    );

    match global.format {
        OutputFormat::Human => emit(&report.text_report()),
        OutputFormat::Json => match report.json_report() {
            Ok(json) => emit(&format!("{}\n", json)),
            Err(e) => return output_error(global, ExitCode::InternalError, &e.to_string()),
        },
    }

    exit_code
}

fn save_model(global: &GlobalOpts, model: &PlattModel, path: &Path) -> Result<(), ExitCode> {
    let json = serde_json::to_string_pretty(model)
        .map_err(|e| output_error(global, ExitCode::InternalError, &e.to_string()))?;
    std::fs::write(path, json + "\n").map_err(|e| {
        output_error(
            global,
            ExitCode::InputError,
            &format!("cannot write model to {}: {}", path.display(), e),
        )
    })?;
    info!(path = %path.display(), "model written");
    Ok(())
}

fn load_model(global: &GlobalOpts, path: &Path) -> Result<PlattModel, ExitCode> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        output_error(
            global,
            ExitCode::InputError,
            &format!("cannot read model {}: {}", path.display(), e),
        )
    })?;
    let model: PlattModel = serde_json::from_str(&content).map_err(|e| {
        output_error(
            global,
            ExitCode::InputError,
            &format!("invalid model {}: {}", path.display(), e),
        )
    })?;
    if !(model.slope.is_finite() && model.intercept.is_finite()) {
        return Err(output_error(
            global,
            ExitCode::InputError,
            &format!("model {} has non-finite parameters", path.display()),
        ));
    }
    Ok(model)
}

// ============================================================================
// Commands
// ============================================================================

fn run_demo(global: &GlobalOpts, args: &DemoArgs) -> ExitCode {
    let resolved = match load(global) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let config = &resolved.config;

    let mut section = config.synthetic.clone();
    if let Some(n) = args.n_target {
        section.n_target = n;
    }
    if let Some(n) = args.n_nontarget {
        section.n_nontarget = n;
    }
    if let Some(seed) = args.seed {
        section.seed = seed;
    }
    let point = match operating_point(global, args.p_target.unwrap_or(config.evaluation.p_target))
    {
        Ok(p) => p,
        Err(code) => return code,
    };

    let trials = match synthetic::generate(&section) {
        Ok(t) => t,
        Err(e) => return output_error(global, ExitCode::ArgsError, &e.to_string()),
    };
    info!(
        n_target = section.n_target,
        n_nontarget = section.n_nontarget,
        seed = section.seed,
        "generated synthetic trials"
    );

    fit_and_report(global, config, &trials.scores, &trials.labels, &point, None)
}

fn run_fit(global: &GlobalOpts, args: &FitArgs) -> ExitCode {
    let resolved = match load(global) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let config = &resolved.config;

    let point = match operating_point(global, args.p_target.unwrap_or(config.evaluation.p_target))
    {
        Ok(p) => p,
        Err(code) => return code,
    };

    let trials = match read_trials(&args.input) {
        Ok(t) => t,
        Err(e) => return output_error(global, ExitCode::InputError, &e.to_string()),
    };
    let policy = args.label_policy.unwrap_or(config.labels.policy);
    let (scores, labels) = match into_scores_and_labels(&trials, policy) {
        Ok(split) => split,
        Err(e) => return output_error(global, ExitCode::from(&e), &e.to_string()),
    };
    info!(
        input = %args.input.display(),
        trials = labels.len(),
        policy = %policy,
        "loaded score file"
    );

    fit_and_report(
        global,
        config,
        &scores,
        &labels,
        &point,
        args.model_out.as_deref(),
    )
}

fn run_apply(global: &GlobalOpts, args: &ApplyArgs) -> ExitCode {
    let model = match load_model(global, &args.model) {
        Ok(m) => m,
        Err(code) => return code,
    };
    let scores = match read_scores(&args.input) {
        Ok(s) => s,
        Err(e) => return output_error(global, ExitCode::InputError, &e.to_string()),
    };
    let calibrated = model.apply(&scores);
    debug!(
        slope = model.slope,
        intercept = model.intercept,
        n = calibrated.len(),
        "applied calibration"
    );

    match global.format {
        OutputFormat::Human => {
            let mut payload = String::with_capacity(calibrated.len() * 24);
            for value in &calibrated {
                payload.push_str(&value.to_string());
                payload.push('\n');
            }
            emit(&payload);
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "model": model,
                "calibrated": calibrated,
            });
            emit(&format!("{}\n", response));
        }
    }
    ExitCode::Clean
}

fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let resolved = match load(global) {
        Ok(r) => r,
        Err(code) => return code,
    };

    match global.format {
        OutputFormat::Human => match resolved.config.to_toml_string() {
            Ok(toml) => {
                let origin = match &resolved.path {
                    Some(p) => format!("# source: {} ({})\n", p.display(), resolved.source),
                    None => format!("# source: {}\n", resolved.source),
                };
                emit(&format!("{}{}", origin, toml));
            }
            Err(e) => return output_config_error(global, &ConfigError::InvalidDefault(e)),
        },
        OutputFormat::Json => {
            let response = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "source": {
                    "kind": resolved.source.to_string(),
                    "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                },
                "config": resolved.config,
            });
            emit(&format!("{}\n", response));
        }
    }
    ExitCode::Clean
}
