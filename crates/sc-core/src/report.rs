//! Before/after calibration reports.
//!
//! Two renderings of the same [`CalibrationReport`]:
//! - text for the terminal
//! - JSON for programmatic consumption

use crate::dcf::{evaluate, DcfSummary, OperatingPoint};
use crate::error::Result;
use crate::labels::Labels;
use crate::logging::generate_run_id;
use crate::platt::{FitQuality, PlattFit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one fit-and-evaluate run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationReport {
    /// `run-` plus 12 hex characters.
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub n_trials: usize,
    pub n_target: usize,
    pub n_nontarget: usize,
    pub fit: PlattFit,
    pub quality: FitQuality,
    /// DCF of the raw scores.
    pub before: DcfSummary,
    /// DCF of `slope · score + intercept`.
    pub after: DcfSummary,
    pub summary: String,
}

impl CalibrationReport {
    /// Evaluate raw and calibrated scores at `point` and assemble the report.
    pub fn from_fit(
        labels: &Labels,
        scores: &[f64],
        fit: PlattFit,
        point: &OperatingPoint,
    ) -> Result<Self> {
        let before = evaluate(labels, scores, point)?;
        let calibrated = fit.model.apply(scores);
        let after = evaluate(labels, &calibrated, point)?;
        let quality = fit.quality();
        let summary = generate_summary(&fit, quality, &before, &after);

        Ok(CalibrationReport {
            run_id: generate_run_id(),
            generated_at: Utc::now(),
            n_trials: labels.len(),
            n_target: labels.positives(),
            n_nontarget: labels.negatives(),
            fit,
            quality,
            before,
            after,
            summary,
        })
    }

    /// Text report for terminal display.
    pub fn text_report(&self) -> String {
        let op = &self.before.operating_point;
        let model = &self.fit.model;
        let mut output = String::new();

        output.push_str(&format!("Platt calibration report ({})\n", self.run_id));
        output.push_str(&format!(
            "  Trials:    {} ({} target, {} non-target)\n",
            self.n_trials, self.n_target, self.n_nontarget
        ));
        output.push_str(&format!(
            "  Operating: p_target={}  beta={:.4}  theta={:.4}\n",
            op.p_target, op.beta, op.theta
        ));
        output.push_str(&format!(
            "  Model:     slope={:.6}  intercept={:.6}  ({})\n",
            model.slope, model.intercept, self.quality
        ));
        output.push_str(&format!(
            "  Optimizer: {} after {} iterations, {} evaluations, |g|={:.3e}\n",
            self.fit.termination, self.fit.iterations, self.fit.evaluations, self.fit.gradient_norm
        ));
        output.push('\n');
        output.push_str(&format!(
            "Before: minDCF={:.4}, actDCF={:.4}\n",
            self.before.min_dcf, self.before.act_dcf
        ));
        output.push_str(&format!(
            "After:  minDCF={:.4}, actDCF={:.4}\n",
            self.after.min_dcf, self.after.act_dcf
        ));
        output.push('\n');
        output.push_str(&self.summary);
        output.push('\n');
        output
    }

    /// Pretty-printed JSON.
    pub fn json_report(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn generate_summary(
    fit: &PlattFit,
    quality: FitQuality,
    before: &DcfSummary,
    after: &DcfSummary,
) -> String {
    if quality == FitQuality::Degenerate {
        return format!(
            "Degenerate calibration: slope {:.4} is not positive, so the scores do not separate the classes.",
            fit.model.slope
        );
    }
    if !fit.converged {
        return format!(
            "Optimizer stopped early ({}); the calibration may be inaccurate.",
            fit.termination
        );
    }
    format!(
        "Calibration gap (actDCF - minDCF) went from {:.4} to {:.4}.",
        before.calibration_gap, after.calibration_gap
    )
}
