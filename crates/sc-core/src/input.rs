//! Score file parsing.
//!
//! Two formats are accepted:
//! - text: one trial per line, `score label` separated by whitespace or a
//!   comma; blank lines and `#` comments are ignored
//! - JSON (`.json` extension): an array of `{"score": f64, "label": f64}`

use crate::error::Result as CalibrationResult;
use crate::labels::{LabelPolicy, Labels};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One labeled score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredTrial {
    pub score: f64,
    pub label: f64,
}

/// Errors while reading score files.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
}

fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.split('#').next().unwrap_or("").trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn parse_number(line: usize, field: &str, what: &str) -> Result<f64, InputError> {
    field.parse::<f64>().map_err(|_| InputError::Parse {
        line,
        message: format!("invalid {}: {:?}", what, field),
    })
}

/// Parse `score label` lines.
pub fn parse_text(content: &str) -> Result<Vec<ScoredTrial>, InputError> {
    let mut trials = Vec::new();
    for (line, text) in content_lines(content) {
        let cols: Vec<&str> = fields(text).collect();
        if cols.len() != 2 {
            return Err(InputError::Parse {
                line,
                message: format!("expected 2 columns (score label), found {}", cols.len()),
            });
        }
        trials.push(ScoredTrial {
            score: parse_number(line, cols[0], "score")?,
            label: parse_number(line, cols[1], "label")?,
        });
    }
    Ok(trials)
}

/// Parse a JSON array of trials.
pub fn parse_json(content: &str) -> Result<Vec<ScoredTrial>, InputError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse unlabeled scores: the first column of each content line.
pub fn parse_scores(content: &str) -> Result<Vec<f64>, InputError> {
    content_lines(content)
        .map(|(line, text)| {
            let first = fields(text).next().unwrap_or("");
            parse_number(line, first, "score")
        })
        .collect()
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Read labeled trials, choosing the format from the extension.
pub fn read_trials(path: &Path) -> Result<Vec<ScoredTrial>, InputError> {
    let content = read(path)?;
    if is_json(path) {
        parse_json(&content)
    } else {
        parse_text(&content)
    }
}

/// Read unlabeled scores (text only).
pub fn read_scores(path: &Path) -> Result<Vec<f64>, InputError> {
    parse_scores(&read(path)?)
}

/// Split trials into a score vector and validated labels.
pub fn into_scores_and_labels(
    trials: &[ScoredTrial],
    policy: LabelPolicy,
) -> CalibrationResult<(Vec<f64>, Labels)> {
    let scores = trials.iter().map(|t| t.score).collect();
    let raw: Vec<f64> = trials.iter().map(|t| t.label).collect();
    let labels = Labels::from_values(&raw, policy)?;
    Ok((scores, labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_with_comments_and_commas() {
        let content = "# score label\n1.5 1\n\n-0.25,0   # trailing comment\n  3e-1\t-1\n";
        let trials = parse_text(content).unwrap();
        assert_eq!(
            trials,
            vec![
                ScoredTrial { score: 1.5, label: 1.0 },
                ScoredTrial { score: -0.25, label: 0.0 },
                ScoredTrial { score: 0.3, label: -1.0 },
            ]
        );
    }

    #[test]
    fn text_reports_line_numbers() {
        let err = parse_text("1.0 1\n2.0\n").unwrap_err();
        match err {
            InputError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        let err = parse_text("1.0 1\nabc 0\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn json_array() {
        let trials = parse_json(r#"[{"score": 0.5, "label": 1}, {"score": -2, "label": 0}]"#).unwrap();
        assert_eq!(trials.len(), 2);
        assert_eq!(trials[1].score, -2.0);
        assert!(parse_json("{").is_err());
    }

    #[test]
    fn unlabeled_scores_take_first_column() {
        assert_eq!(parse_scores("1.0\n# x\n2.5 1\n").unwrap(), vec![1.0, 2.5]);
    }

    #[test]
    fn split_applies_label_policy() {
        let trials = [
            ScoredTrial { score: 0.1, label: 1.0 },
            ScoredTrial { score: 0.2, label: 2.0 },
        ];
        let (scores, labels) = into_scores_and_labels(&trials, LabelPolicy::Permissive).unwrap();
        assert_eq!(scores, vec![0.1, 0.2]);
        assert_eq!(labels.positives(), 2);
        assert!(into_scores_and_labels(&trials, LabelPolicy::Strict).is_err());
    }
}
