//! Binary trial labels.
//!
//! Labels arrive either as booleans or as numbers in one of the common
//! encodings (`{0, 1}` or `{-1, 1}`). Numeric values are partitioned as
//! `value > 0` → target, anything else → non-target.

use crate::error::{CalibrationError, Result};
use serde::{Deserialize, Serialize};

pub use sc_config::LabelPolicy;

/// Target/non-target membership for each trial (`true` = target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(Vec<bool>);

impl Labels {
    /// Build labels from numeric values.
    ///
    /// NaN is always rejected. Under [`LabelPolicy::Strict`] the values must
    /// all come from a single encoding: `{0, 1}` or `{-1, 1}`.
    pub fn from_values(values: &[f64], policy: LabelPolicy) -> Result<Self> {
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| v.is_nan()) {
            return Err(CalibrationError::InvalidLabel {
                index,
                value,
                reason: "label is NaN".to_string(),
            });
        }

        if policy == LabelPolicy::Strict {
            check_strict_encoding(values)?;
        }

        Ok(Labels(values.iter().map(|&v| v > 0.0).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Number of target trials.
    pub fn positives(&self) -> usize {
        self.0.iter().filter(|&&t| t).count()
    }

    /// Number of non-target trials.
    pub fn negatives(&self) -> usize {
        self.len() - self.positives()
    }

    /// Fail with a domain error unless both classes are present.
    pub fn require_both_classes(&self) -> Result<(usize, usize)> {
        if self.is_empty() {
            return Err(CalibrationError::Empty);
        }
        let positives = self.positives();
        let negatives = self.len() - positives;
        if positives == 0 || negatives == 0 {
            return Err(CalibrationError::SingleClass {
                positives,
                negatives,
            });
        }
        Ok((positives, negatives))
    }
}

fn check_strict_encoding(values: &[f64]) -> Result<()> {
    let mut saw_zero = None;
    let mut saw_minus_one = None;

    for (index, &value) in values.iter().enumerate() {
        if value == 0.0 {
            saw_zero = Some(index);
        } else if value == -1.0 {
            saw_minus_one = Some(index);
        } else if value != 1.0 {
            return Err(CalibrationError::InvalidLabel {
                index,
                value,
                reason: "strict labels must be 0/1 or -1/1".to_string(),
            });
        }

        if let (Some(_), Some(_)) = (saw_zero, saw_minus_one) {
            return Err(CalibrationError::InvalidLabel {
                index,
                value,
                reason: "mixed 0/1 and -1/1 encodings".to_string(),
            });
        }
    }
    Ok(())
}

impl From<Vec<bool>> for Labels {
    fn from(values: Vec<bool>) -> Self {
        Labels(values)
    }
}

impl From<&[bool]> for Labels {
    fn from(values: &[bool]) -> Self {
        Labels(values.to_vec())
    }
}

impl FromIterator<bool> for Labels {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Labels(iter.into_iter().collect())
    }
}
