//! Detection error tradeoff (DET) sweep.
//!
//! Enumerates every operating point reachable by a threshold on the scores:
//! one per distinct score value (accept iff `score >= threshold`) plus the
//! reject-all point at `threshold = +inf`.

use crate::error::{check_scores, Result};
use crate::labels::Labels;
use serde::{Deserialize, Serialize};

/// Parallel false-positive / false-negative rates ordered by increasing threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetCurve {
    pub thresholds: Vec<f64>,
    pub fpr: Vec<f64>,
    pub fnr: Vec<f64>,
}

impl DetCurve {
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Iterate `(threshold, fpr, fnr)` triples.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.thresholds
            .iter()
            .zip(&self.fpr)
            .zip(&self.fnr)
            .map(|((&t, &fp), &fn_)| (t, fp, fn_))
    }
}

/// Compute the full DET sweep for labeled scores.
///
/// Fails with a domain error if either class is absent, since one of the
/// two rates would be 0/0.
pub fn det_curve(labels: &Labels, scores: &[f64]) -> Result<DetCurve> {
    check_scores(scores, labels.len())?;
    let (positives, negatives) = labels.require_both_classes()?;
    let n_pos = positives as f64;
    let n_neg = negatives as f64;

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    // Built in decreasing-threshold order, reversed at the end.
    let mut thresholds = Vec::with_capacity(scores.len() + 1);
    let mut fpr = Vec::with_capacity(scores.len() + 1);
    let mut fnr = Vec::with_capacity(scores.len() + 1);
    thresholds.push(f64::INFINITY);
    fpr.push(0.0);
    fnr.push(1.0);

    let is_target = labels.as_slice();
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if is_target[order[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        thresholds.push(threshold);
        fpr.push(fp as f64 / n_neg);
        fnr.push((positives - tp) as f64 / n_pos);
    }

    thresholds.reverse();
    fpr.reverse();
    fnr.reverse();

    Ok(DetCurve {
        thresholds,
        fpr,
        fnr,
    })
}
