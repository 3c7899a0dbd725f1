//! Multi-class classification metrics.
//!
//! Implements per-label precision, recall and F1 and their unweighted
//! (macro) average. Labels are compared as strings; the label set is the
//! union of gold and predicted labels. A zero denominator yields a zero score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::XStanceError;

/// Per-label counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    /// Predicted this label and gold agrees.
    pub tp: usize,
    /// Predicted this label, gold says otherwise.
    pub fp: usize,
    /// Gold is this label, prediction says otherwise.
    pub fn_: usize,
}

impl LabelCounts {
    /// Precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// Recall: TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// F1 Score: 2 * (Precision * Recall) / (Precision + Recall)
    pub fn f1_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        let denom = precision + recall;
        if denom == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / denom
    }

    /// Number of gold occurrences of the label.
    pub fn support(&self) -> usize {
        self.tp + self.fn_
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        return 0.0;
    }
    num as f64 / denom as f64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-label metrics and their macro average.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Keyed by label, sorted.
    pub per_label: BTreeMap<String, LabelMetrics>,
    /// Unweighted mean of the per-label F1 scores, in `[0, 1]`.
    pub macro_f1: f64,
    /// Number of scored pairs.
    pub support: usize,
}

impl ClassificationReport {
    /// Score `predictions` against `ground_truth`, pairwise.
    pub fn from_predictions<S: AsRef<str>>(
        ground_truth: &[S],
        predictions: &[S],
    ) -> Result<Self, XStanceError> {
        if predictions.len() != ground_truth.len() {
            return Err(XStanceError::LengthMismatch {
                gold_len: ground_truth.len(),
                pred_len: predictions.len(),
            });
        }

        let counts = label_counts(ground_truth, predictions);
        let per_label: BTreeMap<String, LabelMetrics> = counts
            .iter()
            .map(|(label, c)| {
                (
                    label.to_string(),
                    LabelMetrics {
                        precision: c.precision(),
                        recall: c.recall(),
                        f1_score: c.f1_score(),
                        support: c.support(),
                    },
                )
            })
            .collect();

        let macro_f1 = if per_label.is_empty() {
            0.0
        } else {
            per_label.values().map(|m| m.f1_score).sum::<f64>() / per_label.len() as f64
        };

        Ok(Self {
            per_label,
            macro_f1,
            support: ground_truth.len(),
        })
    }
}

/// Count TP/FP/FN for every label in the union of gold and predicted labels.
pub(crate) fn label_counts<'a, S: AsRef<str>>(
    ground_truth: &'a [S],
    predictions: &'a [S],
) -> BTreeMap<&'a str, LabelCounts> {
    let mut counts: BTreeMap<&str, LabelCounts> = BTreeMap::new();
    for (gold, pred) in ground_truth.iter().zip(predictions) {
        let (gold, pred) = (gold.as_ref(), pred.as_ref());
        if gold == pred {
            counts.entry(gold).or_default().tp += 1;
        } else {
            counts.entry(gold).or_default().fn_ += 1;
            counts.entry(pred).or_default().fp += 1;
        }
    }
    counts
}

/// Macro-averaged F1 over the union of gold and predicted labels, in `[0, 1]`.
pub fn macro_f1<S: AsRef<str>>(
    ground_truth: &[S],
    predictions: &[S],
) -> Result<f64, XStanceError> {
    Ok(ClassificationReport::from_predictions(ground_truth, predictions)?.macro_f1)
}
