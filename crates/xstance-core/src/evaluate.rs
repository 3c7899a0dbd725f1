//! Segmented evaluation: macro-F1 per (test set, language).
//!
//! Gold and predicted records are aligned purely by position. For every
//! evaluated test set and every language, in their fixed order, the matching
//! gold indices are collected and scored; empty partitions are skipped.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::XStanceError;
use crate::metrics::ClassificationReport;
use crate::model::{Language, PredictionRecord, Record, TestSet};

/// Score of one non-empty partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionScore {
    pub test_set: TestSet,
    pub language: Language,
    /// Macro-F1 scaled by 100.
    pub score: f64,
    /// Number of gold records in the partition.
    pub support: usize,
    pub classification: ClassificationReport,
}

/// Score `pred` against `gold`, partitioned by test set and language.
///
/// Fails without partial output if any gold record has a missing or unknown
/// test set or language, if a scored gold record has no label, or if a scored
/// index is beyond the end of `pred`.
pub fn evaluate(
    gold: &[Record],
    pred: &[PredictionRecord],
) -> Result<Vec<PartitionScore>, XStanceError> {
    let keys = gold
        .iter()
        .enumerate()
        .map(|(i, record)| Ok((record.test_set(i)?, record.language(i)?)))
        .collect::<Result<Vec<(TestSet, Language)>, XStanceError>>()?;

    if gold.len() != pred.len() {
        tracing::warn!(
            "gold has {} records but predictions have {}",
            gold.len(),
            pred.len()
        );
    }

    let mut scores = Vec::new();
    for test_set in TestSet::EVALUATED {
        for language in Language::ALL {
            let indices: Vec<usize> = keys
                .iter()
                .enumerate()
                .filter(|(_, key)| **key == (test_set, language))
                .map(|(i, _)| i)
                .collect();
            if indices.is_empty() {
                continue;
            }

            let mut gold_labels = Vec::with_capacity(indices.len());
            let mut pred_labels = Vec::with_capacity(indices.len());
            for &i in &indices {
                let gold_label = gold[i].label.as_ref().ok_or(XStanceError::MissingField {
                    index: i,
                    field: "label",
                })?;
                let pred_record = pred.get(i).ok_or(XStanceError::Alignment {
                    index: i,
                    pred_len: pred.len(),
                })?;
                gold_labels.push(gold_label.to_string());
                pred_labels.push(pred_record.label.to_string());
            }

            let classification =
                ClassificationReport::from_predictions(&gold_labels, &pred_labels)?;
            tracing::debug!(
                "{test_set}/{language}: {} records, macro-F1 {:.4}",
                indices.len(),
                classification.macro_f1
            );
            scores.push(PartitionScore {
                test_set,
                language,
                score: 100.0 * classification.macro_f1,
                support: indices.len(),
                classification,
            });
        }
    }

    Ok(scores)
}

/// A complete evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Scores in reporting order.
    pub partitions: Vec<PartitionScore>,
}

impl EvaluationReport {
    pub fn new(partitions: Vec<PartitionScore>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            partitions,
        }
    }

    /// Plain-text rendering: each test set name, then one `LANG score` line per
    /// scored language, then a blank line. With `verbose`, per-label metrics follow
    /// every score.
    pub fn to_text(&self, verbose: bool) -> String {
        let mut out = String::new();
        for test_set in TestSet::EVALUATED {
            out.push_str(test_set.name());
            out.push('\n');
            for p in self.partitions.iter().filter(|p| p.test_set == test_set) {
                out.push_str(&format!(
                    "{} {:.2}\n",
                    p.language.code().to_uppercase(),
                    p.score
                ));
                if verbose {
                    for (label, m) in &p.classification.per_label {
                        out.push_str(&format!(
                            "  {label}: P={:.4} R={:.4} F1={:.4} (n={})\n",
                            m.precision, m.recall, m.f1_score, m.support
                        ));
                    }
                }
            }
            out.push('\n');
        }
        out
    }

    /// Markdown table rendering.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# X-Stance Evaluation\n\n");
        md.push_str("| Test set | Language | Macro-F1 | Support |\n");
        md.push_str("|----------|----------|----------|---------|\n");
        for p in &self.partitions {
            md.push_str(&format!(
                "| {} | {} | {:.2} | {} |\n",
                p.test_set,
                p.language.code().to_uppercase(),
                p.score,
                p.support
            ));
        }
        md
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: EvaluationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
