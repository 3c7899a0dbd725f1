//! Domain error types.
//!
//! These errors are raised by the pure transformations in this crate (instance
//! construction, prediction labeling, evaluation). They are all fatal: the
//! same input always reproduces them, so callers abort the enclosing batch.

use thiserror::Error;

/// Errors produced while building instances or scoring predictions.
#[derive(Debug, Error, PartialEq)]
pub enum XStanceError {
    /// A label could not be parsed as an integer while integer labels were required.
    #[error("labels must be integers if skip_label_indexing is true, got {label:?}")]
    InvalidLabel { label: String },

    /// The prediction list is shorter than an index referenced by the gold list.
    #[error("prediction index {index} out of range ({pred_len} predictions)")]
    Alignment { index: usize, pred_len: usize },

    /// A language code outside `de`, `fr`, `it`.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A test set name that X-Stance does not define.
    #[error("unsupported test set: {0}")]
    UnsupportedTestSet(String),

    /// A record lacks a field the operation needs.
    #[error("record {index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// Gold and predicted label lists of different lengths.
    #[error("{gold_len} gold labels but {pred_len} predictions")]
    LengthMismatch { gold_len: usize, pred_len: usize },

    /// The model returned an empty probability vector.
    #[error("probability vector is empty")]
    EmptyProbabilities,
}
