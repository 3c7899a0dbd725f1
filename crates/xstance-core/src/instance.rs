//! Model-ready instances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::Token;

/// A label attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    /// Raw integer index, used when label indexing is skipped.
    Index(i64),
    /// Category name, indexed later by a label vocabulary.
    Category(String),
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Index(i) => write!(f, "{i}"),
            LabelValue::Category(s) => f.write_str(s),
        }
    }
}

/// A tokenized, length-bounded question/comment pair with an optional label.
///
/// Instances are built fresh per record by the reader and never mutated; the
/// predictor attaches a `prediction` to a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub tokens: Vec<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<LabelValue>,
}

impl Instance {
    pub fn new(tokens: Vec<Token>, label: Option<LabelValue>) -> Self {
        Self {
            tokens,
            label,
            prediction: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Return a copy of this instance carrying `prediction`.
    pub fn with_prediction(&self, prediction: LabelValue) -> Self {
        Self {
            prediction: Some(prediction),
            ..self.clone()
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance with {} tokens: [", self.tokens.len())?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{token}")?;
        }
        f.write_str("]")?;
        if let Some(label) = &self.label {
            write!(f, " label={label}")?;
        }
        if let Some(prediction) = &self.prediction {
            write!(f, " prediction={prediction}")?;
        }
        Ok(())
    }
}
