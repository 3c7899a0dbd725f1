//! Label vocabulary: category names to integer indices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::instance::{Instance, LabelValue};

/// Symbol table for category labels, indexed in first-seen order.
///
/// Serialized as the plain label list; the lookup table is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelVocabulary {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl From<Vec<String>> for LabelVocabulary {
    fn from(labels: Vec<String>) -> Self {
        let mut vocab = Self::new();
        for label in &labels {
            vocab.add(label);
        }
        vocab
    }
}

impl From<LabelVocabulary> for Vec<String> {
    fn from(vocab: LabelVocabulary) -> Self {
        vocab.labels
    }
}

impl LabelVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every category label from `instances`. Integer labels are ignored.
    pub fn from_instances<'a>(instances: impl IntoIterator<Item = &'a Instance>) -> Self {
        let mut vocab = Self::new();
        for instance in instances {
            if let Some(LabelValue::Category(label)) = &instance.label {
                vocab.add(label);
            }
        }
        vocab
    }

    /// Insert `label` if unseen and return its index.
    pub fn add(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), i);
        i
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label_of(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
