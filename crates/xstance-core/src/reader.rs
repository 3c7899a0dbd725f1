//! Dataset reader: question/comment records to model-ready instances.
//!
//! The reader tokenizes both sides of a record, drops the comment's leading
//! segment marker, truncates the question so the pair fits the configured
//! sequence length, and attaches the label either as a raw integer index or as
//! a category name for a label vocabulary.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::XStanceError;
use crate::instance::{Instance, LabelValue};
use crate::jsonl::read_jsonl;
use crate::model::{RawLabel, Record};
use crate::tokenizer::{SegmentTokenizer, Token, Tokenizer, WordTokenizer};

/// Slots reserved for the two structural tokens the indexer adds around the pair.
const RESERVED_SPECIAL_TOKENS: usize = 2;

/// Number of leading instances logged at debug level by [`XStanceReader::read`].
const LOGGED_INSTANCES: usize = 4;

/// Which tokenizer the reader builds from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Plain word tokenizer, no segment markers.
    Word,
    /// Word tokenizer wrapped in `[CLS]` ... `[SEP]`.
    #[default]
    Segment,
}

/// Reader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    #[serde(default)]
    pub tokenizer: TokenizerKind,
    /// Upper bound on question + comment tokens, minus two reserved slots.
    #[serde(default)]
    pub max_sequence_length: Option<usize>,
    /// Labels are integer indices already; do not build a label vocabulary.
    #[serde(default)]
    pub skip_label_indexing: bool,
    #[serde(default)]
    pub ignore_questions: bool,
    #[serde(default)]
    pub ignore_comments: bool,
    /// Drop the first comment token. Assumes the tokenizer emits a leading
    /// segment marker; with a marker-free tokenizer this loses a real word.
    #[serde(default = "default_true")]
    pub strip_comment_marker: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerKind::default(),
            max_sequence_length: None,
            skip_label_indexing: false,
            ignore_questions: false,
            ignore_comments: false,
            strip_comment_marker: true,
        }
    }
}

/// Converts X-Stance records into [`Instance`]s.
pub struct XStanceReader {
    tokenizer: Box<dyn Tokenizer>,
    config: ReaderConfig,
}

impl fmt::Debug for XStanceReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XStanceReader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl XStanceReader {
    /// Create a reader around an explicit tokenizer.
    pub fn new(tokenizer: Box<dyn Tokenizer>, config: ReaderConfig) -> Self {
        Self { tokenizer, config }
    }

    /// Build the reader and its tokenizer from configuration alone.
    pub fn from_config(config: ReaderConfig) -> Self {
        let tokenizer: Box<dyn Tokenizer> = match config.tokenizer {
            TokenizerKind::Word => {
                if config.strip_comment_marker && !config.ignore_comments {
                    tracing::warn!(
                        "word tokenizer emits no segment marker; the first word of every comment will be dropped"
                    );
                }
                Box::new(WordTokenizer)
            }
            TokenizerKind::Segment => Box::new(SegmentTokenizer::new(WordTokenizer)),
        };
        Self::new(tokenizer, config)
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Build one instance from a question, a comment and an optional label.
    pub fn text_to_instance(
        &self,
        question: &str,
        comment: &str,
        label: Option<&RawLabel>,
    ) -> Result<Instance, XStanceError> {
        let mut question_tokens = if self.config.ignore_questions {
            Vec::new()
        } else {
            self.tokenizer.tokenize(question)
        };

        let comment_tokens = if self.config.ignore_comments {
            Vec::new()
        } else {
            let mut tokens = self.tokenizer.tokenize(comment);
            if self.config.strip_comment_marker && !tokens.is_empty() {
                tokens.remove(0);
            }
            tokens
        };

        if let Some(max_len) = self.config.max_sequence_length {
            let budget = question_budget(max_len, comment_tokens.len());
            question_tokens.truncate(budget);
        }

        let mut tokens: Vec<Token> = question_tokens;
        tokens.extend(comment_tokens);

        let label = label.map(|l| self.convert_label(l)).transpose()?;
        Ok(Instance::new(tokens, label))
    }

    /// Build an instance from a decoded record.
    pub fn record_to_instance(&self, record: &Record) -> Result<Instance, XStanceError> {
        self.text_to_instance(&record.question, &record.comment, record.label.as_ref())
    }

    /// Build instances for all records, stopping at the first failure.
    pub fn records_to_instances(&self, records: &[Record]) -> Result<Vec<Instance>, XStanceError> {
        let mut instances = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let instance = self.record_to_instance(record)?;
            if i < LOGGED_INSTANCES {
                tracing::debug!("{instance}");
            }
            instances.push(instance);
        }
        Ok(instances)
    }

    /// Read a JSON-lines file and build one instance per record, in file order.
    pub fn read(&self, path: &Path) -> Result<Vec<Instance>> {
        let records: Vec<Record> = read_jsonl(path)?;
        let instances = self
            .records_to_instances(&records)
            .with_context(|| format!("failed to build instances from {}", path.display()))?;
        tracing::info!(
            "read {} instances from {}",
            instances.len(),
            path.display()
        );
        Ok(instances)
    }

    fn convert_label(&self, label: &RawLabel) -> Result<LabelValue, XStanceError> {
        if !self.config.skip_label_indexing {
            return Ok(LabelValue::Category(label.to_string()));
        }
        match label {
            RawLabel::Integer(i) => Ok(LabelValue::Index(*i)),
            RawLabel::Text(s) => {
                s.trim()
                    .parse::<i64>()
                    .map(LabelValue::Index)
                    .map_err(|_| XStanceError::InvalidLabel { label: s.clone() })
            }
        }
    }
}

/// Question tokens allowed once the comment and the reserved slots are placed.
/// A non-positive remainder leaves no room for the question at all.
fn question_budget(max_sequence_length: usize, comment_len: usize) -> usize {
    max_sequence_length
        .saturating_sub(comment_len)
        .saturating_sub(RESERVED_SPECIAL_TOKENS)
}
