//! xstance-core — Dataset reader, predictor, and segmented evaluation.
//!
//! This crate defines the X-Stance data model and the two pieces with a
//! precise contract: building length-bounded instances from question/comment
//! pairs, and scoring predictions with macro-F1 per test set and language.

pub mod error;
pub mod evaluate;
pub mod instance;
pub mod jsonl;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod reader;
pub mod tokenizer;
pub mod vocab;

pub use error::XStanceError;
pub use evaluate::{evaluate, EvaluationReport, PartitionScore};
pub use instance::{Instance, LabelValue};
pub use model::{Language, PredictionRecord, RawLabel, Record, TestSet};
pub use predictor::{ModelOutput, StanceModel, XStancePredictor};
pub use reader::{ReaderConfig, TokenizerKind, XStanceReader};
pub use tokenizer::{SegmentTokenizer, Token, Tokenizer, WordTokenizer};
pub use vocab::LabelVocabulary;
