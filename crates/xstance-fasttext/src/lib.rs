//! xstance-fasttext — fastText baseline for X-Stance.
//!
//! Converts the JSON-lines dataset into fastText's `__label__` format with
//! language-specific tokenization, then trains, tests and predicts through the
//! `fasttext` command-line tool.

pub mod backend;
pub mod config;
pub mod format;
pub mod pipeline;
pub mod tokenizer;

pub use backend::{FastTextCli, TestScores, TextClassifier, TrainParams};
pub use config::{load_config, load_config_from, FastTextConfig, XStanceConfig};
pub use pipeline::{run_baseline, BaselineOptions, BaselineSummary};
pub use tokenizer::ScriptTokenizer;
