//! fastText training, testing and prediction.
//!
//! [`TextClassifier`] is the seam between the pipeline and the classifier;
//! [`FastTextCli`] implements it by shelling out to the `fasttext` binary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

/// Hyperparameters for supervised training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    #[serde(default = "default_dim")]
    pub dim: u32,
    #[serde(default = "default_lr")]
    pub lr: f64,
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    #[serde(default = "default_word_ngrams")]
    pub word_ngrams: u32,
    /// Pre-trained word vectors in `.vec` format.
    #[serde(default)]
    pub pretrained_vectors: Option<PathBuf>,
}

fn default_dim() -> u32 {
    300
}
fn default_lr() -> f64 {
    0.1
}
fn default_epochs() -> u32 {
    5
}
fn default_word_ngrams() -> u32 {
    3
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            dim: default_dim(),
            lr: default_lr(),
            epochs: default_epochs(),
            word_ngrams: default_word_ngrams(),
            pretrained_vectors: None,
        }
    }
}

/// Precision and recall at one, as reported by `fasttext test`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestScores {
    pub samples: usize,
    pub precision: f64,
    pub recall: f64,
}

impl TestScores {
    /// Harmonic mean of precision and recall; zero when both are zero.
    pub fn f1(&self) -> f64 {
        let denom = self.precision + self.recall;
        if denom == 0.0 {
            return 0.0;
        }
        2.0 * self.precision * self.recall / denom
    }
}

/// A supervised text classifier driven through files.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Train on a `__label__` dataset and save the model to `model_path`.
    async fn train(&self, dataset: &Path, model_path: &Path, params: &TrainParams) -> Result<()>;

    /// Score a labeled dataset.
    async fn test(&self, model_path: &Path, dataset: &Path) -> Result<TestScores>;

    /// Predict one label per line of an unlabeled dataset, in order.
    async fn predict(&self, model_path: &Path, dataset: &Path) -> Result<Vec<String>>;
}

/// [`TextClassifier`] backed by the `fasttext` command-line tool.
#[derive(Debug, Clone)]
pub struct FastTextCli {
    binary: PathBuf,
    timeout: Duration,
}

impl FastTextCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: Duration::from_secs(3600),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, args: Vec<OsString>) -> Result<Output> {
        let start = Instant::now();
        let subcommand = args
            .first()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .with_context(|| format!("fasttext {subcommand} timed out"))?
            .with_context(|| format!("failed to run {}", self.binary.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "fasttext {subcommand} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        tracing::debug!(
            "fasttext {subcommand} finished in {}ms",
            start.elapsed().as_millis()
        );
        Ok(output)
    }
}

/// fastText appends `.bin` to the `-output` prefix.
fn output_prefix(model_path: &Path) -> PathBuf {
    if model_path.extension().is_some_and(|e| e == "bin") {
        model_path.with_extension("")
    } else {
        model_path.to_path_buf()
    }
}

fn train_args(dataset: &Path, model_path: &Path, params: &TrainParams) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "supervised".into(),
        "-input".into(),
        dataset.into(),
        "-output".into(),
        output_prefix(model_path).into(),
        "-dim".into(),
        params.dim.to_string().into(),
        "-lr".into(),
        params.lr.to_string().into(),
        "-epoch".into(),
        params.epochs.to_string().into(),
        "-wordNgrams".into(),
        params.word_ngrams.to_string().into(),
    ];
    if let Some(vectors) = &params.pretrained_vectors {
        args.push("-pretrainedVectors".into());
        args.push(vectors.into());
    }
    args
}

/// Parse `N`, `P@1` and `R@1` lines from `fasttext test` output.
pub fn parse_test_output(output: &str) -> Result<TestScores> {
    let mut samples = None;
    let mut precision = None;
    let mut recall = None;

    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        match key {
            "N" => samples = value.parse().ok(),
            "P@1" => precision = value.parse().ok(),
            "R@1" => recall = value.parse().ok(),
            _ => {}
        }
    }

    Ok(TestScores {
        samples: samples.context("missing N in fasttext test output")?,
        precision: precision.context("missing P@1 in fasttext test output")?,
        recall: recall.context("missing R@1 in fasttext test output")?,
    })
}

/// One predicted label per output line.
pub fn parse_predict_output(output: &str) -> Vec<String> {
    output.lines().map(|l| l.trim().to_string()).collect()
}

#[async_trait]
impl TextClassifier for FastTextCli {
    async fn train(&self, dataset: &Path, model_path: &Path, params: &TrainParams) -> Result<()> {
        tracing::info!(
            "training fastText on {} (dim={}, lr={}, epochs={}, wordNgrams={})",
            dataset.display(),
            params.dim,
            params.lr,
            params.epochs,
            params.word_ngrams
        );
        self.run(train_args(dataset, model_path, params)).await?;
        Ok(())
    }

    async fn test(&self, model_path: &Path, dataset: &Path) -> Result<TestScores> {
        let output = self
            .run(vec!["test".into(), model_path.into(), dataset.into()])
            .await?;
        parse_test_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn predict(&self, model_path: &Path, dataset: &Path) -> Result<Vec<String>> {
        let output = self
            .run(vec!["predict".into(), model_path.into(), dataset.into()])
            .await?;
        Ok(parse_predict_output(&String::from_utf8_lossy(&output.stdout)))
    }
}
