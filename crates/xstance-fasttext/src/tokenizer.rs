//! Language-specific tokenization through an external script.
//!
//! The script is invoked as `<script> -l <lang> -q`, reading raw lines on stdin
//! and writing tokenized lines on stdout (the Moses `tokenizer.perl` interface).

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tokio::process::Command;

use xstance_core::model::Language;

use crate::format::{language_file, tokenized_file};

/// Runs a tokenizer script over per-language files.
#[derive(Debug, Clone)]
pub struct ScriptTokenizer {
    script: PathBuf,
    timeout: Duration,
}

impl ScriptTokenizer {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            timeout: Duration::from_secs(600),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Tokenize `input` into `output` using the rules for `language`.
    pub async fn tokenize_file(
        &self,
        language: Language,
        input: &Path,
        output: &Path,
    ) -> Result<()> {
        let start = Instant::now();
        let stdin = std::fs::File::open(input)
            .with_context(|| format!("failed to open {}", input.display()))?;
        let stdout = std::fs::File::create(output)
            .with_context(|| format!("failed to create {}", output.display()))?;

        let mut cmd = Command::new(&self.script);
        cmd.arg("-l")
            .arg(language.code())
            .arg("-q")
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // `output()` would replace the file-backed stdout with a pipe.
        let child = cmd
            .spawn()
            .with_context(|| format!("failed to run tokenizer {}", self.script.display()))?;
        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .context("tokenizer timed out")??;

        if !result.status.success() {
            anyhow::bail!(
                "tokenizer exited with {} for {}: {}",
                result.status,
                input.display(),
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }

        tracing::debug!(
            "tokenized {} ({language}) in {}ms",
            input.display(),
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Tokenize `output.<lang>` into `output.tokenized.<lang>` for every language.
    pub async fn tokenize_languages(&self, output: &Path) -> Result<()> {
        let inputs: Vec<(Language, PathBuf, PathBuf)> = Language::ALL
            .iter()
            .map(|&l| (l, language_file(output, l), tokenized_file(output, l)))
            .collect();

        try_join_all(inputs.iter().map(|(language, input, tokenized)| {
            self.tokenize_file(*language, input, tokenized)
        }))
        .await?;
        Ok(())
    }
}
