//! Configuration loading for the reader and the fastText baseline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use xstance_core::reader::ReaderConfig;

use crate::backend::TrainParams;

/// Settings for the fastText baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastTextConfig {
    /// `fasttext` executable.
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Moses-compatible tokenizer script.
    #[serde(default = "default_tokenizer_script")]
    pub tokenizer_script: PathBuf,
    /// Where converted `train.txt`, `valid.txt` and `test.txt` are written.
    #[serde(default = "default_processed_data_dir")]
    pub processed_data_dir: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Timeout for each subprocess, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub train: TrainParams,
}

fn default_binary() -> PathBuf {
    PathBuf::from("fasttext")
}
fn default_tokenizer_script() -> PathBuf {
    PathBuf::from("./tools/tokenizer.perl")
}
fn default_processed_data_dir() -> PathBuf {
    PathBuf::from("processed_data")
}
fn default_model_path() -> PathBuf {
    PathBuf::from("model.bin")
}
fn default_timeout_secs() -> u64 {
    3600
}

impl Default for FastTextConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            tokenizer_script: default_tokenizer_script(),
            processed_data_dir: default_processed_data_dir(),
            model_path: default_model_path(),
            timeout_secs: default_timeout_secs(),
            train: TrainParams::default(),
        }
    }
}

impl FastTextConfig {
    fn resolve_paths(&mut self) {
        self.binary = resolve_path(&self.binary);
        self.tokenizer_script = resolve_path(&self.tokenizer_script);
        self.processed_data_dir = resolve_path(&self.processed_data_dir);
        self.model_path = resolve_path(&self.model_path);
        self.train.pretrained_vectors = self.train.pretrained_vectors.as_deref().map(resolve_path);
    }
}

/// Top-level `xstance.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XStanceConfig {
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(default)]
    pub fasttext: FastTextConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + end]).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `xstance.toml` in the current directory
/// 2. `~/.config/xstance/config.toml`
///
/// Environment variable overrides: `XSTANCE_FASTTEXT_BIN`, `XSTANCE_TOKENIZER_SCRIPT`.
pub fn load_config() -> Result<XStanceConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<XStanceConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("xstance.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<XStanceConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => XStanceConfig::default(),
    };

    if let Ok(bin) = std::env::var("XSTANCE_FASTTEXT_BIN") {
        config.fasttext.binary = PathBuf::from(bin);
    }
    if let Ok(script) = std::env::var("XSTANCE_TOKENIZER_SCRIPT") {
        config.fasttext.tokenizer_script = PathBuf::from(script);
    }

    config.fasttext.resolve_paths();

    match &config_path {
        Some(path) => tracing::debug!("loaded config from {}", path.display()),
        None => tracing::debug!("no config file found, using defaults"),
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("xstance"))
}
