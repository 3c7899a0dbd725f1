//! The `xstance baseline` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use xstance_fasttext::{
    load_config_from, run_baseline, BaselineOptions, FastTextCli, ScriptTokenizer,
};

pub async fn execute(
    data_dir: PathBuf,
    pred: PathBuf,
    pretrained_vectors: Option<PathBuf>,
    lr: Option<f64>,
    epochs: Option<u32>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let fasttext = config.fasttext;

    if !data_dir.is_dir() {
        anyhow::bail!("data directory not found: {}", data_dir.display());
    }

    let mut options = BaselineOptions::from_config(&fasttext, data_dir, pred);
    if pretrained_vectors.is_some() {
        options.train.pretrained_vectors = pretrained_vectors;
    }
    if let Some(lr) = lr {
        options.train.lr = lr;
    }
    if let Some(epochs) = epochs {
        options.train.epochs = epochs;
    }

    let timeout = Duration::from_secs(fasttext.timeout_secs);
    let classifier = FastTextCli::new(&fasttext.binary).with_timeout(timeout);
    let tokenizer = ScriptTokenizer::new(&fasttext.tokenizer_script).with_timeout(timeout);

    eprintln!(
        "Training fastText on {} (lr={}, epochs={})...",
        options.data_dir.display(),
        options.train.lr,
        options.train.epochs
    );

    let summary = run_baseline(&classifier, &tokenizer, &options).await?;

    println!("Precision: {:.4}", summary.validation.precision);
    println!("Recall:    {:.4}", summary.validation.recall);
    println!("F1:        {:.4}", summary.validation.f1());
    println!(
        "Wrote {} predictions to {} in {}ms",
        summary.predictions,
        summary.pred_path.display(),
        summary.duration_ms
    );

    Ok(())
}
