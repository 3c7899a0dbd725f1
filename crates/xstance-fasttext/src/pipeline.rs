//! End-to-end fastText baseline: convert, train, validate, predict.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backend::{TestScores, TextClassifier, TrainParams};
use crate::config::FastTextConfig;
use crate::format::{
    merge_languages, prepare_prediction_input, split_by_language, write_predictions,
};
use crate::tokenizer::ScriptTokenizer;

/// Dataset splits expected in the data directory as `<split>.jsonl`.
pub const SPLITS: [&str; 3] = ["train", "valid", "test"];

/// Inputs and outputs of one baseline run.
#[derive(Debug, Clone)]
pub struct BaselineOptions {
    /// Directory holding `train.jsonl`, `valid.jsonl` and `test.jsonl`.
    pub data_dir: PathBuf,
    pub processed_data_dir: PathBuf,
    pub model_path: PathBuf,
    /// Destination of the `{"label": ...}` predictions for the test split.
    pub pred_path: PathBuf,
    pub train: TrainParams,
}

impl BaselineOptions {
    pub fn from_config(
        config: &FastTextConfig,
        data_dir: impl Into<PathBuf>,
        pred_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            processed_data_dir: config.processed_data_dir.clone(),
            model_path: config.model_path.clone(),
            pred_path: pred_path.into(),
            train: config.train.clone(),
        }
    }

    fn jsonl(&self, split: &str) -> PathBuf {
        self.data_dir.join(format!("{split}.jsonl"))
    }

    fn processed(&self, split: &str) -> PathBuf {
        self.processed_data_dir.join(format!("{split}.txt"))
    }
}

/// What a baseline run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub validation: TestScores,
    pub predictions: usize,
    pub model_path: PathBuf,
    pub pred_path: PathBuf,
    pub duration_ms: u64,
}

/// Split a JSONL dataset by language, tokenize each part and merge it back.
///
/// Returns the number of lines in the merged `output`.
pub async fn convert_dataset(
    tokenizer: &ScriptTokenizer,
    input: &Path,
    output: &Path,
) -> Result<usize> {
    let order = split_by_language(input, output)
        .with_context(|| format!("failed to convert {}", input.display()))?;
    tokenizer.tokenize_languages(output).await?;
    let lines = merge_languages(output, &order)?;
    tracing::info!("converted {} -> {} ({lines} lines)", input.display(), output.display());
    Ok(lines)
}

/// Run the full baseline and write predictions for the test split.
pub async fn run_baseline(
    classifier: &dyn TextClassifier,
    tokenizer: &ScriptTokenizer,
    options: &BaselineOptions,
) -> Result<BaselineSummary> {
    let start = Instant::now();

    for split in SPLITS {
        convert_dataset(tokenizer, &options.jsonl(split), &options.processed(split)).await?;
    }

    if let Some(parent) = options.model_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    classifier
        .train(&options.processed("train"), &options.model_path, &options.train)
        .await
        .context("training failed")?;

    let validation = classifier
        .test(&options.model_path, &options.processed("valid"))
        .await
        .context("validation failed")?;
    tracing::info!(
        "validation on {} samples: precision={:.4} recall={:.4} f1={:.4}",
        validation.samples,
        validation.precision,
        validation.recall,
        validation.f1()
    );

    let predict_input = options.processed_data_dir.join("test.predict.txt");
    let expected = prepare_prediction_input(&options.processed("test"), &predict_input)?;
    let labels = classifier
        .predict(&options.model_path, &predict_input)
        .await
        .context("prediction failed")?;
    if labels.len() != expected {
        anyhow::bail!(
            "fasttext returned {} predictions for {} test lines",
            labels.len(),
            expected
        );
    }
    write_predictions(&labels, &options.pred_path)?;
    tracing::info!(
        "wrote {} predictions to {}",
        labels.len(),
        options.pred_path.display()
    );

    Ok(BaselineSummary {
        validation,
        predictions: labels.len(),
        model_path: options.model_path.clone(),
        pred_path: options.pred_path.clone(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Mutex;

    /// Records every call and predicts FAVOR for lines mentioning "ja".
    #[derive(Default)]
    struct MockClassifier {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextClassifier for MockClassifier {
        async fn train(
            &self,
            dataset: &Path,
            model_path: &Path,
            _params: &TrainParams,
        ) -> Result<()> {
            let content = std::fs::read_to_string(dataset)?;
            assert!(content.lines().all(|l| l.starts_with("__label__")));
            std::fs::write(model_path, "model")?;
            self.calls.lock().unwrap().push("train".into());
            Ok(())
        }

        async fn test(&self, _model_path: &Path, _dataset: &Path) -> Result<TestScores> {
            self.calls.lock().unwrap().push("test".into());
            Ok(TestScores {
                samples: 2,
                precision: 0.5,
                recall: 0.5,
            })
        }

        async fn predict(&self, _model_path: &Path, dataset: &Path) -> Result<Vec<String>> {
            self.calls.lock().unwrap().push("predict".into());
            let content = std::fs::read_to_string(dataset)?;
            Ok(content
                .lines()
                .map(|l| {
                    if l.contains("ja") {
                        "__label__FAVOR".to_string()
                    } else {
                        "__label__AGAINST".to_string()
                    }
                })
                .collect())
        }
    }

    const SPLIT: &str = r#"{"question": "Q1", "comment": "ja klar", "label": "FAVOR", "language": "de"}
{"question": "Q2", "comment": "non", "label": "AGAINST", "language": "fr"}
{"question": "Q3", "comment": "ja certo", "label": "FAVOR", "language": "it"}
"#;

    fn identity_tokenizer(dir: &Path) -> ScriptTokenizer {
        let path = dir.join("tok.sh");
        std::fs::write(&path, "#!/bin/sh\ncat\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        ScriptTokenizer::new(path)
    }

    fn options(dir: &Path) -> BaselineOptions {
        let data_dir = dir.join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        for split in SPLITS {
            std::fs::write(data_dir.join(format!("{split}.jsonl")), SPLIT).unwrap();
        }
        BaselineOptions {
            data_dir,
            processed_data_dir: dir.join("processed"),
            model_path: dir.join("models").join("model.bin"),
            pred_path: dir.join("pred.jsonl"),
            train: TrainParams::default(),
        }
    }

    #[tokio::test]
    async fn baseline_runs_every_stage_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let tokenizer = identity_tokenizer(dir.path());
        let options = options(dir.path());
        let classifier = MockClassifier::default();

        let summary = run_baseline(&classifier, &tokenizer, &options).await.unwrap();
        assert_eq!(summary.predictions, 3);
        assert_eq!(summary.validation.f1(), 0.5);
        assert_eq!(*classifier.calls.lock().unwrap(), vec!["train", "test", "predict"]);

        let merged =
            std::fs::read_to_string(dir.path().join("processed").join("test.txt")).unwrap();
        assert_eq!(
            merged,
            "__label__FAVOR Q1 ja klar\n__label__AGAINST Q2 non\n__label__FAVOR Q3 ja certo\n"
        );

        let predictions = std::fs::read_to_string(&options.pred_path).unwrap();
        assert_eq!(
            predictions,
            "{\"label\":\"FAVOR\"}\n{\"label\":\"AGAINST\"}\n{\"label\":\"FAVOR\"}\n"
        );
    }

    #[tokio::test]
    async fn missing_split_fails_before_training() {
        let dir = tempfile::tempdir().unwrap();
        let tokenizer = identity_tokenizer(dir.path());
        let options = options(dir.path());
        std::fs::remove_file(options.data_dir.join("valid.jsonl")).unwrap();
        let classifier = MockClassifier::default();

        let err = run_baseline(&classifier, &tokenizer, &options).await.unwrap_err();
        assert!(format!("{err:#}").contains("valid.jsonl"));
        assert!(classifier.calls.lock().unwrap().is_empty());
    }
}
