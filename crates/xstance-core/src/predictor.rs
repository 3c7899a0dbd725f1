//! Predictor: runs a stance model over question/comment pairs.
//!
//! The model itself is an external collaborator behind [`StanceModel`]. The
//! producer decides the shape of its output via [`ModelOutput`]; the predictor
//! only maps that output to a label.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::XStanceError;
use crate::instance::{Instance, LabelValue};
use crate::jsonl::{read_jsonl, write_jsonl};
use crate::model::PredictionRecord;
use crate::reader::XStanceReader;
use crate::vocab::LabelVocabulary;

/// What a model returns for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ModelOutput {
    /// Class probabilities; the predicted index is the argmax.
    Probabilities(Vec<f32>),
    /// A single predicted class index.
    ScalarPrediction(i64),
}

impl ModelOutput {
    /// The predicted class index.
    pub fn predicted_index(&self) -> Result<i64, XStanceError> {
        match self {
            ModelOutput::Probabilities(probs) => argmax(probs)
                .map(|i| i as i64)
                .ok_or(XStanceError::EmptyProbabilities),
            ModelOutput::ScalarPrediction(i) => Ok(*i),
        }
    }
}

/// Index of the first maximum. NaN entries are skipped.
fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// A stance classifier.
pub trait StanceModel {
    fn forward(&self, instance: &Instance) -> Result<ModelOutput>;
}

/// Input line for prediction: a question/comment pair without label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionInput {
    pub question: String,
    pub comment: String,
}

/// Turns question/comment pairs into labeled predictions.
pub struct XStancePredictor<M> {
    reader: XStanceReader,
    model: M,
    vocab: Option<LabelVocabulary>,
}

impl<M: StanceModel> XStancePredictor<M> {
    pub fn new(reader: XStanceReader, model: M) -> Self {
        Self {
            reader,
            model,
            vocab: None,
        }
    }

    /// Resolve predicted indices to category names through `vocab`.
    pub fn with_vocabulary(mut self, vocab: LabelVocabulary) -> Self {
        self.vocab = Some(vocab);
        self
    }

    pub fn json_to_instance(&self, input: &PredictionInput) -> Result<Instance, XStanceError> {
        self.reader
            .text_to_instance(&input.question, &input.comment, None)
    }

    /// Copy `instance` and attach the prediction carried by `output`.
    pub fn predictions_to_labeled_instances(
        &self,
        instance: &Instance,
        output: &ModelOutput,
    ) -> Result<Vec<Instance>, XStanceError> {
        let index = output.predicted_index()?;
        Ok(vec![instance.with_prediction(LabelValue::Index(index))])
    }

    /// Run the model on one input and return its label.
    pub fn predict_json(&self, input: &PredictionInput) -> Result<PredictionRecord> {
        let instance = self.json_to_instance(input)?;
        let output = self.model.forward(&instance)?;
        let index = output.predicted_index()?;
        Ok(PredictionRecord::new(self.label_for(index)))
    }

    /// Predict every line of a JSON-lines file and write `{label}` lines in the same order.
    pub fn predict_file(&self, input: &Path, output: &Path) -> Result<usize> {
        let inputs: Vec<PredictionInput> = read_jsonl(input)?;
        let predictions = inputs
            .iter()
            .enumerate()
            .map(|(i, line)| {
                self.predict_json(line)
                    .with_context(|| format!("prediction failed for line {}", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;
        write_jsonl(output, &predictions)?;
        tracing::info!(
            "wrote {} predictions to {}",
            predictions.len(),
            output.display()
        );
        Ok(predictions.len())
    }

    fn label_for(&self, index: i64) -> String {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.vocab.as_ref()?.label_of(i))
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string())
    }
}
