//! Conversion between X-Stance JSON lines and fastText text files.
//!
//! A dataset `D` is split into `D.de`, `D.fr` and `D.it`, each tokenized into
//! `D.tokenized.<lang>`, and merged back into `D` in the original record order.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use xstance_core::error::XStanceError;
use xstance_core::jsonl::{read_jsonl, write_jsonl};
use xstance_core::model::{Language, PredictionRecord, Record};

/// Prefix fastText uses to tell labels from words.
pub const LABEL_PREFIX: &str = "__label__";

/// What the tokenizer makes of [`LABEL_PREFIX`].
const TOKENIZED_LABEL_PREFIX: &str = "_ _ label _ _ ";

/// `output.<lang>`: untokenized lines for one language.
pub fn language_file(output: &Path, language: Language) -> PathBuf {
    with_suffix(output, &format!(".{language}"))
}

/// `output.tokenized.<lang>`: tokenizer output for one language.
pub fn tokenized_file(output: &Path, language: Language) -> PathBuf {
    with_suffix(output, &format!(".tokenized.{language}"))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Render one record as `__label__{label} {question} {comment}` on a single line.
pub fn format_line(record: &Record, index: usize) -> Result<String, XStanceError> {
    let label = record.label.as_ref().ok_or(XStanceError::MissingField {
        index,
        field: "label",
    })?;
    let text = format!("{} {}", record.question, record.comment).replace('\n', " ");
    Ok(format!("{LABEL_PREFIX}{label} {text}"))
}

/// Write each record of `input` to the file of its language.
///
/// Returns the language of every record in input order, needed by
/// [`merge_languages`].
pub fn split_by_language(input: &Path, output: &Path) -> Result<Vec<Language>> {
    let records: Vec<Record> = read_jsonl(input)?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writers = BTreeMap::new();
    for language in Language::ALL {
        let path = language_file(output, language);
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writers.insert(language, BufWriter::new(file));
    }

    let mut order = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let language = record.language(i)?;
        let line = format_line(record, i)?;
        if let Some(writer) = writers.get_mut(&language) {
            writeln!(writer, "{line}")?;
        }
        order.push(language);
    }

    for writer in writers.values_mut() {
        writer.flush()?;
    }

    tracing::debug!(
        "split {} records from {} by language",
        order.len(),
        input.display()
    );
    Ok(order)
}

/// Interleave the tokenized language files back into `output`, following `order`.
pub fn merge_languages(output: &Path, order: &[Language]) -> Result<usize> {
    let mut readers: BTreeMap<Language, Lines<BufReader<File>>> = BTreeMap::new();
    for language in Language::ALL {
        let path = tokenized_file(output, language);
        let file =
            File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
        readers.insert(language, BufReader::new(file).lines());
    }

    let file =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);

    for language in order {
        let line = readers
            .get_mut(language)
            .and_then(|lines| lines.next())
            .with_context(|| format!("tokenized {language} file ended early"))??;
        writeln!(writer, "{}", repair_label_prefix(&line))?;
    }
    writer.flush()?;

    Ok(order.len())
}

fn repair_label_prefix(line: &str) -> String {
    line.replace(TOKENIZED_LABEL_PREFIX, LABEL_PREFIX)
}

/// Copy a fastText dataset without its leading label token, skipping blank lines.
pub fn prepare_prediction_input(dataset: &Path, output: &Path) -> Result<usize> {
    let file =
        File::open(dataset).with_context(|| format!("failed to open {}", dataset.display()))?;
    let out =
        File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(out);

    let mut count = 0;
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let text: Vec<&str> = line.split_whitespace().skip(1).collect();
        writeln!(writer, "{}", text.join(" "))?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Remove the fastText label prefix from a predicted label.
pub fn strip_label_prefix(label: &str) -> &str {
    label.strip_prefix(LABEL_PREFIX).unwrap_or(label)
}

/// Write fastText labels as `{"label": ...}` lines.
pub fn write_predictions(labels: &[String], output: &Path) -> Result<()> {
    let records: Vec<PredictionRecord> = labels
        .iter()
        .map(|l| PredictionRecord::new(strip_label_prefix(l.trim())))
        .collect();
    write_jsonl(output, &records)
}
