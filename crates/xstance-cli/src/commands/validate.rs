//! The `xstance validate` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use xstance_core::jsonl::read_jsonl;
use xstance_core::model::Record;

pub fn execute(input: PathBuf) -> Result<()> {
    let records: Vec<Record> = read_jsonl(&input)?;

    let mut languages = BTreeMap::new();
    let mut test_sets = BTreeMap::new();
    let mut labels = BTreeMap::new();
    let mut unlabeled = 0;

    for (i, record) in records.iter().enumerate() {
        let language = record
            .language(i)
            .with_context(|| format!("invalid record in {}", input.display()))?;
        *languages.entry(language).or_insert(0usize) += 1;

        if record.test_set.is_some() {
            let test_set = record
                .test_set(i)
                .with_context(|| format!("invalid record in {}", input.display()))?;
            *test_sets.entry(test_set.name()).or_insert(0usize) += 1;
        }

        match &record.label {
            Some(label) => *labels.entry(label.to_string()).or_insert(0usize) += 1,
            None => unlabeled += 1,
        }
    }

    println!("{}: {} records", input.display(), records.len());

    println!("\nLanguages:");
    for (language, count) in &languages {
        println!("  {}: {count}", language.code());
    }
    if !test_sets.is_empty() {
        println!("\nTest sets:");
        for (name, count) in &test_sets {
            println!("  {name}: {count}");
        }
    }
    if !labels.is_empty() {
        println!("\nLabels:");
        for (label, count) in &labels {
            println!("  {label}: {count}");
        }
    }

    if unlabeled > 0 {
        println!("\nWARNING: {unlabeled} record(s) without a label.");
    } else {
        println!("\nDataset valid.");
    }

    Ok(())
}
