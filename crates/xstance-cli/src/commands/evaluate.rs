//! The `xstance evaluate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use xstance_core::evaluate::{evaluate, EvaluationReport};
use xstance_core::jsonl::read_jsonl;
use xstance_core::model::{PredictionRecord, Record};

pub fn execute(
    gold_path: PathBuf,
    pred_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let gold: Vec<Record> = read_jsonl(&gold_path)?;
    let pred: Vec<PredictionRecord> = read_jsonl(&pred_path)?;
    tracing::debug!(
        "loaded {} gold records and {} predictions",
        gold.len(),
        pred.len()
    );

    let partitions = evaluate(&gold, &pred).with_context(|| {
        format!(
            "failed to evaluate {} against {}",
            pred_path.display(),
            gold_path.display()
        )
    })?;
    let report = EvaluationReport::new(partitions);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print!("{}", report.to_text(verbose));
            print_summary(&report);
        }
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &EvaluationReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Test set", "Language", "Macro-F1", "Support"]);

    for p in &report.partitions {
        table.add_row(vec![
            Cell::new(p.test_set),
            Cell::new(p.language.code().to_uppercase()),
            Cell::new(format!("{:.2}", p.score)),
            Cell::new(p.support),
        ]);
    }

    eprintln!("\n{table}");
}
