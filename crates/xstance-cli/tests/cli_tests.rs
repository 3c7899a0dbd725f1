//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn xstance() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("xstance").unwrap()
}

const GOLD: &str = r#"{"id": 1, "question": "Q", "comment": "c", "label": "FAVOR", "language": "de", "test_set": "new_comments_defr"}
{"id": 2, "question": "Q", "comment": "c", "label": "AGAINST", "language": "de", "test_set": "new_comments_defr"}
{"id": 3, "question": "Q", "comment": "c", "label": "FAVOR", "language": "fr", "test_set": "new_questions_defr"}
{"id": 4, "question": "Q", "comment": "c", "label": "AGAINST", "language": "it", "test_set": "new_comments_it"}
"#;

const PRED: &str = r#"{"label": "FAVOR"}
{"label": "AGAINST"}
{"label": "AGAINST"}
{"label": "AGAINST"}
"#;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn evaluate_text_output() {
    let dir = TempDir::new().unwrap();
    let gold = write(dir.path(), "gold.jsonl", GOLD);
    let pred = write(dir.path(), "pred.jsonl", PRED);

    xstance()
        .current_dir(dir.path())
        .args(["evaluate", "--gold", &gold, "--pred", &pred])
        .assert()
        .success()
        .stdout(predicate::str::contains("new_comments_defr\nDE 100.00\n"))
        .stdout(predicate::str::contains("new_questions_defr\nFR 0.00\n"))
        .stdout(predicate::str::contains("new_comments_it\nIT 100.00\n"))
        .stdout(predicate::str::contains("new_topics_defr\n\n"));
}

#[test]
fn evaluate_verbose_shows_per_label_metrics() {
    let dir = TempDir::new().unwrap();
    let gold = write(dir.path(), "gold.jsonl", GOLD);
    let pred = write(dir.path(), "pred.jsonl", PRED);

    xstance()
        .current_dir(dir.path())
        .args(["evaluate", "--gold", &gold, "--pred", &pred, "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FAVOR: P=1.0000 R=1.0000"));
}

#[test]
fn evaluate_json_and_saved_report() {
    let dir = TempDir::new().unwrap();
    let gold = write(dir.path(), "gold.jsonl", GOLD);
    let pred = write(dir.path(), "pred.jsonl", PRED);
    let report_path = dir.path().join("reports").join("report.json");

    let output = xstance()
        .current_dir(dir.path())
        .args(["evaluate", "--gold", &gold, "--pred", &pred, "--format", "json"])
        .arg("--output")
        .arg(&report_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let partitions = report["partitions"].as_array().unwrap();
    assert_eq!(partitions.len(), 3);
    assert_eq!(partitions[0]["test_set"], "new_comments_defr");
    assert_eq!(partitions[0]["language"], "de");
    assert_eq!(partitions[0]["support"], 2);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(saved["partitions"].as_array().unwrap().len(), 3);
}

#[test]
fn evaluate_markdown_output() {
    let dir = TempDir::new().unwrap();
    let gold = write(dir.path(), "gold.jsonl", GOLD);
    let pred = write(dir.path(), "pred.jsonl", PRED);

    xstance()
        .current_dir(dir.path())
        .args(["evaluate", "--gold", &gold, "--pred", &pred, "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| new_comments_defr | DE | 100.00 | 2 |"));
}

#[test]
fn evaluate_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let gold = write(dir.path(), "gold.jsonl", GOLD);
    let pred = write(dir.path(), "pred.jsonl", PRED);

    xstance()
        .current_dir(dir.path())
        .args(["evaluate", "--gold", &gold, "--pred", &pred, "--format", "html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'html'"));
}

#[test]
fn evaluate_short_predictions_fail() {
    let dir = TempDir::new().unwrap();
    let gold = write(dir.path(), "gold.jsonl", GOLD);
    let pred = write(dir.path(), "pred.jsonl", "{\"label\": \"FAVOR\"}\n");

    xstance()
        .current_dir(dir.path())
        .args(["evaluate", "--gold", &gold, "--pred", &pred])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn evaluate_unknown_language_fails() {
    let dir = TempDir::new().unwrap();
    let gold = write(
        dir.path(),
        "gold.jsonl",
        r#"{"label": "FAVOR", "language": "en", "test_set": "new_comments_defr"}"#,
    );
    let pred = write(dir.path(), "pred.jsonl", "{\"label\": \"FAVOR\"}\n");

    xstance()
        .current_dir(dir.path())
        .args(["evaluate", "--gold", &gold, "--pred", &pred])
        .assert()
        .failure()
        .stderr(predicate::str::contains("en"));
}

#[test]
fn instances_prints_json_lines() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "train.jsonl",
        r#"{"question": "Soll es?", "comment": "Ja, klar.", "label": "FAVOR", "language": "de"}"#,
    );

    xstance()
        .current_dir(dir.path())
        .args(["instances", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"tokens":["[CLS]","Soll","es","?","[SEP]","Ja",",","klar",".","[SEP]"],"label":"FAVOR"}"#,
        ));
}

#[test]
fn instances_truncates_question_first() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "train.jsonl",
        r#"{"question": "Soll es?", "comment": "Ja, klar.", "label": "1"}"#,
    );

    xstance()
        .current_dir(dir.path())
        .args([
            "instances",
            "--input",
            &input,
            "--max-sequence-length",
            "6",
            "--skip-label-indexing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"tokens":["Ja",",","klar",".","[SEP]"],"label":1}"#,
        ));
}

#[test]
fn instances_rejects_non_integer_label() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "train.jsonl",
        r#"{"question": "q", "comment": "c", "label": "FAVOR"}"#,
    );

    xstance()
        .current_dir(dir.path())
        .args(["instances", "--input", &input, "--skip-label-indexing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FAVOR"));
}

#[test]
fn validate_counts_records() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "test.jsonl", GOLD);

    xstance()
        .current_dir(dir.path())
        .args(["validate", "--input", &input])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 records"))
        .stdout(predicate::str::contains("de: 2"))
        .stdout(predicate::str::contains("new_comments_defr: 2"))
        .stdout(predicate::str::contains("FAVOR: 2"))
        .stdout(predicate::str::contains("Dataset valid"));
}

#[test]
fn validate_rejects_unsupported_language() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "bad.jsonl",
        r#"{"question": "q", "comment": "c", "label": "FAVOR", "language": "rm"}"#,
    );

    xstance()
        .current_dir(dir.path())
        .args(["validate", "--input", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rm"));
}

#[test]
fn validate_nonexistent_file() {
    xstance()
        .args(["validate", "--input", "nonexistent.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn baseline_missing_data_dir_fails() {
    let dir = TempDir::new().unwrap();

    xstance()
        .current_dir(dir.path())
        .args(["baseline", "--data-dir", "missing", "--pred", "pred.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("data directory not found"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    xstance()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created xstance.toml"));

    assert!(dir.path().join("xstance.toml").exists());

    xstance()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
