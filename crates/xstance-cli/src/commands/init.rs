//! The `xstance init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("xstance.toml").exists() {
        println!("xstance.toml already exists, skipping.");
    } else {
        std::fs::write("xstance.toml", SAMPLE_CONFIG)?;
        println!("Created xstance.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point [fasttext] at your fasttext binary and tokenizer.perl");
    println!("  2. Run: xstance validate --input data/train.jsonl");
    println!("  3. Run: xstance baseline --data-dir data --pred predictions.jsonl");
    println!("  4. Run: xstance evaluate --gold data/test.jsonl --pred predictions.jsonl");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# xstance configuration

[reader]
# "segment" wraps text in [CLS] ... [SEP]; "word" splits words and punctuation
tokenizer = "segment"
# max_sequence_length = 200
skip_label_indexing = false
ignore_questions = false
ignore_comments = false
strip_comment_marker = true

[fasttext]
binary = "fasttext"
tokenizer_script = "${MOSES_DIR}/scripts/tokenizer/tokenizer.perl"
processed_data_dir = "processed_data"
model_path = "model.bin"
timeout_secs = 3600

[fasttext.train]
dim = 300
lr = 0.1
epochs = 5
word_ngrams = 3
# pretrained_vectors = "vectors/wiki.multi.vec"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config: xstance_fasttext::XStanceConfig = load_sample(SAMPLE_CONFIG);
        assert_eq!(config.fasttext.train.dim, 300);
        assert!(config.reader.strip_comment_marker);
    }

    fn load_sample(content: &str) -> xstance_fasttext::XStanceConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xstance.toml");
        std::fs::write(&path, content).unwrap();
        xstance_fasttext::load_config_from(Some(&path)).unwrap()
    }
}
