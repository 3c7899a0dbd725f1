//! xstance CLI — evaluation, instance building and the fastText baseline.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "xstance", version, about = "X-Stance stance detection tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score predictions with macro-F1 per test set and language
    Evaluate {
        /// Gold JSONL file with label, language and test_set fields
        #[arg(long)]
        gold: PathBuf,

        /// Prediction JSONL file, one {"label": ...} per gold record
        #[arg(long)]
        pred: PathBuf,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Also save the full report as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Show per-label precision, recall and F1
        #[arg(short, long)]
        verbose: bool,
    },

    /// Train the fastText baseline and predict the test split
    Baseline {
        /// Directory with train.jsonl, valid.jsonl and test.jsonl
        #[arg(long)]
        data_dir: PathBuf,

        /// Where to write test predictions
        #[arg(long)]
        pred: PathBuf,

        /// Pre-trained word vectors (.vec)
        #[arg(long)]
        pretrained_vectors: Option<PathBuf>,

        /// Learning rate
        #[arg(long)]
        lr: Option<f64>,

        /// Training epochs
        #[arg(long)]
        epochs: Option<u32>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build instances from a JSONL file and print them as JSON lines
    Instances {
        /// Input JSONL file
        #[arg(long)]
        input: PathBuf,

        /// Maximum tokens per instance
        #[arg(long)]
        max_sequence_length: Option<usize>,

        /// Keep integer labels as indices
        #[arg(long)]
        skip_label_indexing: bool,

        /// Leave questions out of the tokens
        #[arg(long)]
        ignore_questions: bool,

        /// Leave comments out of the tokens
        #[arg(long)]
        ignore_comments: bool,

        /// Tokenizer: word, segment
        #[arg(long, value_parser = ["word", "segment"])]
        tokenizer: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a dataset file and summarize its records
    Validate {
        /// JSONL dataset file
        #[arg(long)]
        input: PathBuf,
    },

    /// Create a starter xstance.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("xstance=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            gold,
            pred,
            format,
            output,
            verbose,
        } => commands::evaluate::execute(gold, pred, format, output, verbose),
        Commands::Baseline {
            data_dir,
            pred,
            pretrained_vectors,
            lr,
            epochs,
            config,
        } => {
            commands::baseline::execute(data_dir, pred, pretrained_vectors, lr, epochs, config)
                .await
        }
        Commands::Instances {
            input,
            max_sequence_length,
            skip_label_indexing,
            ignore_questions,
            ignore_comments,
            tokenizer,
            config,
        } => commands::instances::execute(commands::instances::InstancesArgs {
            input,
            max_sequence_length,
            skip_label_indexing,
            ignore_questions,
            ignore_comments,
            tokenizer,
            config,
        }),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
