//! The `xstance instances` command.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;

use xstance_core::reader::{TokenizerKind, XStanceReader};
use xstance_fasttext::load_config_from;

pub struct InstancesArgs {
    pub input: PathBuf,
    pub max_sequence_length: Option<usize>,
    pub skip_label_indexing: bool,
    pub ignore_questions: bool,
    pub ignore_comments: bool,
    pub tokenizer: Option<String>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: InstancesArgs) -> Result<()> {
    let mut reader_config = load_config_from(args.config.as_deref())?.reader;

    // Flags only switch options on; the config file decides the rest.
    if args.max_sequence_length.is_some() {
        reader_config.max_sequence_length = args.max_sequence_length;
    }
    reader_config.skip_label_indexing |= args.skip_label_indexing;
    reader_config.ignore_questions |= args.ignore_questions;
    reader_config.ignore_comments |= args.ignore_comments;
    match args.tokenizer.as_deref() {
        Some("word") => reader_config.tokenizer = TokenizerKind::Word,
        Some("segment") => reader_config.tokenizer = TokenizerKind::Segment,
        Some(other) => anyhow::bail!("unknown tokenizer: {other}"),
        None => {}
    }

    let reader = XStanceReader::from_config(reader_config);
    let instances = reader.read(&args.input)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for instance in &instances {
        serde_json::to_writer(&mut out, instance)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}
