use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Parser;
use hmmtag::{dataset, Evaluation, Hmm, ReaderConfig, ProbabilityModel};

/// Compare tagger output (OUTPUT_FILE) against a gold-standard CoNLL-X file (GOLD_FILE)
/// and report per-tag accuracies and the confusion matrix
#[derive(Debug, Parser)]
struct Argv {
    /// read a model from a file (MODEL)
    #[arg(short, long, default_value = "hmm.conf", value_name = "MODEL")]
    model: PathBuf,
    #[arg(value_name = "OUTPUT_FILE")]
    output_filepath: PathBuf,
    #[arg(value_name = "GOLD_FILE")]
    gold_filepath: PathBuf,
}

fn main() -> hmmtag::Result<()> {
    env_logger::init();
    let argv = Argv::parse();
    log::info!("{:?}", argv);
    let model = Hmm::load(&argv.model)?;
    let field = model.tag_field();
    let gold = dataset::read_sentences_from_path(&argv.gold_filepath, &ReaderConfig::new(field))?;
    let predicted = dataset::read_tagged(BufReader::new(File::open(&argv.output_filepath)?))?;

    let gold_tags: Vec<Vec<Option<&str>>> = gold
        .iter()
        .map(|s| s.tokens.iter().map(|t| t.tag(field)).collect())
        .collect();
    let predicted_tags: Vec<Vec<&str>> = predicted
        .iter()
        .map(|s| s.iter().map(|(_, tag)| tag.as_str()).collect())
        .collect();

    let mut evaluation = Evaluation::new(model.tags());
    evaluation.build_partial(&gold_tags, &predicted_tags)?;
    println!("{}", evaluation);
    Ok(())
}
