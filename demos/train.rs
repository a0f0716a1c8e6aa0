use std::path::PathBuf;

use clap::Parser;
use hmmtag::{dataset, ReaderConfig, TagField, Trainer};

/// Train a bigram HMM tagger from a CoNLL-X corpus (TRAINING_FILE) and save it to MODEL
#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    /// use the coarse-grained tags (CPOSTAG column)
    #[arg(short, long, conflicts_with = "postag")]
    cpostag: bool,
    /// use the fine-grained tags (POSTAG column)
    #[arg(short, long)]
    postag: bool,
    /// write the model to a file (MODEL)
    #[arg(short, long, default_value = "hmm.conf", value_name = "MODEL")]
    model: PathBuf,
    /// path to the training file
    #[arg(value_name = "TRAINING_FILE")]
    training_filepath: PathBuf,
}

fn main() -> hmmtag::Result<()> {
    env_logger::init();

    let argv = Argv::parse();
    log::info!("argv: {:?}", argv);
    let tag_field = if argv.postag {
        TagField::Fine
    } else {
        if !argv.cpostag {
            log::info!("using {} since tag set was not specified", TagField::Coarse);
        }
        TagField::Coarse
    };
    let config = ReaderConfig::new(tag_field);
    let sentences = dataset::read_sentences_from_path(&argv.training_filepath, &config)?;
    let mut trainer = Trainer::with_tags(dataset::tag_list(&sentences, tag_field), tag_field);
    trainer.train(&sentences);
    trainer.model().save(&argv.model)?;
    log::info!("write model to {}", argv.model.display());
    Ok(())
}
