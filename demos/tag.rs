use std::{fs::File, io::BufWriter, path::PathBuf, time::Instant};

use clap::Parser;
use hmmtag::{dataset, Hmm, ReaderConfig, Tagger};

/// Assign part-of-speech tags to the sentences in a CoNLL-X file (TEST_FILE)
/// and write them as `word|tag` lines to OUTPUT_FILE
#[derive(Debug, Parser)]
struct Argv {
    /// read a model from a file (MODEL)
    #[arg(short, long, default_value = "hmm.conf", value_name = "MODEL")]
    model: PathBuf,
    #[arg(value_name = "TEST_FILE")]
    test_filepath: PathBuf,
    #[arg(value_name = "OUTPUT_FILE")]
    output_filepath: PathBuf,
}

fn main() -> hmmtag::Result<()> {
    env_logger::init();
    let argv = Argv::parse();
    log::info!("{:?}", argv);
    let model = Hmm::load(&argv.model)?;
    let config = ReaderConfig::new(model.tag_field());
    let sentences = dataset::read_sentences_from_path(&argv.test_filepath, &config)?;

    let begin = Instant::now();
    let tagger = Tagger::new(&model);
    let tagged = tagger.tag_sentences(&sentences);
    log::info!("tagged {} sentences, time cost: {:?}", tagged.len(), begin.elapsed());

    let out = BufWriter::new(File::create(&argv.output_filepath)?);
    dataset::write_tagged(out, &tagged)?;
    println!("Output written to {}", argv.output_filepath.display());
    Ok(())
}
