use std::io::stdout;

use clap::Parser;
use hmmtag::Hmm;

/// output the model stored in the file (MODEL) in a plain-text format
#[derive(Debug, Parser)]
struct Argv {
    #[arg(short, long, required = true, value_name = "MODEL")]
    model: String,
}

fn main() -> hmmtag::Result<()> {
    env_logger::init();
    let argv = Argv::parse();
    let model = Hmm::load(&argv.model)?;
    model.dump(stdout().lock())
}
