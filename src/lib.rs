//! Bigram hidden Markov model part-of-speech tagger.
//!
//! Train a model from tagged sentences with [`Trainer`], then decode new sentences with the
//! Viterbi [`Tagger`]:
//!
//! ```
//! use hmmtag::{TagField, Tagger, Trainer};
//!
//! let mut trainer = Trainer::new(TagField::Coarse);
//! trainer.append(&[("dog", Some("NOUN")), ("runs", Some("VERB"))]);
//! let model = trainer.into_model();
//!
//! let tagger = Tagger::new(&model);
//! let tags = tagger.viterbi(&["dog", "runs"]).unwrap().tags;
//! assert_eq!(tags, ["NOUN", "VERB"]);
//! ```

pub mod dataset;
mod errors;
pub mod evaluation;
pub mod hmm;
pub mod quark;

pub use dataset::{ReaderConfig, Sentence, TagField, Token};
pub use errors::{Error, Result};
pub use evaluation::Evaluation;
pub use hmm::{
    counts::CountStore,
    model::{Hmm, ProbabilityModel},
    tagger::{TagPath, Tagger},
    trainer::Trainer,
    END_TAG, LOG_ZERO, START_TAG,
};
pub use quark::{Quark, StringTable};
