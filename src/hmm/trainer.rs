use std::time::Instant;

use super::{is_sentinel, model::Hmm, END_TAG, START_TAG};
use crate::{
    dataset::{Sentence, TagField},
    quark::{Quark, StringTable},
};

/// Accumulates bigram HMM counts from tagged sentences.
///
/// Training is additive: feeding the same sentences twice doubles every count.
#[derive(Debug, Default)]
pub struct Trainer {
    model: Hmm,
    num_sentences: usize,
    num_skipped: usize,
}

impl Trainer {
    pub fn new(tag_field: TagField) -> Self {
        Self::with_tags(Quark::default(), tag_field)
    }

    /// Starts from a known tagset; tags first seen while training are appended to it.
    pub fn with_tags(tags: Quark, tag_field: TagField) -> Self {
        Self {
            model: Hmm::new(tags, tag_field),
            num_sentences: 0,
            num_skipped: 0,
        }
    }

    /// Continues training an existing model.
    pub fn from_model(model: Hmm) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    pub fn tag_field(&self) -> TagField {
        self.model.tag_field
    }

    /// Counts one sentence of (word, tag) pairs. Pairs without a tag, or tagged with a
    /// sentinel name, are skipped.
    pub fn append<W, T>(&mut self, sentence: &[(W, Option<T>)])
    where
        W: AsRef<str>,
        T: AsRef<str>,
    {
        let counts = &mut self.model.counts;
        let tags = &mut self.model.tags;
        let mut prev = START_TAG;
        counts.increment_tag(START_TAG, 1);
        counts.increment_emission(None, START_TAG, 1);
        for (word, tag) in sentence {
            let Some(tag) = tag.as_ref().map(|t| t.as_ref()) else {
                log::debug!("skip untagged word: {}", word.as_ref());
                self.num_skipped += 1;
                continue;
            };
            if is_sentinel(tag) {
                log::warn!("skip word tagged with reserved tag {tag}: {}", word.as_ref());
                self.num_skipped += 1;
                continue;
            }
            tags.find_or_insert(tag);
            counts.increment_tag(tag, 1);
            counts.increment_tag_bigram(prev, tag, 1);
            counts.increment_emission(Some(word.as_ref()), tag, 1);
            prev = tag;
        }
        counts.increment_tag_bigram(prev, END_TAG, 1);
        self.num_sentences += 1;
    }

    /// Counts corpus sentences using the configured tag column.
    pub fn train(&mut self, sentences: &[Sentence]) {
        let begin = Instant::now();
        let field = self.model.tag_field;
        for sentence in sentences {
            self.append(&sentence.pairs(field));
        }
        log::info!(
            "trained on {} sentences (total: {}, tags: {}, vocab: {}, skipped words: {}), time cost: {:?}",
            sentences.len(),
            self.num_sentences,
            self.model.tags.len(),
            self.model.counts.vocab().len(),
            self.num_skipped,
            begin.elapsed()
        );
    }

    pub fn model(&self) -> &Hmm {
        &self.model
    }

    pub fn into_model(self) -> Hmm {
        self.model
    }
}
