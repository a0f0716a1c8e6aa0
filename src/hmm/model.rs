use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::{
    counts::{CountRecord, CountStore},
    is_sentinel, END_TAG, LOG_ZERO,
};
use crate::{
    dataset::TagField,
    errors::{Error, Result},
    quark::{Quark, StringTable},
};

/// Read-only scoring interface the decoder runs against.
pub trait ProbabilityModel {
    /// The tagset, in the order candidates are scored.
    fn tags(&self) -> &Quark;

    fn is_known(&self, word: &str) -> bool;

    /// Combined transition and emission score of `tag` following `prev` and emitting `word`:
    ///
    /// `log C(prev, tag) + log C(word, tag) - log C(tag) - log C(prev)`
    ///
    /// Any zero count yields [`LOG_ZERO`].
    fn transition_emission_log_prob(&self, prev: &str, tag: &str, word: &str) -> f64;

    /// `log C(tag, END) - log C(tag)`, or [`LOG_ZERO`] when either count is zero.
    fn end_log_prob(&self, tag: &str) -> f64;

    /// Tag with the highest unigram count; later tags win ties.
    fn most_frequent_tag(&self) -> Option<&str>;
}

#[inline]
fn ln(count: u64) -> Option<f64> {
    (count > 0).then(|| (count as f64).ln())
}

/// A bigram HMM: tagset, the corpus column the tags were taken from, and raw counts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Hmm {
    pub(crate) tags: Quark,
    pub(crate) tag_field: TagField,
    pub(crate) counts: CountStore,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelDoc {
    tags: Quark,
    vocab: Vec<String>,
    tag_field: TagField,
    counts: Vec<CountRecord>,
}

impl Hmm {
    pub fn new(tags: Quark, tag_field: TagField) -> Self {
        Self {
            tags,
            tag_field,
            counts: CountStore::new(),
        }
    }

    pub fn tag_field(&self) -> TagField {
        self.tag_field
    }

    pub fn counts(&self) -> &CountStore {
        &self.counts
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut vocab: Vec<String> = self.counts.vocab().iter().cloned().collect();
        vocab.sort_unstable();
        let mut counts: Vec<CountRecord> = self.counts.records().collect();
        counts.sort();
        let doc = ModelDoc {
            tags: self.tags.clone(),
            vocab,
            tag_field: self.tag_field,
            counts,
        };
        serde_json::to_writer(writer, &doc)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let doc: ModelDoc = serde_json::from_reader(reader)?;
        let mut counts = CountStore::new();
        for record in &doc.counts {
            let (tag, prev) = match record {
                CountRecord::Tag { tag, .. } | CountRecord::Emission { tag, .. } => (tag, None),
                CountRecord::Bigram { prev, tag, .. } => (tag, Some(prev)),
            };
            for t in std::iter::once(tag).chain(prev) {
                if !is_sentinel(t) && !doc.tags.contains(t) {
                    return Err(Error::InvalidModel(format!("count refers to unknown tag {t:?}")));
                }
            }
            counts.apply(record);
        }
        for word in &doc.vocab {
            counts.insert_word(word);
        }
        Ok(Self {
            tags: doc.tags,
            tag_field: doc.tag_field,
            counts,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        log::info!("model saved to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::InvalidModel(format!("{}: {e}", path.display())))?;
        let model = Self::from_reader(BufReader::new(f))?;
        log::info!(
            "model loaded from {} (tags: {}, vocab: {}, field: {})",
            path.display(),
            model.num_tags(),
            model.counts.vocab().len(),
            model.tag_field
        );
        Ok(model)
    }

    /// Writes the model in a plain-text format.
    pub fn dump<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(w, "FILEHEADER = {{")?;
        writeln!(w, "  tag_field: {}", self.tag_field)?;
        writeln!(w, "  num_tags: {}", self.tags.len())?;
        writeln!(w, "  num_words: {}", self.counts.vocab().len())?;
        writeln!(w, "}}")?;
        writeln!(w)?;

        writeln!(w, "TAGS = {{")?;
        for (i, tag) in self.tags.iter().enumerate() {
            writeln!(w, "  {i:5}: {tag} ({})", self.counts.tag_count(tag))?;
        }
        writeln!(w, "}}")?;
        writeln!(w)?;

        let mut records: Vec<CountRecord> = self.counts.records().collect();
        records.sort();
        writeln!(w, "TRANSITIONS = {{")?;
        for record in &records {
            if let CountRecord::Bigram { prev, tag, count } = record {
                writeln!(w, "  ({prev}) --> ({tag}): {count}")?;
            }
        }
        writeln!(w, "}}")?;
        writeln!(w)?;

        writeln!(w, "EMISSIONS = {{")?;
        for record in &records {
            if let CountRecord::Emission { word, tag, count } = record {
                writeln!(w, "  {} --> ({tag}): {count}", word.as_deref().unwrap_or("<null>"))?;
            }
        }
        writeln!(w, "}}")?;
        Ok(())
    }
}

impl ProbabilityModel for Hmm {
    fn tags(&self) -> &Quark {
        &self.tags
    }

    fn is_known(&self, word: &str) -> bool {
        self.counts.contains_word(word)
    }

    fn transition_emission_log_prob(&self, prev: &str, tag: &str, word: &str) -> f64 {
        let c = &self.counts;
        let score = || {
            Some(
                ln(c.tag_bigram_count(prev, tag))? + ln(c.emission_count(Some(word), tag))?
                    - ln(c.tag_count(tag))?
                    - ln(c.tag_count(prev))?,
            )
        };
        score().unwrap_or(LOG_ZERO)
    }

    fn end_log_prob(&self, tag: &str) -> f64 {
        let c = &self.counts;
        let score = || Some(ln(c.tag_bigram_count(tag, END_TAG))? - ln(c.tag_count(tag))?);
        score().unwrap_or(LOG_ZERO)
    }

    fn most_frequent_tag(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for tag in self.tags.iter() {
            let count = self.counts.tag_count(tag);
            if best.map_or(true, |(_, max)| count >= max) {
                best = Some((tag, count));
            }
        }
        best.map(|(tag, _)| tag)
    }
}
