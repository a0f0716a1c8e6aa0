use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A single persisted count, discriminated by the shape of its key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CountRecord {
    Tag { tag: String, count: u64 },
    Bigram { prev: String, tag: String, count: u64 },
    /// `word` is `None` for the boundary emission recorded with the START tag.
    Emission { word: Option<String>, tag: String, count: u64 },
}

/// Raw occurrence counts of tags, tag bigrams and word/tag pairs.
///
/// A key that was never incremented reads as zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountStore {
    tags: HashMap<String, u64>,
    /// prev -> tag -> count
    bigrams: HashMap<String, HashMap<String, u64>>,
    /// word -> tag -> count
    emissions: HashMap<String, HashMap<String, u64>>,
    /// tag -> count of emissions without a word
    boundary_emissions: HashMap<String, u64>,
    vocab: HashSet<String>,
}

impl CountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_tag(&mut self, tag: &str, amount: u64) {
        *self.tags.entry(tag.to_string()).or_default() += amount;
    }

    pub fn increment_tag_bigram(&mut self, prev: &str, tag: &str, amount: u64) {
        *self
            .bigrams
            .entry(prev.to_string())
            .or_default()
            .entry(tag.to_string())
            .or_default() += amount;
    }

    /// Adds `amount` to the (word, tag) emission count. A real word also joins the vocabulary.
    pub fn increment_emission(&mut self, word: Option<&str>, tag: &str, amount: u64) {
        match word {
            Some(word) => {
                *self
                    .emissions
                    .entry(word.to_string())
                    .or_default()
                    .entry(tag.to_string())
                    .or_default() += amount;
                if !self.vocab.contains(word) {
                    self.vocab.insert(word.to_string());
                }
            }
            None => *self.boundary_emissions.entry(tag.to_string()).or_default() += amount,
        }
    }

    pub fn tag_count(&self, tag: &str) -> u64 {
        self.tags.get(tag).copied().unwrap_or_default()
    }

    pub fn tag_bigram_count(&self, prev: &str, tag: &str) -> u64 {
        self.bigrams
            .get(prev)
            .and_then(|m| m.get(tag))
            .copied()
            .unwrap_or_default()
    }

    pub fn emission_count(&self, word: Option<&str>, tag: &str) -> u64 {
        match word {
            Some(word) => self.emissions.get(word).and_then(|m| m.get(tag)).copied(),
            None => self.boundary_emissions.get(tag).copied(),
        }
        .unwrap_or_default()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.vocab.contains(word)
    }

    pub fn vocab(&self) -> &HashSet<String> {
        &self.vocab
    }

    /// Registers a word without touching any count. Used when restoring a saved vocabulary.
    pub(crate) fn insert_word(&mut self, word: &str) {
        if !self.vocab.contains(word) {
            self.vocab.insert(word.to_string());
        }
    }

    /// Every stored count as a flat record list.
    pub fn records(&self) -> impl Iterator<Item = CountRecord> + '_ {
        let tags = self.tags.iter().map(|(tag, &count)| CountRecord::Tag {
            tag: tag.clone(),
            count,
        });
        let bigrams = self.bigrams.iter().flat_map(|(prev, m)| {
            m.iter().map(move |(tag, &count)| CountRecord::Bigram {
                prev: prev.clone(),
                tag: tag.clone(),
                count,
            })
        });
        let emissions = self.emissions.iter().flat_map(|(word, m)| {
            m.iter().map(move |(tag, &count)| CountRecord::Emission {
                word: Some(word.clone()),
                tag: tag.clone(),
                count,
            })
        });
        let boundary = self
            .boundary_emissions
            .iter()
            .map(|(tag, &count)| CountRecord::Emission {
                word: None,
                tag: tag.clone(),
                count,
            });
        tags.chain(bigrams).chain(emissions).chain(boundary)
    }

    pub fn apply(&mut self, record: &CountRecord) {
        match record {
            CountRecord::Tag { tag, count } => self.increment_tag(tag, *count),
            CountRecord::Bigram { prev, tag, count } => self.increment_tag_bigram(prev, tag, *count),
            CountRecord::Emission { word, tag, count } => {
                self.increment_emission(word.as_deref(), tag, *count)
            }
        }
    }
}
