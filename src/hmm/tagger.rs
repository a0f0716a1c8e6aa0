use super::{model::ProbabilityModel, START_TAG};
use crate::{dataset::Sentence, quark::StringTable};

/// One trellis cell: the tag hypothesised for the column's word, the index of the best
/// predecessor in the previous column and the score of the best path reaching the cell.
#[derive(Debug, Clone, Copy)]
struct Cell<'m> {
    tag: &'m str,
    parent: Option<usize>,
    score: f64,
}

/// Best tag sequence for a sentence together with its path score.
#[derive(Debug, Clone, PartialEq)]
pub struct TagPath<'m> {
    pub tags: Vec<&'m str>,
    pub score: f64,
}

/// Viterbi decoder over a read-only model. Each call builds its own trellis, so one model
/// can be shared by several taggers.
#[derive(Debug)]
pub struct Tagger<'m, M: ?Sized> {
    model: &'m M,
}

impl<'m, M: ProbabilityModel + ?Sized> Tagger<'m, M> {
    pub fn new(model: &'m M) -> Self {
        Self { model }
    }

    /// Predicts the tag sequence of `words`.
    ///
    /// Known words are scored against every tag; an unknown word gets a single cell
    /// carrying the most frequent tag. Returns `None` for an empty sentence or tagset.
    pub fn viterbi<W: AsRef<str>>(&self, words: &[W]) -> Option<TagPath<'m>> {
        let tags = self.model.tags();
        if words.is_empty() || tags.is_empty() {
            return None;
        }
        let fallback = self.model.most_frequent_tag()?;

        let mut trellis: Vec<Vec<Cell<'m>>> = Vec::with_capacity(words.len() + 1);
        trellis.push(vec![Cell {
            tag: START_TAG,
            parent: None,
            score: 0.0,
        }]);
        for word in words {
            let word = word.as_ref();
            let prev = &trellis[trellis.len() - 1];
            let column: Vec<Cell<'m>> = if self.model.is_known(word) {
                tags.iter().map(|tag| self.best_parent(prev, tag, word)).collect()
            } else {
                vec![self.best_parent(prev, fallback, word)]
            };
            trellis.push(column);
        }

        /* Find the cell in the last column that reaches END with the maximum score. */
        let last = &trellis[words.len()];
        let mut best = 0;
        let mut max_score = f64::NEG_INFINITY;
        for (i, cell) in last.iter().enumerate() {
            let score = self.model.end_log_prob(cell.tag) + cell.score;
            if score >= max_score {
                max_score = score;
                best = i;
            }
        }

        /* Tag words by tracing the backward links. */
        let mut path = Vec::with_capacity(words.len());
        for column in trellis[1..].iter().rev() {
            let cell = &column[best];
            path.push(cell.tag);
            best = cell.parent.unwrap_or_default();
        }
        path.reverse();
        log::trace!("viterbi: {} words, score {max_score}", words.len());
        Some(TagPath {
            tags: path,
            score: max_score,
        })
    }

    /// Pairs every word with its predicted tag. Empty input gives empty output.
    pub fn tag<W: AsRef<str>>(&self, words: &[W]) -> Vec<(String, String)> {
        match self.viterbi(words) {
            Some(path) => words
                .iter()
                .zip(path.tags)
                .map(|(w, t)| (w.as_ref().to_string(), t.to_string()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Tags corpus sentences, keeping sentence and token order.
    pub fn tag_sentences(&self, sentences: &[Sentence]) -> Vec<Vec<(String, String)>> {
        sentences.iter().map(|s| self.tag(&s.words())).collect()
    }

    /// Scores `tag` on `word` against every cell of the previous column and keeps the best.
    /// The last predecessor reaching the maximum wins.
    fn best_parent(&self, prev: &[Cell<'m>], tag: &'m str, word: &str) -> Cell<'m> {
        let mut best = Cell {
            tag,
            parent: None,
            score: f64::NEG_INFINITY,
        };
        for (k, cell) in prev.iter().enumerate() {
            let score = self.model.transition_emission_log_prob(cell.tag, tag, word) + cell.score;
            if score >= best.score {
                best.score = score;
                best.parent = Some(k);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::TagField,
        hmm::{trainer::Trainer, LOG_ZERO},
    };

    fn trained() -> crate::hmm::model::Hmm {
        let mut trainer = Trainer::new(TagField::Coarse);
        trainer.append(&[("dog", Some("NOUN")), ("runs", Some("VERB"))]);
        trainer.into_model()
    }

    #[test]
    fn known_words() {
        let model = trained();
        let tagger = Tagger::new(&model);
        let path = tagger.viterbi(&["dog", "runs"]).unwrap();
        assert_eq!(path.tags, vec!["NOUN", "VERB"]);
        assert_eq!(path.score, 0.0);
    }

    #[test]
    fn unknown_word_gets_most_frequent_tag() {
        let model = trained();
        let tagger = Tagger::new(&model);
        // NOUN and VERB are tied, the later one wins
        assert_eq!(
            tagger.tag(&["dog", "jumps"]),
            vec![
                ("dog".to_string(), "NOUN".to_string()),
                ("jumps".to_string(), "VERB".to_string())
            ]
        );
    }

    #[test]
    fn empty_input() {
        let model = trained();
        let tagger = Tagger::new(&model);
        let words: [&str; 0] = [];
        assert!(tagger.viterbi(&words).is_none());
        assert!(tagger.tag(&words).is_empty());

        let empty = crate::hmm::model::Hmm::default();
        assert!(Tagger::new(&empty).tag(&["dog"]).is_empty());
    }

    #[test]
    fn zero_support_still_decodes() {
        let model = trained();
        let tagger = Tagger::new(&model);
        // "runs" never follows START, every path includes at least one fallback score
        let path = tagger.viterbi(&["runs"]).unwrap();
        assert_eq!(path.tags.len(), 1);
        assert!(path.score <= LOG_ZERO);
    }
}
