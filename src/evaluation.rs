use std::fmt::Display;

use crate::{
    errors::{Error, Result},
    quark::{Quark, StringTable},
};

/// Label-wise performance values.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LabelMeasure {
    /// Number of correct predictions.
    pub num_correct: usize,
    /// Number of occurrences of the label in the gold-standard data.
    pub num_observation: usize,
    /// Number of predictions.
    pub num_prediction: usize,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

/// Confusion matrix over a fixed tagset. Rows are gold tags, columns are predicted tags.
#[derive(Debug, Clone)]
pub struct Evaluation {
    tags: Quark,
    stats: Vec<usize>,
    /** Number of sentences with every tag correct. */
    inst_total_correct: usize,
    /** Total number of sentences. */
    inst_total_num: usize,
}

impl Evaluation {
    pub fn new(tags: &Quark) -> Self {
        let n = tags.len();
        Self {
            tags: tags.clone(),
            stats: vec![0; n * n],
            inst_total_correct: 0,
            inst_total_num: 0,
        }
    }

    #[inline]
    fn num_labels(&self) -> usize {
        self.tags.len()
    }

    fn index(&self, tag: &str) -> Result<usize> {
        self.tags.to_id(tag).ok_or_else(|| Error::UnknownTag(tag.to_string()))
    }

    pub fn add_stat(&mut self, predicted: &str, gold: &str) -> Result<()> {
        let (g, p) = (self.index(gold)?, self.index(predicted)?);
        let l = self.num_labels();
        self.stats[l * g + p] += 1;
        Ok(())
    }

    /// Resolves one sentence to (gold, predicted) matrix cells without touching the counts.
    /// Tokens without a gold tag are left out.
    fn resolve<G: AsRef<str>, P: AsRef<str>>(&self, gold: &[Option<G>], predicted: &[P]) -> Result<Vec<(usize, usize)>> {
        if gold.len() != predicted.len() {
            return Err(Error::LengthMismatch {
                what: "token",
                expected: gold.len(),
                actual: predicted.len(),
            });
        }
        gold.iter()
            .zip(predicted)
            .filter_map(|(g, p)| g.as_ref().map(|g| (g, p)))
            .map(|(g, p)| -> Result<(usize, usize)> { Ok((self.index(g.as_ref())?, self.index(p.as_ref())?)) })
            .collect()
    }

    fn commit(&mut self, cells: &[(usize, usize)]) {
        let l = self.num_labels();
        for &(g, p) in cells {
            self.stats[l * g + p] += 1;
        }
        if cells.iter().all(|(g, p)| g == p) {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    /// Adds one sentence; both sides must have the same number of tags.
    ///
    /// Nothing is counted when an error is returned.
    pub fn accumulate<G: AsRef<str>, P: AsRef<str>>(&mut self, gold: &[G], predicted: &[P]) -> Result<()> {
        let gold: Vec<Option<&str>> = gold.iter().map(|g| Some(g.as_ref())).collect();
        let cells = self.resolve(&gold[..], predicted)?;
        self.commit(&cells);
        Ok(())
    }

    /// Like [`Evaluation::accumulate`], but gold tokens may lack a tag. Those tokens are
    /// not scored, and a sentence with no gold tag at all is not counted.
    pub fn accumulate_partial<G: AsRef<str>, P: AsRef<str>>(&mut self, gold: &[Option<G>], predicted: &[P]) -> Result<()> {
        let cells = self.resolve(gold, predicted)?;
        if cells.is_empty() && !gold.is_empty() {
            log::debug!("skip sentence without gold tags ({} tokens)", gold.len());
            return Ok(());
        }
        self.commit(&cells);
        Ok(())
    }

    /// Adds whole corpora of tag sequences, sentence by sentence.
    ///
    /// Every sentence is checked before any is counted, so a failed call leaves the
    /// matrix unchanged.
    pub fn build<G, P, GT, PT>(&mut self, gold: &[G], predicted: &[P]) -> Result<()>
    where
        G: AsRef<[GT]>,
        P: AsRef<[PT]>,
        GT: AsRef<str>,
        PT: AsRef<str>,
    {
        let gold: Vec<Vec<Option<&str>>> = gold
            .iter()
            .map(|s| s.as_ref().iter().map(|g| Some(g.as_ref())).collect())
            .collect();
        self.build_partial::<_, _, &str, PT>(&gold, predicted)
    }

    /// Like [`Evaluation::build`], with gold tokens that may lack a tag.
    pub fn build_partial<G, P, GT, PT>(&mut self, gold: &[G], predicted: &[P]) -> Result<()>
    where
        G: AsRef<[Option<GT>]>,
        P: AsRef<[PT]>,
        GT: AsRef<str>,
        PT: AsRef<str>,
    {
        if gold.len() != predicted.len() {
            return Err(Error::LengthMismatch {
                what: "sentence",
                expected: gold.len(),
                actual: predicted.len(),
            });
        }
        let mut resolved = Vec::with_capacity(gold.len());
        for (g, p) in gold.iter().zip(predicted) {
            let g = g.as_ref();
            let cells = self.resolve(g, p.as_ref())?;
            if cells.is_empty() && !g.is_empty() {
                continue;
            }
            resolved.push(cells);
        }
        let skipped = gold.len() - resolved.len();
        if skipped > 0 {
            log::warn!("{skipped} sentences without gold tags were not scored");
        }
        for cells in &resolved {
            self.commit(cells);
        }
        Ok(())
    }

    pub fn count(&self, gold: &str, predicted: &str) -> usize {
        match (self.tags.to_id(gold), self.tags.to_id(predicted)) {
            (Some(g), Some(p)) => self.stats[self.num_labels() * g + p],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.stats.iter().sum()
    }

    fn trace(&self) -> usize {
        let l = self.num_labels();
        (0..l).map(|i| self.stats[l * i + i]).sum()
    }

    fn row(&self, i: usize) -> usize {
        let l = self.num_labels();
        self.stats[l * i..l * (i + 1)].iter().sum()
    }

    fn col(&self, j: usize) -> usize {
        let l = self.num_labels();
        (0..l).map(|i| self.stats[l * i + j]).sum()
    }

    pub fn overall_accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.trace() as f64 / total as f64
    }

    /// Share of tokens classified correctly with respect to `tag`: true positives plus
    /// true negatives over all tokens.
    pub fn accuracy(&self, tag: &str) -> Result<f64> {
        let i = self.index(tag)?;
        let total = self.total();
        if total == 0 {
            return Ok(0.0);
        }
        let l = self.num_labels();
        let hits = total + 2 * self.stats[l * i + i] - self.row(i) - self.col(i);
        Ok(hits as f64 / total as f64)
    }

    pub fn sequence_accuracy(&self) -> f64 {
        if self.inst_total_num == 0 {
            return 0.0;
        }
        self.inst_total_correct as f64 / self.inst_total_num as f64
    }

    pub fn label_measure(&self, tag: &str) -> Result<LabelMeasure> {
        let i = self.index(tag)?;
        let l = self.num_labels();
        let mut lev = LabelMeasure {
            num_correct: self.stats[l * i + i],
            num_observation: self.row(i),
            num_prediction: self.col(i),
            ..Default::default()
        };
        if lev.num_prediction > 0 {
            lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
        }
        if lev.num_observation > 0 {
            lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
        }
        if lev.precision + lev.recall > 0.0 {
            lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
        }
        Ok(lev)
    }

    /// Macro-averaged (precision, recall, F1) over tags observed in the gold data.
    pub fn macro_average(&self) -> (f64, f64, f64) {
        let mut n = 0;
        let (mut p, mut r, mut f) = (0.0, 0.0, 0.0);
        for tag in self.tags.iter() {
            let Ok(lev) = self.label_measure(tag) else { continue };
            if lev.num_observation == 0 {
                continue;
            }
            p += lev.precision;
            r += lev.recall;
            f += lev.fmeasure;
            n += 1;
        }
        if n == 0 {
            return (0.0, 0.0, 0.0);
        }
        let n = n as f64;
        (p / n, r / n, f / n)
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Accuracies:")?;
        writeln!(f, "Overall Accuracy: {:.4}", self.overall_accuracy())?;
        for tag in self.tags.iter() {
            if let Ok(acc) = self.accuracy(tag) {
                writeln!(f, "{tag} Accuracy: {acc:.4}")?;
            }
        }
        writeln!(f, "Sequence accuracy: {}/{} => {:.4}", self.inst_total_correct, self.inst_total_num, self.sequence_accuracy())?;
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for tag in self.tags.iter() {
            let Ok(lev) = self.label_measure(tag) else { continue };
            if lev.num_observation == 0 {
                writeln!(f, "\t{}: ({}, {}, {}) (******, ******, ******)", tag, lev.num_correct, lev.num_prediction, lev.num_observation)?;
            } else {
                writeln!(f, "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})", tag, lev.num_correct, lev.num_prediction, lev.num_observation,
                    lev.precision, lev.recall, lev.fmeasure)?;
            }
        }
        let (p, r, f1) = self.macro_average();
        writeln!(f, "Macro-average precision, recall, F1: ({p:.4}, {r:.4}, {f1:.4})")?;
        writeln!(f, "Confusion matrix (rows: gold, columns: predicted):")?;
        writeln!(f, "  Tags: {:?}", self.tags.iter().collect::<Vec<_>>())?;
        let l = self.num_labels();
        for i in 0..l {
            let row: Vec<String> = self.stats[l * i..l * (i + 1)].iter().map(|c| format!("{c:6}")).collect();
            writeln!(f, "  [{}]", row.join(" "))?;
        }
        Ok(())
    }
}
