use std::{
    collections::HashSet,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{errors::Result, quark::Quark, Error};

/// Which corpus column is used as "the tag" for a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagField {
    /// coarse-grained tag (`CPOSTAG`, fourth column)
    #[default]
    #[serde(rename = "cpostag")]
    Coarse,
    /// fine-grained tag (`POSTAG`, fifth column)
    #[serde(rename = "postag")]
    Fine,
}

impl FromStr for TagField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cpostag" | "coarse" => Ok(Self::Coarse),
            "postag" | "fine" => Ok(Self::Fine),
            _ => Err(Error::InvalidArgument(format!("unknown tag field: {s}"))),
        }
    }
}

impl Display for TagField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coarse => write!(f, "cpostag"),
            Self::Fine => write!(f, "postag"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub coarse: Option<String>,
    pub fine: Option<String>,
}

impl Token {
    pub fn new(word: &str, coarse: Option<&str>, fine: Option<&str>) -> Self {
        Self {
            word: word.to_string(),
            coarse: coarse.map(str::to_string),
            fine: fine.map(str::to_string),
        }
    }

    pub fn tag(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Coarse => self.coarse.as_deref(),
            TagField::Fine => self.fine.as_deref(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.word.as_str()).collect()
    }

    pub fn pairs(&self, field: TagField) -> Vec<(&str, Option<&str>)> {
        self.tokens.iter().map(|t| (t.word.as_str(), t.tag(field))).collect()
    }
}

/// Corpus reader settings.
///
/// Input is always decoded as UTF-8.
#[derive(Debug, Default, Clone)]
pub struct ReaderConfig {
    pub tag_field: TagField,
    /// word forms dropped while reading
    pub stopwords: HashSet<String>,
}

impl ReaderConfig {
    pub fn new(tag_field: TagField) -> Self {
        Self {
            tag_field,
            ..Default::default()
        }
    }

    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = stopwords.into_iter().map(Into::into).collect();
        self
    }
}

/// Reads tab-separated CoNLL-X rows. A row with fewer than two fields ends a sentence;
/// rows whose form is `_` are skipped and rows without tag columns get `None` tags.
pub fn read_sentences<R: BufRead>(reader: R, config: &ReaderConfig) -> Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    let mut sentence = Sentence::default();
    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() < 2 {
            if !sentence.is_empty() {
                sentences.push(std::mem::take(&mut sentence));
            }
            continue;
        }
        let word = fields[1];
        if word == "_" || config.stopwords.contains(word) {
            continue;
        }
        let token = match (fields.get(3), fields.get(4)) {
            (Some(&coarse), Some(&fine)) => Token::new(word, Some(coarse), Some(fine)),
            _ => {
                log::warn!("missing tag columns: {line}");
                Token::new(word, None, None)
            }
        };
        sentence.push(token);
    }
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
    log::debug!("read {} sentences", sentences.len());
    Ok(sentences)
}

pub fn read_sentences_from_path<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Vec<Sentence>> {
    let f = File::open(path)?;
    read_sentences(BufReader::new(f), config)
}

/// Tags of the selected column in first-appearance order, without missing tags.
pub fn tag_list(sentences: &[Sentence], field: TagField) -> Quark {
    sentences
        .iter()
        .flat_map(|s| s.tokens.iter())
        .filter_map(|t| t.tag(field))
        .collect()
}

/// Writes one `word|tag` line per token and a blank line after every sentence.
pub fn write_tagged<Wr, S, W, T>(mut writer: Wr, sentences: &[S]) -> Result<()>
where
    Wr: Write,
    S: AsRef<[(W, T)]>,
    W: AsRef<str>,
    T: AsRef<str>,
{
    for sentence in sentences {
        for (word, tag) in sentence.as_ref() {
            writeln!(writer, "{}|{}", word.as_ref(), tag.as_ref())?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads sentences written by [`write_tagged`].
pub fn read_tagged<R: BufRead>(reader: R) -> Result<Vec<Vec<(String, String)>>> {
    let mut sentences = Vec::new();
    let mut sentence = Vec::new();
    for line in reader.lines() {
        let line = line?;
        match line.trim().rsplit_once('|') {
            Some((word, tag)) => sentence.push((word.to_string(), tag.to_string())),
            None => {
                if !sentence.is_empty() {
                    sentences.push(std::mem::take(&mut sentence));
                }
            }
        }
    }
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const CONLL: &str = "1\tThe\tthe\tDET\tDT\t_\n\
                         2\tdog\tdog\tNOUN\tNN\t_\n\
                         3\t_\t_\tPUNCT\t.\t_\n\
                         \n\
                         \n\
                         1\truns\trun\n\
                         2\tfast\tfast\tADV\tRB\t_\n";

    #[test]
    fn read_conll() {
        let sentences = read_sentences(Cursor::new(CONLL), &ReaderConfig::default()).unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].words(), vec!["The", "dog"]);
        assert_eq!(sentences[0].tokens[1].tag(TagField::Coarse), Some("NOUN"));
        assert_eq!(sentences[0].tokens[1].tag(TagField::Fine), Some("NN"));
        assert_eq!(sentences[1].tokens[0], Token::new("runs", None, None));
    }

    #[test]
    fn stopwords_are_dropped() {
        let config = ReaderConfig::new(TagField::Fine).with_stopwords(["The"]);
        let sentences = read_sentences(Cursor::new(CONLL), &config).unwrap();
        assert_eq!(sentences[0].words(), vec!["dog"]);
    }

    #[test]
    fn tag_list_skips_missing() {
        let sentences = read_sentences(Cursor::new(CONLL), &ReaderConfig::default()).unwrap();
        let tags = tag_list(&sentences, TagField::Coarse);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["DET", "NOUN", "ADV"]);
    }

    #[test]
    fn tag_field_names() {
        assert_eq!("cpostag".parse::<TagField>().unwrap(), TagField::Coarse);
        assert_eq!("fine".parse::<TagField>().unwrap(), TagField::Fine);
        assert_eq!(TagField::Fine.to_string(), "postag");
        assert!("lemma".parse::<TagField>().is_err());
    }

    #[test]
    fn tagged_output_format() {
        let sentences = vec![
            vec![("dog", "NOUN"), ("runs", "VERB")],
            vec![("a|b", "SYM")],
        ];
        let mut buf = Vec::new();
        write_tagged(&mut buf, &sentences).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text, "dog|NOUN\nruns|VERB\n\na|b|SYM\n\n");

        let back = read_tagged(Cursor::new(buf)).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0][1], ("runs".to_string(), "VERB".to_string()));
        assert_eq!(back[1][0], ("a|b".to_string(), "SYM".to_string()));
    }
}
