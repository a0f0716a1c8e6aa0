use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insertion-ordered string table. Ids are assigned in first-seen order and never change,
/// so iterating a quark is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl From<Vec<String>> for Quark {
    fn from(value: Vec<String>) -> Self {
        let mut quark = Quark::default();
        for s in value {
            quark.find_or_insert(&s);
        }
        quark
    }
}

impl<'a> FromIterator<&'a str> for Quark {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut quark = Quark::default();
        for s in iter {
            quark.find_or_insert(s);
        }
        quark
    }
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl Quark {
    pub fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&idx) = self.m.get(key) {
            return idx;
        }
        let idx = self.v.len();
        self.m.insert(key.to_string(), idx);
        self.v.push(key.to_string());
        idx
    }

    pub fn contains(&self, key: &str) -> bool {
        self.m.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.v.iter().map(String::as_str)
    }
}

impl Serialize for Quark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.v.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Quark {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(Quark::from)
    }
}
