use hmmtag::{Sentence, Token};

const WORDS: [(&str, &str, &str); 12] = [
    ("the", "DET", "DT"),
    ("a", "DET", "DT"),
    ("dog", "NOUN", "NN"),
    ("dogs", "NOUN", "NNS"),
    ("cat", "NOUN", "NN"),
    ("runs", "VERB", "VBZ"),
    ("run", "VERB", "VBP"),
    ("sleeps", "VERB", "VBZ"),
    ("quickly", "ADV", "RB"),
    ("very", "ADV", "RB"),
    ("big", "ADJ", "JJ"),
    ("small", "ADJ", "JJ"),
];

/// Deterministic pseudo-random corpus of `n` sentences.
pub fn corpus(n: usize) -> Vec<Sentence> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    (0..n)
        .map(|_| {
            let len = 5 + (next() % 20) as usize;
            let tokens = (0..len)
                .map(|_| {
                    let (w, c, f) = WORDS[(next() % WORDS.len() as u64) as usize];
                    Token::new(w, Some(c), Some(f))
                })
                .collect();
            Sentence { tokens }
        })
        .collect()
}
