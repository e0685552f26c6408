// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Bidirectional token <-> index mapping fitted on a corpus.
//
// Index layout:
//   0  <pad>   padding, never a real token
//   1  <unk>   every out-of-vocabulary word maps here
//   2  <sos>   start-of-summary sentinel
//   3  <eos>   end-of-summary sentinel
//   4… real tokens, most frequent first
//
// `num_words` caps the vocabulary the same way the model's
// embedding width is capped: only indices below it are kept,
// reserved slots included.
//
// Once fitted the vocabulary is never mutated. It is persisted
// inside the InferenceContext so decoding uses the exact
// mapping the model was trained against.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::data::preprocessor::Preprocessor;

pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";
pub const SOS_TOKEN: &str = "<sos>";
pub const EOS_TOKEN: &str = "<eos>";

pub const PAD: u32 = 0;
pub const UNK: u32 = 1;
pub const SOS: u32 = 2;
pub const EOS: u32 = 3;

const RESERVED: [&str; 4] = [PAD_TOKEN, UNK_TOKEN, SOS_TOKEN, EOS_TOKEN];

/// On-disk form: the ordered token list plus the width cap.
/// The reverse map is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct VocabularyRecord {
    num_words: usize,
    tokens:    Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "VocabularyRecord", from = "VocabularyRecord")]
pub struct Vocabulary {
    num_words:       usize,
    index_to_token:  Vec<String>,
    token_to_index:  HashMap<String, u32>,
}

impl Vocabulary {
    /// Fit a vocabulary on `texts`, keeping at most `num_words`
    /// indices (reserved slots included).
    ///
    /// Words are ranked by descending frequency; ties keep the
    /// order in which the words were first seen.
    pub fn fit<S: AsRef<str>>(texts: &[S], num_words: usize) -> Self {
        let preprocessor = Preprocessor::new();

        // word -> (count, first position)
        let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
        let mut seen = 0usize;
        for text in texts {
            for word in preprocessor.words(text.as_ref()) {
                let entry = freq.entry(word).or_insert_with(|| {
                    seen += 1;
                    (0, seen)
                });
                entry.0 += 1;
            }
        }

        let mut words: Vec<(String, (usize, usize))> = freq
            .into_iter()
            .filter(|(w, _)| !RESERVED.contains(&w.as_str()))
            .collect();
        words.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

        let vocab = Self::from_tokens(words.into_iter().map(|(w, _)| w), num_words);
        tracing::debug!(
            "Fitted vocabulary: {} entries (cap {})",
            vocab.len(),
            num_words
        );
        vocab
    }

    /// Build from an explicit, already ranked token list. The first
    /// token receives index 4. Tokens beyond `num_words` are dropped.
    pub fn from_tokens<I, S>(tokens: I, num_words: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index_to_token: Vec<String> = RESERVED.iter().map(|t| t.to_string()).collect();
        let mut seen: HashSet<String> = index_to_token.iter().cloned().collect();
        for token in tokens {
            if index_to_token.len() >= num_words {
                break;
            }
            let token = token.into();
            if seen.insert(token.clone()) {
                index_to_token.push(token);
            }
        }
        Self::from(VocabularyRecord { num_words, tokens: index_to_token })
    }

    /// Number of entries, reserved slots included.
    pub fn len(&self) -> usize {
        self.index_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_token.len() <= RESERVED.len()
    }

    /// The configured width cap (`num_words`).
    pub fn capacity(&self) -> usize {
        self.num_words
    }

    pub fn index(&self, token: &str) -> Option<u32> {
        self.token_to_index.get(token).copied()
    }

    /// Inverse lookup. Anything outside the table is `<unk>`.
    pub fn token(&self, index: u32) -> &str {
        self.index_to_token
            .get(index as usize)
            .map(String::as_str)
            .unwrap_or(UNK_TOKEN)
    }

    /// Normalise, split and map `text` to indices.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        Preprocessor::new()
            .words(text)
            .iter()
            .map(|w| self.index(w).unwrap_or(UNK))
            .collect()
    }

    pub fn decode(&self, indices: &[u32]) -> Vec<&str> {
        indices.iter().map(|&i| self.token(i)).collect()
    }

    /// Turn a generated sequence into a summary string. Padding and
    /// both sentinels are elided; `<unk>` is kept as is.
    pub fn render(&self, indices: &[u32]) -> String {
        let kept: Vec<u32> = indices
            .iter()
            .copied()
            .filter(|&i| i != PAD && i != SOS && i != EOS)
            .collect();
        self.decode(&kept).join(" ")
    }
}

impl From<VocabularyRecord> for Vocabulary {
    fn from(record: VocabularyRecord) -> Self {
        let token_to_index = record
            .tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self {
            num_words:      record.num_words,
            index_to_token: record.tokens,
            token_to_index,
        }
    }
}

impl From<Vocabulary> for VocabularyRecord {
    fn from(vocab: Vocabulary) -> Self {
        Self { num_words: vocab.num_words, tokens: vocab.index_to_token }
    }
}
