// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Two jobs:
//
//   clean() — normalise raw utterance text pulled out of the
//             JSON collections before it is joined into a
//             dialogue string:
//               1. Unicode whitespace variants → plain space
//               2. control characters → space
//               3. runs of spaces collapsed, edges trimmed
//
//   words() — the one word-splitting rule shared by vocabulary
//             fitting and encoding:
//               1. lowercase
//               2. every character of FILTERS → space
//               3. split on whitespace
//
// Hangul has no case, so lowercasing only touches the Latin
// fragments that show up in the transcripts.
//
// Reference: Rust Book §8 (Strings in Rust)

/// Punctuation stripped before splitting into words.
pub const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one piece of raw text. Returns an owned String.
    pub fn clean(&self, text: &str) -> String {
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' | '\u{3000}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // split_whitespace already drops empty runs and the edges
        normalised.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Split text into vocabulary words.
    pub fn words(&self, text: &str) -> Vec<String> {
        let filtered: String = text
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| if FILTERS.contains(c) { ' ' } else { c })
            .collect();

        filtered.split_whitespace().map(str::to_string).collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
