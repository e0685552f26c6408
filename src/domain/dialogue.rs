// ============================================================
// Layer 3 — Dialogue Domain Types
// ============================================================
// A DialogueRecord is one entry of the benchmark collections:
// an identifier, the utterances flattened into one source
// string, and (training data only) the reference summary.
//
// A SummaryResponse is what inference hands back to the
// harness: the same identifier paired with the generated text.

use serde::{Deserialize, Serialize};

/// One dialogue as loaded from the JSON collections.
/// Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    /// `header.dialogueInfo.dialogueID`
    pub id: String,

    /// All utterances of `body.dialogue`, joined with single spaces.
    /// Empty when the dialogue has no utterances.
    pub dialogue: String,

    /// `body.summary`; absent in test collections
    pub summary: Option<String>,
}

impl DialogueRecord {
    pub fn new(
        id:       impl Into<String>,
        dialogue: impl Into<String>,
        summary:  Option<String>,
    ) -> Self {
        Self {
            id:       id.into(),
            dialogue: dialogue.into(),
            summary,
        }
    }
}

/// One generated summary, keyed by the dialogue it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub id:      String,
    pub summary: String,
}

impl SummaryResponse {
    pub fn new(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self { id: id.into(), summary: summary.into() }
    }
}
