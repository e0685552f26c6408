// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer is written against these traits,
// never against the JSON loader or the Burn model directly.
//
//   DialogueSource → JsonDialogueLoader reads the benchmark layout
//   ModelService   → SummarizerService wraps model + context
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use anyhow::Result;

use crate::domain::dialogue::{DialogueRecord, SummaryResponse};

// ─── DialogueSource ───────────────────────────────────────────────────────────
/// Any component that can produce dialogue records.
pub trait DialogueSource {
    /// Load every record, in a stable order.
    fn load_all(&self) -> Result<Vec<DialogueRecord>>;
}

// ─── ModelService ─────────────────────────────────────────────────────────────
/// The persist / restore / infer contract the benchmark harness
/// drives. Implementations own the weights and the inference
/// context; callers only ever see paths, records and summaries.
pub trait ModelService {
    /// Write the weights and the inference context into `dir`.
    fn persist(&self, dir: &Path) -> Result<()>;

    /// Replace the current model and context with the ones stored
    /// in `dir`.
    fn restore(&mut self, dir: &Path) -> Result<()>;

    /// Summarise `requests`, one response per record, same order.
    fn infer(&self, requests: &[DialogueRecord]) -> Result<Vec<SummaryResponse>>;
}
