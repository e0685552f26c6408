// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From JSON collections on disk to tensor batches:
//
//   JSON collections
//       │
//       ▼
//   JsonDialogueLoader → DialogueRecords (id, dialogue, summary)
//       │
//       ▼
//   Preprocessor       → cleaned text, word splitting
//       │
//       ▼
//   Vocabulary         → index sequences (domain layer)
//       │
//       ▼
//   padding            → fixed-width sequences
//       │
//       ▼
//   SummaryDataset     → Burn Dataset of SummarySamples
//       │
//       ▼
//   SummaryBatcher     → [batch, width] Int tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads train/train_data/* and test_data/* collections
pub mod loader;

/// Text cleaning and the shared word-splitting rule
pub mod preprocessor;

/// Fixed-width padding and truncation
pub mod padding;

/// Sample construction and Burn's Dataset trait
pub mod dataset;

/// Burn's Batcher trait for summary samples
pub mod batcher;

/// Ordered (or seeded) train/validation split
pub mod splitter;
