// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the system
// works with. No Burn types and no file I/O live here.

// A dialogue record and the summary produced for it
pub mod dialogue;

// Token <-> index mapping fitted on the training corpus
pub mod vocabulary;

// Immutable bundle of vocabularies and sizes needed at inference
pub mod context;

// Seams implemented by the data and application layers
pub mod traits;
