// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system concerns shared by training and inference:
//
//   checkpoint.rs — model artifacts (weights + inference
//                   context), per-epoch checkpoints, the
//                   latest-checkpoint pointer and the saved
//                   run config
//
//   metrics.rs    — per-epoch losses appended to metrics.csv
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model artifacts and per-epoch checkpoints
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
