// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only; the work itself happens in the
// data, ml and infra layers.
//
//   train_use_case  load → split → fit vocabularies → train,
//                   checkpointing every epoch
//   infer_use_case  restore a named checkpoint, summarise the
//                   test collections
//   service         the persist / restore / infer contract
//                   over one loaded model
//   harness         the paused mode's line protocol on top of
//                   any ModelService
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Checkpoint restore + test-set summarisation
pub mod infer_use_case;

pub mod service;

pub mod harness;
