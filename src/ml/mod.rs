// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// The network, its training loop and its inference procedure.
//
//   lstm.rs           recurrent layer with input and recurrent
//                     dropout
//   attention.rs      additive (Bahdanau) attention, step-wise
//                     and vectorised
//   model.rs          encoder (3 × LSTM) + attentive decoder
//   early_stopping.rs patience counter on a monitored loss
//   trainer.rs        Adam, teacher forcing, per-epoch validation
//   inferencer.rs     batched one-shot decoding
//
// Backends: NdArray on the CPU by default; the `wgpu` feature
// switches to Wgpu. Training wraps either one in Autodiff.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Bahdanau et al. (2015)

pub mod lstm;

pub mod attention;

/// Encoder-decoder summarizer
pub mod model;

pub mod early_stopping;

/// Training loop with validation and early stopping
pub mod trainer;

/// Batched summary generation from a trained model
pub mod inferencer;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;
