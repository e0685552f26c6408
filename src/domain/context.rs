// ============================================================
// Layer 3 — Inference Context
// ============================================================
// Everything inference needs besides the weights themselves:
// both vocabularies and the sizes that fix the network shape
// and the preprocessing.
//
// Lifecycle:
//   built once when training has fitted the vocabularies
//   → persisted next to the weights (context.json)
//   → rebuilt verbatim by restore()
// It is never mutated after construction; every field is
// private and only exposed through getters.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;
use crate::data::padding::Truncating;
use crate::domain::vocabulary::Vocabulary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceContext {
    src_vocab:       Vocabulary,
    tar_vocab:       Vocabulary,
    embedding_dim:   usize,
    src_vocab_size:  usize,
    tar_vocab_size:  usize,
    hidden_size:     usize,
    encoder_layers:  usize,
    text_max_len:    usize,
    summary_max_len: usize,
    truncating:      Truncating,
}

impl InferenceContext {
    pub fn new(src_vocab: Vocabulary, tar_vocab: Vocabulary, cfg: &SummarizerConfig) -> Self {
        Self {
            src_vocab,
            tar_vocab,
            embedding_dim:   cfg.embedding_dim,
            src_vocab_size:  cfg.src_vocab_size,
            tar_vocab_size:  cfg.tar_vocab_size,
            hidden_size:     cfg.hidden_size,
            encoder_layers:  cfg.encoder_layers,
            text_max_len:    cfg.text_max_len,
            summary_max_len: cfg.summary_max_len,
            truncating:      cfg.truncating,
        }
    }

    /// Reject a context whose vocabularies cannot index the model's
    /// embedding and projection tables.
    pub fn validate(&self) -> Result<()> {
        if self.src_vocab.len() > self.src_vocab_size {
            bail!(
                "source vocabulary has {} entries but the model only embeds {}",
                self.src_vocab.len(),
                self.src_vocab_size
            );
        }
        if self.tar_vocab.len() > self.tar_vocab_size {
            bail!(
                "target vocabulary has {} entries but the model only projects {}",
                self.tar_vocab.len(),
                self.tar_vocab_size
            );
        }
        if self.text_max_len == 0 || self.summary_max_len == 0 {
            bail!("sequence lengths must be positive");
        }
        if self.encoder_layers == 0 {
            bail!("the encoder needs at least one layer");
        }
        Ok(())
    }

    pub fn src_vocab(&self) -> &Vocabulary { &self.src_vocab }
    pub fn tar_vocab(&self) -> &Vocabulary { &self.tar_vocab }
    pub fn embedding_dim(&self) -> usize { self.embedding_dim }
    pub fn src_vocab_size(&self) -> usize { self.src_vocab_size }
    pub fn tar_vocab_size(&self) -> usize { self.tar_vocab_size }
    pub fn hidden_size(&self) -> usize { self.hidden_size }
    pub fn encoder_layers(&self) -> usize { self.encoder_layers }
    pub fn text_max_len(&self) -> usize { self.text_max_len }
    pub fn summary_max_len(&self) -> usize { self.summary_max_len }
    pub fn truncating(&self) -> Truncating { self.truncating }
}
