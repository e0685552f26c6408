// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Produces summaries for dialogues with a trained model.
//
// Per batch of records:
//   1. encode + pad every dialogue (source vocabulary)
//   2. decoder input = [<sos>, <pad>, <pad>, ...]
//   3. one forward pass, arg-max at every decoder position
//   4. render through the target vocabulary, dropping <pad>,
//      <sos> and <eos> (<unk> stays visible)
//
// Decoding is one-shot: every position is predicted from the
// same <sos>-only input in a single pass, and a predicted token
// is never fed back as the next step's input. This is not
// autoregressive greedy decoding.

use std::path::Path;

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::data::{batcher::stack_rows, dataset::SampleBuilder};
use crate::domain::{
    context::InferenceContext,
    dialogue::{DialogueRecord, SummaryResponse},
};
use crate::infra::checkpoint::load_artifact;
use crate::ml::model::Seq2Seq;

pub struct Inferencer<B: Backend> {
    model:   Seq2Seq<B>,
    context: InferenceContext,
    device:  B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(model: Seq2Seq<B>, context: InferenceContext, device: B::Device) -> Self {
        Self { model, context, device }
    }

    /// Restore from a model artifact directory.
    pub fn load(dir: &Path, device: B::Device) -> Result<Self> {
        let (model, context) = load_artifact::<B>(dir, &device)?;
        Ok(Self::new(model, context, device))
    }

    pub fn model(&self) -> &Seq2Seq<B> {
        &self.model
    }

    pub fn context(&self) -> &InferenceContext {
        &self.context
    }

    /// One summary per record, in input order.
    pub fn summarize(&self, records: &[DialogueRecord], batch_size: usize) -> Result<Vec<SummaryResponse>> {
        let builder = SampleBuilder::from_context(&self.context);
        let width   = self.context.summary_max_len();
        let mut out = Vec::with_capacity(records.len());

        for chunk in records.chunks(batch_size.max(1)) {
            let samples: Vec<_> = chunk.iter().map(|r| builder.unlabelled(r)).collect();
            let encoder: Vec<&[u32]> = samples.iter().map(|s| s.encoder_input.as_slice()).collect();
            let decoder: Vec<&[u32]> = samples.iter().map(|s| s.decoder_input.as_slice()).collect();

            let predicted = self.model.predict(
                stack_rows::<B>(&encoder, &self.device),
                stack_rows::<B>(&decoder, &self.device),
            );

            let ids: Vec<i64> = predicted
                .into_data()
                .convert::<i64>()
                .to_vec::<i64>()
                .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;

            for (record, row) in chunk.iter().zip(ids.chunks(width)) {
                let row: Vec<u32> = row.iter().map(|&i| i as u32).collect();
                let summary = self.context.tar_vocab().render(&row);
                tracing::debug!("{} → '{}'", record.id, summary);
                out.push(SummaryResponse::new(record.id.clone(), summary));
            }
        }

        Ok(out)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::config::SummarizerConfig;
    use crate::domain::vocabulary::Vocabulary;
    use crate::ml::model::Seq2SeqConfig;

    type TestBackend = NdArray;

    fn inferencer() -> Inferencer<TestBackend> {
        let cfg = SummarizerConfig {
            embedding_dim:   4,
            hidden_size:     5,
            encoder_layers:  1,
            src_vocab_size:  10,
            tar_vocab_size:  8,
            text_max_len:    6,
            summary_max_len: 4,
            ..SummarizerConfig::default()
        };
        let ctx = InferenceContext::new(
            Vocabulary::fit(&["오늘 날씨 좋다"], 10),
            Vocabulary::fit(&["날씨 좋음"], 8),
            &cfg,
        );
        let device = Default::default();
        let model  = Seq2SeqConfig::from_settings(&cfg).init::<TestBackend>(&device);
        Inferencer::new(model, ctx, device)
    }

    #[test]
    fn test_one_response_per_record_in_order() {
        let inf = inferencer();
        let records: Vec<DialogueRecord> = (0..5)
            .map(|i| DialogueRecord::new(format!("d{i}"), "오늘 날씨 좋다", None))
            .collect();

        let out = inf.summarize(&records, 2).unwrap();
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d0", "d1", "d2", "d3", "d4"]);
    }

    #[test]
    fn test_summaries_contain_no_sentinels() {
        let inf = inferencer();
        let out = inf
            .summarize(&[DialogueRecord::new("x", "", None)], 100)
            .unwrap();

        for word in out[0].summary.split_whitespace() {
            assert!(!["<pad>", "<sos>", "<eos>"].contains(&word));
        }
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let inf = inferencer();
        assert!(inf.summarize(&[], 100).unwrap().is_empty());
    }
}
