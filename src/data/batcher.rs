// ============================================================
// Layer 4 — Summary Batcher
// ============================================================
// Implements Burn's Batcher trait to stack SummarySamples into
// Int tensors.
//
//   Input:  N samples, encoder width S, decoder width T
//   Output: encoder_input  [N, S]
//           decoder_input  [N, T]
//           decoder_target [N, T]
//
// Every sample is already padded, so stacking is a flatten
// followed by a reshape.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::SummarySample;

/// A batch ready for the forward pass. Shapes are
/// `[batch_size, width]`.
#[derive(Debug, Clone)]
pub struct SummaryBatch<B: Backend> {
    pub encoder_input:  Tensor<B, 2, Int>,
    pub decoder_input:  Tensor<B, 2, Int>,
    pub decoder_target: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct SummaryBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SummaryBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Flatten equally long rows into one `[rows, width]` Int tensor.
pub fn stack_rows<B: Backend>(rows: &[&[u32]], device: &B::Device) -> Tensor<B, 2, Int> {
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    let flat: Vec<i64> = rows
        .iter()
        .flat_map(|r| r.iter().map(|&x| x as i64))
        .collect();

    Tensor::<B, 2, Int>::from_data(TensorData::new(flat, [rows.len(), width]), device)
}

impl<B: Backend> Batcher<SummarySample, SummaryBatch<B>> for SummaryBatcher<B> {
    fn batch(&self, items: Vec<SummarySample>) -> SummaryBatch<B> {
        let encoder: Vec<&[u32]> = items.iter().map(|s| s.encoder_input.as_slice()).collect();
        let decoder: Vec<&[u32]> = items.iter().map(|s| s.decoder_input.as_slice()).collect();
        let target:  Vec<&[u32]> = items.iter().map(|s| s.decoder_target.as_slice()).collect();

        SummaryBatch {
            encoder_input:  stack_rows(&encoder, &self.device),
            decoder_input:  stack_rows(&decoder, &self.device),
            decoder_target: stack_rows(&target, &self.device),
        }
    }
}
