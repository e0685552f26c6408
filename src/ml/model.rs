// ============================================================
// Layer 5 — Encoder-Decoder Summarizer
// ============================================================
//
//   encoder_input [B, Tenc]
//       │ Embedding(src_vocab → 128)
//       ▼
//   LSTM × 3  (dropout 0.4, recurrent dropout 0.4)
//       │ states [B, Tenc, H], final (h, c)
//       ▼
//   decoder_input [B, Tdec]
//       │ Embedding(tar_vocab → 128)
//       ▼
//   LSTM  (starts from the encoder's final (h, c);
//          dropout 0.4, recurrent dropout 0.2)
//       │ states [B, Tdec, H]
//       ▼
//   Bahdanau attention over the encoder states
//       │ context [B, Tdec, H]
//       ▼
//   concat[decoder state, context]  [B, Tdec, 2H]
//       │ Linear(2H → tar_vocab)
//       ▼
//   logits [B, Tdec, tar_vocab]
//
// Padding positions are fed through like any other token; no
// masking is applied anywhere.

use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

use crate::config::SummarizerConfig;
use crate::domain::context::InferenceContext;
use crate::ml::attention::{BahdanauAttention, BahdanauAttentionConfig};
use crate::ml::lstm::{LstmLayer, LstmLayerConfig, RecurrentState};

#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    pub src_vocab_size: usize,
    pub tar_vocab_size: usize,
    #[config(default = 128)]
    pub embedding_dim: usize,
    #[config(default = 256)]
    pub hidden_size: usize,
    #[config(default = 3)]
    pub encoder_layers: usize,
    #[config(default = 0.4)]
    pub encoder_dropout: f64,
    #[config(default = 0.4)]
    pub encoder_recurrent_dropout: f64,
    #[config(default = 0.4)]
    pub decoder_dropout: f64,
    #[config(default = 0.2)]
    pub decoder_recurrent_dropout: f64,
}

impl Seq2SeqConfig {
    /// Architecture and dropout rates of a training run.
    pub fn from_settings(cfg: &SummarizerConfig) -> Self {
        Self::new(cfg.src_vocab_size, cfg.tar_vocab_size)
            .with_embedding_dim(cfg.embedding_dim)
            .with_hidden_size(cfg.hidden_size)
            .with_encoder_layers(cfg.encoder_layers)
            .with_encoder_dropout(cfg.encoder_dropout)
            .with_encoder_recurrent_dropout(cfg.encoder_recurrent_dropout)
            .with_decoder_dropout(cfg.decoder_dropout)
            .with_decoder_recurrent_dropout(cfg.decoder_recurrent_dropout)
    }

    /// Architecture recorded in a persisted context. Dropout rates
    /// do not shape the weights and stay at their defaults.
    pub fn from_context(ctx: &InferenceContext) -> Self {
        Self::new(ctx.src_vocab_size(), ctx.tar_vocab_size())
            .with_embedding_dim(ctx.embedding_dim())
            .with_hidden_size(ctx.hidden_size())
            .with_encoder_layers(ctx.encoder_layers())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2Seq<B> {
        let encoder_layers = (0..self.encoder_layers)
            .map(|i| {
                let d_input = if i == 0 { self.embedding_dim } else { self.hidden_size };
                LstmLayerConfig::new(d_input, self.hidden_size)
                    .with_dropout(self.encoder_dropout)
                    .with_recurrent_dropout(self.encoder_recurrent_dropout)
                    .init(device)
            })
            .collect();

        let encoder = Encoder {
            embedding: EmbeddingConfig::new(self.src_vocab_size, self.embedding_dim).init(device),
            layers:    encoder_layers,
        };

        let decoder = Decoder {
            embedding: EmbeddingConfig::new(self.tar_vocab_size, self.embedding_dim).init(device),
            lstm:      LstmLayerConfig::new(self.embedding_dim, self.hidden_size)
                .with_dropout(self.decoder_dropout)
                .with_recurrent_dropout(self.decoder_recurrent_dropout)
                .init(device),
            attention: BahdanauAttentionConfig::new(self.hidden_size, self.hidden_size).init(device),
            output:    LinearConfig::new(2 * self.hidden_size, self.tar_vocab_size).init(device),
        };

        Seq2Seq { encoder, decoder }
    }
}

// ─── Encoder ──────────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub layers:    Vec<LstmLayer<B>>,
}

/// What the decoder sees of the source: the last layer's
/// per-position states and its final state.
#[derive(Debug, Clone)]
pub struct EncoderOutput<B: Backend> {
    /// `[batch, src_len, hidden]`
    pub states: Tensor<B, 3>,
    pub last:   RecurrentState<B>,
}

impl<B: Backend> Encoder<B> {
    /// input: `[batch, src_len]` token indices
    pub fn forward(&self, input: Tensor<B, 2, Int>) -> EncoderOutput<B> {
        let [batch, _] = input.dims();
        let device = input.device();

        let mut x = self.embedding.forward(input);
        let mut last = None;
        // every layer starts from a zero state and feeds the next
        for layer in &self.layers {
            let (out, state) = layer.forward(x, None);
            x = out;
            last = Some(state);
        }

        let hidden = x.dims()[2];
        EncoderOutput {
            states: x,
            last:   last.unwrap_or_else(|| RecurrentState::zeros(batch, hidden, &device)),
        }
    }
}

// ─── Decoder ──────────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub embedding: Embedding<B>,
    pub lstm:      LstmLayer<B>,
    pub attention: BahdanauAttention<B>,
    /// concat[decoder state, context] → target vocabulary logits
    pub output:    Linear<B>,
}

impl<B: Backend> Decoder<B> {
    /// input: `[batch, tar_len]` → (logits `[batch, tar_len, vocab]`,
    /// alignment `[batch, tar_len, src_len]`)
    pub fn forward(
        &self,
        input:   Tensor<B, 2, Int>,
        encoder: &EncoderOutput<B>,
    ) -> (Tensor<B, 3>, Tensor<B, 3>) {
        let embedded = self.embedding.forward(input);
        let (states, _) = self.lstm.forward(embedded, Some(encoder.last.clone()));

        let attended = self.attention.forward(encoder.states.clone(), states.clone());
        let combined = Tensor::cat(vec![states, attended.context], 2);

        (self.output.forward(combined), attended.weights)
    }
}

// ─── Seq2Seq ──────────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct Seq2Seq<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

pub struct Seq2SeqOutput<B: Backend> {
    /// Unnormalised token scores, `[batch, tar_len, tar_vocab]`
    pub logits:    Tensor<B, 3>,
    /// Attention weights, `[batch, tar_len, src_len]`
    pub alignment: Tensor<B, 3>,
}

impl<B: Backend> Seq2Seq<B> {
    pub fn forward(
        &self,
        encoder_input: Tensor<B, 2, Int>,
        decoder_input: Tensor<B, 2, Int>,
    ) -> Seq2SeqOutput<B> {
        let encoded = self.encoder.forward(encoder_input);
        let (logits, alignment) = self.decoder.forward(decoder_input, &encoded);
        Seq2SeqOutput { logits, alignment }
    }

    /// Mean cross-entropy over every target position, taking the
    /// true next token as an index (no one-hot expansion).
    pub fn forward_loss(
        &self,
        encoder_input:  Tensor<B, 2, Int>,
        decoder_input:  Tensor<B, 2, Int>,
        decoder_target: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Seq2SeqOutput<B>) {
        let output = self.forward(encoder_input, decoder_input);
        let [batch, len, vocab] = output.logits.dims();

        let ce = CrossEntropyLossConfig::new().init(&output.logits.device());
        let loss = ce.forward(
            output.logits.clone().reshape([batch * len, vocab]),
            decoder_target.reshape([batch * len]),
        );
        (loss, output)
    }

    /// Arg-max token at every decoder position, `[batch, tar_len]`.
    pub fn predict(
        &self,
        encoder_input: Tensor<B, 2, Int>,
        decoder_input: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2, Int> {
        let logits = self.forward(encoder_input, decoder_input).logits;
        let [batch, len, _] = logits.dims();
        logits.argmax(2).reshape([batch, len])
    }
}
