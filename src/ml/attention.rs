// ============================================================
// Layer 5 — Additive (Bahdanau) Attention
// ============================================================
// For every decoder step t, scores every encoder position i
// and averages the encoder states under those scores.
//
//   E   encoder states   [batch, Tenc, Henc]
//   D   decoder states   [batch, Tdec, Hdec]
//
//   energy  e[t,i] = Va · tanh(E[i]·Wa + D[t]·Ua)
//   weights A[t]   = softmax_i(e[t])            (rows sum to 1)
//   context C[t]   = Σ_i A[t,i] · E[i]
//
// Trainable weights:
//   Wa [Henc, Henc]   Ua [Hdec, Henc]   Va [Henc, 1]
//   all drawn uniformly from [-0.05, 0.05]
//
// forward() walks the decoder steps one at a time (an energy
// step, then a context step), holding a single
// [batch, Tenc, Henc] tensor per step. forward_vectorized()
// scores all steps at once through a
// [batch, Tdec, Tenc, Henc] tensor; it applies the weights in
// the same order and normalises over the same axis, so both
// produce the same alignment and context.
//
// Reference: Bahdanau et al. (2015) Neural Machine Translation
//            by Jointly Learning to Align and Translate

use burn::{
    module::Param,
    nn::Initializer,
    prelude::*,
    tensor::activation,
};

#[derive(Config, Debug)]
pub struct BahdanauAttentionConfig {
    /// Width of the encoder states (Henc)
    pub d_encoder: usize,
    /// Width of the decoder states (Hdec)
    pub d_decoder: usize,
    #[config(default = "Initializer::Uniform { min: -0.05, max: 0.05 }")]
    pub initializer: Initializer,
}

impl BahdanauAttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> BahdanauAttention<B> {
        BahdanauAttention {
            w_a: self.initializer.init([self.d_encoder, self.d_encoder], device),
            u_a: self.initializer.init([self.d_decoder, self.d_encoder], device),
            v_a: self.initializer.init([self.d_encoder, 1], device),
        }
    }
}

#[derive(Module, Debug)]
pub struct BahdanauAttention<B: Backend> {
    /// Alignment projection of the encoder states
    w_a: Param<Tensor<B, 2>>,
    /// Alignment projection of the decoder state
    u_a: Param<Tensor<B, 2>>,
    /// Scoring vector
    v_a: Param<Tensor<B, 2>>,
}

/// Result of attending a whole decoder sequence.
#[derive(Debug, Clone)]
pub struct AttentionOutput<B: Backend> {
    /// `[batch, Tdec, Henc]`
    pub context: Tensor<B, 3>,
    /// `[batch, Tdec, Tenc]`, each row a distribution over encoder positions
    pub weights: Tensor<B, 3>,
}

/// `[batch, len, d]·[d, k] → [batch, len, k]`
fn project<B: Backend>(x: Tensor<B, 3>, w: Tensor<B, 2>) -> Tensor<B, 3> {
    let [batch, len, d] = x.dims();
    let [_, k] = w.dims();
    x.reshape([batch * len, d]).matmul(w).reshape([batch, len, k])
}

impl<B: Backend> BahdanauAttention<B> {
    /// E·Wa, shared by every decoder step.
    pub fn project_encoder(&self, encoder: Tensor<B, 3>) -> Tensor<B, 3> {
        project(encoder, self.w_a.val())
    }

    /// Alignment of one decoder state against all encoder positions.
    ///
    /// encoder_proj: `[batch, Tenc, Henc]` (from `project_encoder`)
    /// decoder_state: `[batch, Hdec]`
    /// → `[batch, Tenc]`
    pub fn energy_step(&self, encoder_proj: Tensor<B, 3>, decoder_state: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, t_enc, h_enc] = encoder_proj.dims();

        let u = decoder_state
            .matmul(self.u_a.val())
            .unsqueeze_dim::<3>(1)
            .expand([batch, t_enc, h_enc]);

        let energy = project(activation::tanh(encoder_proj + u), self.v_a.val())
            .reshape([batch, t_enc]);

        activation::softmax(energy, 1)
    }

    /// Weighted sum of the encoder states under one alignment row.
    ///
    /// encoder: `[batch, Tenc, Henc]`, weights: `[batch, Tenc]`
    /// → `[batch, Henc]`
    pub fn context_step(encoder: Tensor<B, 3>, weights: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, t_enc, h_enc] = encoder.dims();
        let weights = weights.reshape([batch, t_enc, 1]).expand([batch, t_enc, h_enc]);

        (encoder * weights).sum_dim(1).reshape([batch, h_enc])
    }

    /// Step-wise recurrence over the decoder sequence.
    pub fn forward(&self, encoder: Tensor<B, 3>, decoder: Tensor<B, 3>) -> AttentionOutput<B> {
        let [batch, t_dec, h_dec] = decoder.dims();
        let encoder_proj = self.project_encoder(encoder.clone());

        let mut contexts = Vec::with_capacity(t_dec);
        let mut weights  = Vec::with_capacity(t_dec);

        for t in 0..t_dec {
            let state = decoder
                .clone()
                .slice([0..batch, t..t + 1, 0..h_dec])
                .reshape([batch, h_dec]);

            let a_t = self.energy_step(encoder_proj.clone(), state);
            contexts.push(Self::context_step(encoder.clone(), a_t.clone()));
            weights.push(a_t);
        }

        AttentionOutput {
            context: Tensor::stack(contexts, 1),
            weights: Tensor::stack(weights, 1),
        }
    }

    /// All decoder steps in one pass. Memory grows with
    /// `batch × Tdec × Tenc × Henc`.
    #[cfg(test)]
    pub fn forward_vectorized(&self, encoder: Tensor<B, 3>, decoder: Tensor<B, 3>) -> AttentionOutput<B> {
        let [batch, t_enc, h_enc] = encoder.dims();
        let [_, t_dec, _] = decoder.dims();
        let shape = [batch, t_dec, t_enc, h_enc];

        let ws = self
            .project_encoder(encoder.clone())
            .unsqueeze_dim::<4>(1)
            .expand(shape);
        let uh = project(decoder, self.u_a.val())
            .unsqueeze_dim::<4>(2)
            .expand(shape);

        let energy = activation::tanh(ws + uh)
            .reshape([batch * t_dec * t_enc, h_enc])
            .matmul(self.v_a.val())
            .reshape([batch, t_dec, t_enc]);
        let weights = activation::softmax(energy, 2);

        AttentionOutput {
            context: weights.clone().matmul(encoder),
            weights,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::{backend::NdArray, tensor::Distribution};

    type TestBackend = NdArray;

    fn values<const D: usize>(t: Tensor<TestBackend, D>) -> Vec<f32> {
        t.into_data().to_vec().unwrap()
    }

    fn setup(
        batch: usize,
        t_enc: usize,
        t_dec: usize,
    ) -> (BahdanauAttention<TestBackend>, Tensor<TestBackend, 3>, Tensor<TestBackend, 3>) {
        let device = Default::default();
        let attn = BahdanauAttentionConfig::new(4, 3)
            .with_initializer(Initializer::Uniform { min: -1.0, max: 1.0 })
            .init::<TestBackend>(&device);
        let enc = Tensor::random([batch, t_enc, 4], Distribution::Uniform(-2.0, 2.0), &device);
        let dec = Tensor::random([batch, t_dec, 3], Distribution::Uniform(-2.0, 2.0), &device);
        (attn, enc, dec)
    }

    #[test]
    fn test_output_shapes() {
        let (attn, enc, dec) = setup(2, 5, 3);
        let out = attn.forward(enc, dec);
        assert_eq!(out.context.dims(), [2, 3, 4]);
        assert_eq!(out.weights.dims(), [2, 3, 5]);
    }

    #[test]
    fn test_alignment_rows_are_distributions() {
        let (attn, enc, dec) = setup(2, 6, 4);
        let weights = values(attn.forward(enc, dec).weights);

        for row in weights.chunks(6) {
            assert!(row.iter().all(|&w| w >= 0.0));
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "row sums to {sum}");
        }
    }

    #[test]
    fn test_context_is_weighted_average_of_encoder_states() {
        let (batch, t_enc, t_dec, h) = (2, 5, 3, 4);
        let (attn, enc, dec) = setup(batch, t_enc, t_dec);
        let out = attn.forward(enc.clone(), dec);

        let e = values(enc);
        let a = values(out.weights);
        let c = values(out.context);

        for b in 0..batch {
            for t in 0..t_dec {
                for k in 0..h {
                    let col: Vec<f32> = (0..t_enc).map(|i| e[(b * t_enc + i) * h + k]).collect();
                    let expected: f32 = (0..t_enc)
                        .map(|i| a[(b * t_dec + t) * t_enc + i] * col[i])
                        .sum();
                    let got = c[(b * t_dec + t) * h + k];
                    assert!((got - expected).abs() < 1e-4);

                    // inside the hull of the encoder states, coordinate-wise
                    let lo = col.iter().cloned().fold(f32::INFINITY, f32::min);
                    let hi = col.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
                    assert!(got >= lo - 1e-4 && got <= hi + 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_stepwise_and_vectorized_agree() {
        let (attn, enc, dec) = setup(3, 7, 5);
        let step = attn.forward(enc.clone(), dec.clone());
        let vect = attn.forward_vectorized(enc, dec);

        for (x, y) in values(step.weights).iter().zip(values(vect.weights).iter()) {
            assert!((x - y).abs() < 1e-5);
        }
        for (x, y) in values(step.context).iter().zip(values(vect.context).iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_single_decoder_step() {
        let (attn, enc, dec) = setup(1, 4, 1);
        let out = attn.forward(enc, dec);
        assert_eq!(out.weights.dims(), [1, 1, 4]);
    }

    #[test]
    fn test_all_zero_encoder_gives_uniform_alignment() {
        let device = Default::default();
        let (attn, _, dec) = setup(2, 5, 3);
        let enc = Tensor::<TestBackend, 3>::zeros([2, 5, 4], &device);

        let out = attn.forward(enc, dec);
        for w in values(out.weights) {
            assert!((w - 0.2).abs() < 1e-6);
        }
        assert!(values(out.context).iter().all(|c| c.abs() < 1e-6));
    }
}
