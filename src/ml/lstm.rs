// ============================================================
// Layer 5 — LSTM Layer
// ============================================================
// One recurrent layer, stepped explicitly over the sequence so
// that dropout can be applied to both the inputs and the
// recurrent connection.
//
// Per step t (gate order i, f, g, o):
//
//   z  = x_t·W + h_{t-1}·U + b          [batch, 4H]
//   i  = σ(z_i)   f = σ(z_f)   g = tanh(z_g)   o = σ(z_o)
//   c_t = f ⊙ c_{t-1} + i ⊙ g
//   h_t = o ⊙ tanh(c_t)
//
// Dropout:
//   - input dropout masks x, recurrent dropout masks h_{t-1}
//   - one mask per sequence, reused at every step
//   - only while the backend tracks gradients (training);
//     inference runs the plain recurrence
//   - inverted scaling: kept units are divided by (1 - p)
//
// Reference: Hochreiter & Schmidhuber (1997) LSTM
//            Gal & Ghahramani (2016) variational RNN dropout

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{activation, Distribution},
};

#[derive(Config, Debug)]
pub struct LstmLayerConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
    #[config(default = 0.0)]
    pub dropout: f64,
    #[config(default = 0.0)]
    pub recurrent_dropout: f64,
}

impl LstmLayerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmLayer<B> {
        LstmLayer {
            input_gates:       LinearConfig::new(self.d_input, 4 * self.d_hidden).init(device),
            hidden_gates:      LinearConfig::new(self.d_hidden, 4 * self.d_hidden)
                .with_bias(false)
                .init(device),
            d_hidden:          self.d_hidden,
            dropout:           self.dropout,
            recurrent_dropout: self.recurrent_dropout,
        }
    }
}

#[derive(Module, Debug)]
pub struct LstmLayer<B: Backend> {
    /// x·W + b for all four gates
    input_gates:       Linear<B>,
    /// h·U for all four gates
    hidden_gates:      Linear<B>,
    d_hidden:          usize,
    dropout:           f64,
    recurrent_dropout: f64,
}

/// Hidden and cell state, both `[batch, hidden]`.
#[derive(Debug, Clone)]
pub struct RecurrentState<B: Backend> {
    pub hidden: Tensor<B, 2>,
    pub cell:   Tensor<B, 2>,
}

impl<B: Backend> RecurrentState<B> {
    pub fn zeros(batch: usize, d_hidden: usize, device: &B::Device) -> Self {
        Self {
            hidden: Tensor::zeros([batch, d_hidden], device),
            cell:   Tensor::zeros([batch, d_hidden], device),
        }
    }
}

/// Inverted-dropout keep mask of the given shape. `p` must be below 1.
fn keep_mask<B: Backend>(shape: [usize; 2], p: f64, device: &B::Device) -> Tensor<B, 2> {
    let keep = 1.0 - p;
    Tensor::<B, 2>::random(shape, Distribution::Bernoulli(keep), device).div_scalar(keep)
}

impl<B: Backend> LstmLayer<B> {
    /// input: `[batch, seq_len, d_input]`
    /// → (`[batch, seq_len, d_hidden]`, final state)
    ///
    /// Starts from `state` when given, from zeros otherwise.
    pub fn forward(
        &self,
        input: Tensor<B, 3>,
        state: Option<RecurrentState<B>>,
    ) -> (Tensor<B, 3>, RecurrentState<B>) {
        let [batch, seq_len, d_input] = input.dims();
        let h      = self.d_hidden;
        let device = input.device();
        let training = B::ad_enabled();

        let input = if training && self.dropout > 0.0 {
            let mask = keep_mask::<B>([batch, d_input], self.dropout, &device);
            input * mask.unsqueeze_dim::<3>(1).expand([batch, seq_len, d_input])
        } else {
            input
        };

        let recurrent_mask = (training && self.recurrent_dropout > 0.0)
            .then(|| keep_mask::<B>([batch, h], self.recurrent_dropout, &device));

        // input projections of every step at once: [batch, seq_len, 4H]
        let projected = self.input_gates.forward(input);

        let RecurrentState { mut hidden, mut cell } =
            state.unwrap_or_else(|| RecurrentState::zeros(batch, h, &device));

        let mut outputs = Vec::with_capacity(seq_len);
        for t in 0..seq_len {
            let x_t = projected
                .clone()
                .slice([0..batch, t..t + 1, 0..4 * h])
                .reshape([batch, 4 * h]);

            let h_prev = match &recurrent_mask {
                Some(mask) => hidden.clone() * mask.clone(),
                None       => hidden.clone(),
            };
            let z = x_t + self.hidden_gates.forward(h_prev);

            let i = activation::sigmoid(z.clone().slice([0..batch, 0..h]));
            let f = activation::sigmoid(z.clone().slice([0..batch, h..2 * h]));
            let g = activation::tanh(z.clone().slice([0..batch, 2 * h..3 * h]));
            let o = activation::sigmoid(z.slice([0..batch, 3 * h..4 * h]));

            cell   = f * cell + i * g;
            hidden = o * activation::tanh(cell.clone());
            outputs.push(hidden.clone());
        }

        let output = if outputs.is_empty() {
            Tensor::zeros([batch, 0, h], &device)
        } else {
            Tensor::stack(outputs, 1)
        };

        (output, RecurrentState { hidden, cell })
    }
}
