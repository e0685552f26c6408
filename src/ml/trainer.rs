// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Teacher-forced training with Adam, validation after every
// epoch, early stopping on the validation loss.
//
// Backends:
//   - training runs on B (an AutodiffBackend) so loss.backward()
//     has a graph to walk; LSTM dropout is active there
//   - model.valid() moves the weights to B::InnerBackend, where
//     no graph is recorded and dropout is off
//   - the validation batcher therefore also builds InnerBackend
//     tensors
//
// Losses:
//   train_loss  mean of the per-batch losses
//   val_loss    per-batch losses weighted by batch size, so a
//               short last batch counts for what it holds
//
// The validation pass also logs, at debug level, how peaked the
// alignment rows are (mean of each row's largest weight).
//
// With an empty validation split there is nothing to monitor
// except the training loss; that substitution is logged.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::config::SummarizerConfig;
use crate::data::{batcher::SummaryBatcher, dataset::SummaryDataset};
use crate::infra::metrics::EpochMetrics;
use crate::ml::early_stopping::EarlyStopping;
use crate::ml::model::Seq2Seq;

const SHUFFLE_SEED: u64 = 42;

pub struct TrainingOutcome<B: AutodiffBackend> {
    pub model:         Seq2Seq<B>,
    pub history:       Vec<EpochMetrics>,
    pub stopped_early: bool,
}

/// Train `model` for up to `cfg.epochs` epochs.
///
/// `on_epoch` runs after each epoch with that epoch's metrics and
/// the current weights; an error from it aborts training.
pub fn train<B, F>(
    cfg:        &SummarizerConfig,
    mut model:  Seq2Seq<B>,
    train_set:  SummaryDataset,
    val_set:    SummaryDataset,
    device:     &B::Device,
    mut on_epoch: F,
) -> Result<TrainingOutcome<B>>
where
    B: AutodiffBackend,
    F: FnMut(&EpochMetrics, &Seq2Seq<B>) -> Result<()>,
{
    if train_set.sample_count() == 0 {
        bail!("training set is empty");
    }
    if cfg.batch_size == 0 {
        bail!("batch_size must be positive");
    }

    let monitor_train = val_set.sample_count() == 0;
    if monitor_train {
        tracing::warn!("Validation split is empty; early stopping follows the training loss");
    }
    tracing::info!(
        "Training on {} samples, validating on {}",
        train_set.sample_count(),
        val_set.sample_count(),
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    let train_loader = DataLoaderBuilder::new(SummaryBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(SHUFFLE_SEED)
        .num_workers(1)
        .build(train_set);

    let val_loader = DataLoaderBuilder::new(SummaryBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_set);

    let mut stopper       = EarlyStopping::new(cfg.patience);
    let mut history       = Vec::with_capacity(cfg.epochs);
    let mut stopped_early = false;

    for epoch in 0..cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(
                batch.encoder_input,
                batch.decoder_input,
                batch.decoder_target,
            );

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }

        let train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_loss_sum  = 0.0f64;
        let mut val_focus_sum = 0.0f64;
        let mut val_samples   = 0usize;

        for batch in val_loader.iter() {
            let size = batch.encoder_input.dims()[0];
            let (loss, output) = model_valid.forward_loss(
                batch.encoder_input,
                batch.decoder_input,
                batch.decoder_target,
            );
            val_loss_sum  += loss.into_scalar().elem::<f64>() * size as f64;
            val_focus_sum += attention_focus(output.alignment) * size as f64;
            val_samples   += size;
        }

        let val_loss = if val_samples > 0 {
            val_loss_sum / val_samples as f64
        } else {
            f64::NAN
        };
        if val_samples > 0 {
            tracing::debug!(
                "Epoch {}: mean peak attention weight {:.3}",
                epoch + 1,
                val_focus_sum / val_samples as f64,
            );
        }

        let metrics = EpochMetrics::new(epoch, train_loss, val_loss);
        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4}",
            epoch + 1, cfg.epochs, train_loss, val_loss,
        );

        on_epoch(&metrics, &model)?;
        history.push(metrics);

        let monitored = if monitor_train { train_loss } else { val_loss };
        if stopper.observe(monitored) {
            tracing::info!(
                "Early stopping after epoch {}: no improvement on {:.4} for {} epochs",
                epoch + 1,
                stopper.best().unwrap_or(f64::NAN),
                cfg.patience,
            );
            stopped_early = true;
            break;
        }
    }

    tracing::info!("Training complete!");
    Ok(TrainingOutcome { model, history, stopped_early })
}

/// Mean over decoder steps of the largest alignment weight.
/// 1/Tenc means attention is uniform; 1.0 means every step
/// looks at a single source position.
fn attention_focus<B: Backend>(alignment: Tensor<B, 3>) -> f64 {
    alignment.max_dim(2).mean().into_scalar().elem::<f64>()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{Autodiff, NdArray};

    use crate::data::dataset::SummarySample;
    use crate::ml::model::Seq2SeqConfig;

    type TestBackend = Autodiff<NdArray>;

    fn sample(src: Vec<u32>, summary: Vec<u32>) -> SummarySample {
        let mut input = vec![2];
        input.extend(&summary);
        input.resize(4, 0);
        let mut target = summary;
        target.push(3);
        target.resize(4, 0);
        let mut encoder_input = src;
        encoder_input.resize(5, 0);
        SummarySample { encoder_input, decoder_input: input, decoder_target: target }
    }

    fn tiny_cfg(epochs: usize) -> SummarizerConfig {
        SummarizerConfig {
            embedding_dim:  4,
            hidden_size:    6,
            encoder_layers: 1,
            src_vocab_size: 10,
            tar_vocab_size: 8,
            epochs,
            batch_size:     2,
            learning_rate:  1e-2,
            ..SummarizerConfig::default()
        }
    }

    fn datasets() -> (SummaryDataset, SummaryDataset) {
        let train = SummaryDataset::new(vec![
            sample(vec![4, 5, 6], vec![4, 5]),
            sample(vec![7, 8], vec![6]),
            sample(vec![9], vec![7, 4]),
        ]);
        let val = SummaryDataset::new(vec![sample(vec![4, 9], vec![5])]);
        (train, val)
    }

    #[test]
    fn test_attention_focus_bounds() {
        let device = Default::default();
        let uniform = Tensor::<NdArray, 3>::ones([2, 3, 4], &device).div_scalar(4.0);
        assert!((attention_focus(uniform) - 0.25).abs() < 1e-6);

        let peaked = Tensor::<NdArray, 3>::from_floats([[[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]], &device);
        assert!((attention_focus(peaked) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_one_epoch_reports_finite_losses() {
        let cfg    = tiny_cfg(1);
        let device = Default::default();
        let model  = Seq2SeqConfig::from_settings(&cfg).init::<TestBackend>(&device);
        let (train_set, val_set) = datasets();

        let mut seen = Vec::new();
        let outcome = train(&cfg, model, train_set, val_set, &device, |m, _| {
            seen.push(m.epoch);
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec![0]);
        assert_eq!(outcome.history.len(), 1);
        assert!(outcome.history[0].train_loss.is_finite());
        assert!(outcome.history[0].val_loss.is_finite());
        assert!(!outcome.stopped_early);
    }

    #[test]
    fn test_training_updates_parameters() {
        let cfg    = tiny_cfg(1);
        let device = Default::default();
        let model  = Seq2SeqConfig::from_settings(&cfg).init::<TestBackend>(&device);
        let before: Vec<f32> = model.decoder.output.weight.val().into_data().to_vec().unwrap();
        let (train_set, val_set) = datasets();

        let outcome = train(&cfg, model, train_set, val_set, &device, |_, _| Ok(())).unwrap();
        let after: Vec<f32> = outcome.model.decoder.output.weight.val().into_data().to_vec().unwrap();

        assert_eq!(before.len(), after.len());
        assert_ne!(before, after);
    }

    #[test]
    fn test_rising_validation_loss_stops_training() {
        let cfg = SummarizerConfig {
            encoder_dropout:           0.0,
            encoder_recurrent_dropout: 0.0,
            decoder_dropout:           0.0,
            decoder_recurrent_dropout: 0.0,
            learning_rate:             5e-2,
            ..tiny_cfg(8)
        };
        let device = Default::default();
        let model  = Seq2SeqConfig::from_settings(&cfg).init::<TestBackend>(&device);

        // training only ever sees token 4; validation asks for token 7 everywhere
        let train_set = SummaryDataset::new(vec![
            sample(vec![4, 5, 6], vec![4, 4]),
            sample(vec![7, 8], vec![4]),
            sample(vec![9, 5], vec![4, 4]),
            sample(vec![6], vec![4]),
        ]);
        let val_set = SummaryDataset::new(vec![SummarySample {
            encoder_input:  vec![4, 9, 0, 0, 0],
            decoder_input:  vec![2, 0, 0, 0],
            decoder_target: vec![7, 7, 7, 7],
        }]);

        let outcome = train(&cfg, model, train_set, val_set, &device, |_, _| Ok(())).unwrap();

        assert!(outcome.stopped_early);
        assert_eq!(outcome.history.len(), cfg.patience + 1);
        assert!(outcome.history.len() < cfg.epochs);
    }

    #[test]
    fn test_empty_validation_falls_back_to_training_loss() {
        let cfg    = tiny_cfg(2);
        let device = Default::default();
        let model  = Seq2SeqConfig::from_settings(&cfg).init::<TestBackend>(&device);
        let (train_set, _) = datasets();

        let outcome = train(&cfg, model, train_set, SummaryDataset::new(Vec::new()), &device, |_, _| Ok(()))
            .unwrap();
        assert_eq!(outcome.history.len(), 2);
        assert!(outcome.history[1].val_loss.is_nan());
        assert!(outcome.history[1].train_loss.is_finite());
    }

    #[test]
    fn test_empty_training_set_is_an_error() {
        let cfg    = tiny_cfg(1);
        let device = Default::default();
        let model  = Seq2SeqConfig::from_settings(&cfg).init::<TestBackend>(&device);

        let result = train(
            &cfg,
            model,
            SummaryDataset::new(Vec::new()),
            SummaryDataset::new(Vec::new()),
            &device,
            |_, _| Ok(()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_hook_error_aborts_training() {
        let cfg    = tiny_cfg(3);
        let device = Default::default();
        let model  = Seq2SeqConfig::from_settings(&cfg).init::<TestBackend>(&device);
        let (train_set, val_set) = datasets();

        let result = train(&cfg, model, train_set, val_set, &device, |_, _| {
            anyhow::bail!("disk full")
        });
        assert!(result.is_err());
    }
}
