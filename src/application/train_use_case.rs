// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load training collections    (Layer 4 - data)
//   Step 2: Split train/validation       (Layer 4 - data)
//   Step 3: Fit both vocabularies        (Layer 3 - domain)
//   Step 4: Build the inference context  (Layer 3 - domain)
//   Step 5: Encode samples and datasets  (Layer 4 - data)
//   Step 6: Save config, open metrics    (Layer 6 - infra)
//   Step 7: Run training loop            (Layer 5 - ml)
//
// Vocabularies are fitted on the training split only: source
// on the dialogues, target on the summaries. After every epoch
// the metrics row is appended and the epoch's artifact written.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use burn::{module::AutodiffModule, prelude::*, tensor::backend::AutodiffBackend};

use crate::config::SummarizerConfig;
use crate::data::{
    dataset::{DecoderFeed, SampleBuilder, SummaryDataset},
    loader::JsonDialogueLoader,
    splitter::split_train_val,
};
use crate::domain::{context::InferenceContext, traits::DialogueSource, vocabulary::Vocabulary};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    inferencer::Inferencer,
    model::Seq2SeqConfig,
    trainer,
    InferBackend, TrainBackend,
};

/// What a finished run hands back: a ready inferencer on the
/// non-autodiff backend plus the per-epoch history.
pub struct TrainReport<B: Backend> {
    pub inferencer:    Inferencer<B>,
    pub history:       Vec<EpochMetrics>,
    pub stopped_early: bool,
}

pub struct TrainUseCase {
    config: SummarizerConfig,
}

impl TrainUseCase {
    pub fn new(config: SummarizerConfig) -> Self {
        Self { config }
    }

    /// Train on the default device of the crate's backend.
    pub fn execute(&self) -> Result<TrainReport<InferBackend>> {
        self.execute_on::<TrainBackend>(&Default::default())
    }

    pub fn execute_on<B: AutodiffBackend>(
        &self,
        device: &B::Device,
    ) -> Result<TrainReport<B::InnerBackend>> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load training collections ────────────────────────────────
        tracing::info!("Loading training data from '{}'", cfg.dataset_path.display());
        let records = JsonDialogueLoader::train(&cfg.dataset_path).load_all()?;
        tracing::info!("Loaded {} dialogues", records.len());

        // ── Step 2: Train / validation split ─────────────────────────────────
        let (train_records, val_records) = split_train_val(records, cfg.train_fraction, cfg.split_seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_records.len(),
            val_records.len()
        );

        // ── Step 3: Fit vocabularies on the training split ───────────────────
        let dialogues: Vec<&str> = train_records.iter().map(|r| r.dialogue.as_str()).collect();
        let summaries: Vec<&str> = train_records
            .iter()
            .map(|r| r.summary.as_deref().unwrap_or(""))
            .collect();

        let src_vocab = Vocabulary::fit(&dialogues, cfg.src_vocab_size);
        let tar_vocab = Vocabulary::fit(&summaries, cfg.tar_vocab_size);
        tracing::info!(
            "Vocabularies: {}/{} source entries, {}/{} target entries",
            src_vocab.len(),
            src_vocab.capacity(),
            tar_vocab.len(),
            tar_vocab.capacity()
        );
        if src_vocab.is_empty() || tar_vocab.is_empty() {
            tracing::warn!("A vocabulary holds only the reserved tokens; every word maps to <unk>");
        }

        // ── Step 4: Inference context ────────────────────────────────────────
        let context = InferenceContext::new(src_vocab, tar_vocab, cfg);
        context.validate()?;

        // ── Step 5: Samples and datasets ─────────────────────────────────────
        let builder = SampleBuilder::from_context(&context);
        let train_set = SummaryDataset::new(
            train_records
                .iter()
                .map(|r| builder.labelled(r, DecoderFeed::TeacherForced))
                .collect(),
        );
        let val_set = SummaryDataset::new(
            val_records
                .iter()
                .map(|r| builder.labelled(r, DecoderFeed::StartOnly))
                .collect(),
        );

        // ── Step 6: Config snapshot and metrics log ──────────────────────────
        let ckpt    = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt.save_config(cfg)?;
        let metrics = MetricsLogger::new(ckpt.dir())?;

        // ── Step 7: Training loop (Layer 5) ──────────────────────────────────
        let model = Seq2SeqConfig::from_settings(cfg).init::<B>(device);
        let outcome = trainer::train(cfg, model, train_set, val_set, device, |m, model| {
            metrics.log(m)?;
            ckpt.save_epoch(m.epoch, model, &context)?;
            Ok(())
        })?;

        tracing::info!("Metrics written to '{}'", metrics.csv_path().display());

        Ok(TrainReport {
            inferencer:    Inferencer::new(outcome.model.valid(), context, device.clone()),
            history:       outcome.history,
            stopped_early: outcome.stopped_early,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};

    use burn::backend::{Autodiff, NdArray};

    use crate::application::service::SummarizerService;
    use crate::domain::traits::ModelService;

    fn write_collection(dir: &Path, name: &str, entries: &[(&str, &str, Option<&str>)]) {
        fs::create_dir_all(dir).unwrap();
        let data: Vec<serde_json::Value> = entries
            .iter()
            .map(|(id, text, summary)| {
                let utterances: Vec<serde_json::Value> = text
                    .split(" / ")
                    .map(|u| serde_json::json!({ "utterance": u }))
                    .collect();
                let mut body = serde_json::json!({ "dialogue": utterances });
                if let Some(s) = summary {
                    body["summary"] = serde_json::json!(s);
                }
                serde_json::json!({ "header": { "dialogueInfo": { "dialogueID": id } }, "body": body })
            })
            .collect();
        fs::write(dir.join(name), serde_json::json!({ "data": data }).to_string()).unwrap();
    }

    fn tiny_config(root: &Path) -> SummarizerConfig {
        SummarizerConfig {
            dataset_path:    root.join("data"),
            checkpoint_dir:  root.join("ckpt"),
            embedding_dim:   4,
            hidden_size:     6,
            encoder_layers:  2,
            src_vocab_size:  40,
            tar_vocab_size:  30,
            text_max_len:    8,
            summary_max_len: 5,
            epochs:          1,
            batch_size:      2,
            ..SummarizerConfig::default()
        }
    }

    #[test]
    fn test_train_persist_restore_infer() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = tiny_config(tmp.path());

        let train_dir = cfg.dataset_path.join("train").join("train_data");
        write_collection(&train_dir, "a.json", &[
            ("t1", "안녕 / 오늘 뭐 해", Some("인사를 한다")),
            ("t2", "밥 먹었어 / 응 먹었어", Some("밥을 먹었다")),
            ("t3", "영화 볼래 / 좋아", Some("영화를 본다")),
        ]);
        write_collection(&train_dir, "b.json", &[
            ("t4", "내일 만나 / 그래", Some("내일 만난다")),
            ("t5", "비 온다 / 우산 챙겨", Some("비가 온다")),
        ]);
        write_collection(&cfg.dataset_path.join("test_data"), "c.json", &[
            ("q1", "오늘 영화 볼래", None),
            ("q2", "", None),
        ]);

        let report = TrainUseCase::new(cfg.clone())
            .execute_on::<Autodiff<NdArray>>(&Default::default())
            .unwrap();
        assert_eq!(report.history.len(), 1);
        assert!(report.history[0].train_loss.is_finite());

        // per-epoch artifacts and run metadata
        assert!(cfg.checkpoint_dir.join("0").join("context.json").exists());
        assert!(cfg.checkpoint_dir.join("metrics.csv").exists());
        assert!(cfg.checkpoint_dir.join("train_config.json").exists());

        let trained = SummarizerService::<NdArray>::with_inferencer(report.inferencer, Default::default(), 100);
        let before  = trained.infer_path(&cfg.dataset_path).unwrap();
        let ids: Vec<&str> = before.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2"]);

        let saved = tmp.path().join("saved");
        trained.persist(&saved).unwrap();

        let mut restored = SummarizerService::<NdArray>::new(Default::default(), 100);
        restored.restore(&saved).unwrap();
        assert_eq!(restored.infer_path(&cfg.dataset_path).unwrap(), before);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_loading() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SummarizerConfig { encoder_dropout: 1.0, ..tiny_config(tmp.path()) };
        let err = TrainUseCase::new(cfg)
            .execute_on::<Autodiff<NdArray>>(&Default::default())
            .err()
            .expect("config must be rejected");
        assert!(err.to_string().contains("encoder_dropout"));
    }

    #[test]
    fn test_missing_training_data_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = TrainUseCase::new(tiny_config(tmp.path()))
            .execute_on::<Autodiff<NdArray>>(&Default::default());
        assert!(result.is_err());
    }
}
