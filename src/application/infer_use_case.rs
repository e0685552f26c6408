// ============================================================
// Layer 2 — InferUseCase
// ============================================================
// Restores one training checkpoint and summarises the test
// collections under the dataset root.
//
//   <checkpoint_dir>/<iteration>/   the artifact to restore
//   <dataset_path>/test_data/*      the dialogues to summarise
//
// `iteration` is a checkpoint name ("0", "1", ...) or "latest",
// which follows <checkpoint_dir>/latest.json.

use anyhow::Result;
use burn::prelude::*;

use crate::application::service::SummarizerService;
use crate::config::SummarizerConfig;
use crate::domain::{dialogue::SummaryResponse, traits::ModelService};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::InferBackend;

pub const LATEST: &str = "latest";

pub struct InferUseCase {
    config:    SummarizerConfig,
    iteration: String,
}

impl InferUseCase {
    pub fn new(config: SummarizerConfig, iteration: impl Into<String>) -> Self {
        Self { config, iteration: iteration.into() }
    }

    pub fn execute(&self) -> Result<Vec<SummaryResponse>> {
        self.execute_on::<InferBackend>(Default::default())
    }

    pub fn execute_on<B: Backend>(&self, device: B::Device) -> Result<Vec<SummaryResponse>> {
        let cfg  = &self.config;
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir)?;

        let name = if self.iteration == LATEST {
            ckpt.latest()?
        } else {
            self.iteration.clone()
        };
        tracing::info!("Restoring checkpoint '{}'", name);

        let mut service = SummarizerService::<B>::new(device, cfg.batch_size);
        service.restore(&ckpt.checkpoint_path(&name))?;
        service.infer_path(&cfg.dataset_path)
    }
}
