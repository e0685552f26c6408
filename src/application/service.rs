// ============================================================
// Layer 2 — Summarizer Service
// ============================================================
// The ModelService the harness talks to. It holds at most one
// loaded model together with its inference context:
//
//   fresh service       → nothing loaded, infer/persist fail
//   after training      → with_inferencer(...)
//   after restore(dir)  → whatever dir holds, replacing the
//                         previous model entirely
//
// infer_path(root) is the harness-facing entry point: it reads
// <root>/test_data/* and summarises every record in file order.

use std::path::Path;

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::data::loader::JsonDialogueLoader;
use crate::domain::{
    dialogue::{DialogueRecord, SummaryResponse},
    traits::{DialogueSource, ModelService},
};
use crate::infra::checkpoint::save_artifact;
use crate::ml::inferencer::Inferencer;

pub struct SummarizerService<B: Backend> {
    inferencer: Option<Inferencer<B>>,
    device:     B::Device,
    batch_size: usize,
}

impl<B: Backend> SummarizerService<B> {
    /// A service with no model loaded yet.
    pub fn new(device: B::Device, batch_size: usize) -> Self {
        Self { inferencer: None, device, batch_size }
    }

    pub fn with_inferencer(inferencer: Inferencer<B>, device: B::Device, batch_size: usize) -> Self {
        Self { inferencer: Some(inferencer), device, batch_size }
    }

    /// Summarise every record under `<root>/test_data`.
    pub fn infer_path(&self, root: &Path) -> Result<Vec<SummaryResponse>> {
        let records = JsonDialogueLoader::test(root).load_all()?;
        tracing::info!("Summarising {} test dialogues", records.len());
        self.infer(&records)
    }

    fn loaded(&self) -> Result<&Inferencer<B>> {
        self.inferencer
            .as_ref()
            .ok_or_else(|| anyhow!("no model loaded: train or restore first"))
    }
}

impl<B: Backend> ModelService for SummarizerService<B> {
    fn persist(&self, dir: &Path) -> Result<()> {
        let inf = self.loaded()?;
        save_artifact(dir, inf.model(), inf.context())?;
        tracing::info!("Model persisted to '{}'", dir.display());
        Ok(())
    }

    fn restore(&mut self, dir: &Path) -> Result<()> {
        self.inferencer = Some(Inferencer::load(dir, self.device.clone())?);
        Ok(())
    }

    fn infer(&self, requests: &[DialogueRecord]) -> Result<Vec<SummaryResponse>> {
        self.loaded()?.summarize(requests, self.batch_size)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_empty_service_refuses_to_work() {
        let dir = tempfile::tempdir().unwrap();
        let svc = SummarizerService::<TestBackend>::new(Default::default(), 100);

        assert!(svc.persist(dir.path()).is_err());
        assert!(svc.infer(&[DialogueRecord::new("a", "b", None)]).is_err());
    }

    #[test]
    fn test_failed_restore_reports_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = SummarizerService::<TestBackend>::new(Default::default(), 100);

        assert!(svc.restore(dir.path()).is_err());
        assert!(svc.inferencer.is_none());
    }
}
