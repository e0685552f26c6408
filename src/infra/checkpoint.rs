// ============================================================
// Layer 6 — Checkpoints and Model Artifacts
// ============================================================
// A model artifact is a directory holding everything needed to
// predict again later:
//
//   <dir>/
//     model.mpk.gz    all learned parameters
//     context.json    vocabularies and network shape
//
// The weights alone are not enough: restore() reads
// context.json first, rebuilds a model of exactly that shape,
// and only then loads the parameters into it.
//
// Records use NamedMpkGzFileRecorder at full precision
// (MessagePack, gzip), so a restored model reproduces the
// persisted one's predictions exactly.
//
// Training checkpoints are artifacts named after their epoch:
//
//   <checkpoint_dir>/
//     0/  1/  2/ ...          one artifact per epoch
//     latest.json             name of the newest one
//     train_config.json       the run's effective config
//     metrics.csv             (infra::metrics)
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{anyhow, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::config::SummarizerConfig;
use crate::domain::context::InferenceContext;
use crate::ml::model::{Seq2Seq, Seq2SeqConfig};

const MODEL_FILE:   &str = "model";
const CONTEXT_FILE: &str = "context.json";
const LATEST_FILE:  &str = "latest.json";
const CONFIG_FILE:  &str = "train_config.json";

type ArtifactRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Write the weights and the inference context into `dir`.
pub fn save_artifact<B: Backend>(
    dir:     &Path,
    model:   &Seq2Seq<B>,
    context: &InferenceContext,
) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create '{}'", dir.display()))?;

    // the recorder appends .mpk.gz
    let model_path = dir.join(MODEL_FILE);
    ArtifactRecorder::new()
        .record(model.clone().into_record(), model_path.clone())
        .map_err(|e| anyhow!("Failed to save model to '{}': {e:?}", model_path.display()))?;

    let context_path = dir.join(CONTEXT_FILE);
    fs::write(&context_path, serde_json::to_string(context)?)
        .with_context(|| format!("Cannot write '{}'", context_path.display()))?;

    tracing::debug!("Saved model artifact to '{}'", dir.display());
    Ok(())
}

/// Rebuild a model and its context from an artifact directory.
pub fn load_artifact<B: Backend>(
    dir:    &Path,
    device: &B::Device,
) -> Result<(Seq2Seq<B>, InferenceContext)> {
    let context_path = dir.join(CONTEXT_FILE);
    let json = fs::read_to_string(&context_path)
        .with_context(|| format!("Cannot read '{}'", context_path.display()))?;
    let context: InferenceContext = serde_json::from_str(&json)
        .with_context(|| format!("Malformed context in '{}'", context_path.display()))?;
    context.validate()?;

    let model: Seq2Seq<B> = Seq2SeqConfig::from_context(&context).init(device);

    let model_path = dir.join(MODEL_FILE);
    let record = ArtifactRecorder::new()
        .load(model_path.clone(), device)
        .map_err(|e| anyhow!("Cannot load model from '{}': {e:?}", model_path.display()))?;

    tracing::info!("Restored model from '{}'", dir.display());
    Ok((model.load_record(record), context))
}

/// Per-epoch artifacts and run metadata under one directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory of the checkpoint called `name` (an epoch number
    /// for the ones training writes).
    pub fn checkpoint_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Save the artifact for `epoch` and point latest.json at it.
    pub fn save_epoch<B: Backend>(
        &self,
        epoch:   usize,
        model:   &Seq2Seq<B>,
        context: &InferenceContext,
    ) -> Result<PathBuf> {
        let name = epoch.to_string();
        let path = self.checkpoint_path(&name);
        save_artifact(&path, model, context)?;

        let latest_path = self.dir.join(LATEST_FILE);
        fs::write(&latest_path, serde_json::to_string(&name)?)
            .with_context(|| format!("Cannot write '{}'", latest_path.display()))?;

        tracing::info!("Checkpoint saved for epoch {}", epoch);
        Ok(path)
    }

    /// Name of the newest checkpoint.
    pub fn latest(&self) -> Result<String> {
        let path = self.dir.join(LATEST_FILE);
        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{}'. Have you trained first?", path.display()))?;
        Ok(serde_json::from_str::<String>(&s)?)
    }

    pub fn save_config(&self, cfg: &SummarizerConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }
}
