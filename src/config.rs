// ============================================================
// Configuration
// ============================================================
// All hyperparameters and paths of a run.
//
// Sources, each overriding the previous one:
//   1. Default
//   2. JSON file named by $SUMMARIZER_CONFIG (partial files are
//      fine, missing keys keep their defaults)
//   3. $DATASET_PATH and $CHECKPOINT_DIR
//   4. command-line flags (only --epochs maps here)
//
// Layering is done by figment; load() then rejects values the
// network cannot be built from. The effective config is written
// to <checkpoint_dir>/train_config.json when training starts.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::data::padding::Truncating;

pub const CONFIG_ENV:      &str = "SUMMARIZER_CONFIG";
pub const DATASET_ENV:     &str = "DATASET_PATH";
pub const CHECKPOINT_ENV:  &str = "CHECKPOINT_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Root holding train/train_data/* and test_data/*
    pub dataset_path:   PathBuf,
    /// Where per-epoch checkpoints, metrics.csv and the config go
    pub checkpoint_dir: PathBuf,

    pub embedding_dim:  usize,
    pub hidden_size:    usize,
    pub encoder_layers: usize,
    /// Source vocabulary cap and embedding width
    pub src_vocab_size: usize,
    /// Target vocabulary cap and output projection width
    pub tar_vocab_size: usize,

    pub text_max_len:    usize,
    pub summary_max_len: usize,
    pub truncating:      Truncating,

    pub encoder_dropout:           f64,
    pub encoder_recurrent_dropout: f64,
    pub decoder_dropout:           f64,
    pub decoder_recurrent_dropout: f64,

    pub epochs:         usize,
    pub batch_size:     usize,
    pub learning_rate:  f64,
    /// Epochs without validation improvement before stopping
    pub patience:       usize,
    /// Leading share of the records used for training
    pub train_fraction: f64,
    /// Shuffle before splitting when set; ordered split otherwise
    pub split_seed:     Option<u64>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            dataset_path:   PathBuf::from("data"),
            checkpoint_dir: PathBuf::from("checkpoints"),

            embedding_dim:  128,
            hidden_size:    256,
            encoder_layers: 3,
            src_vocab_size: 150_000,
            tar_vocab_size: 150_000,

            text_max_len:    100,
            summary_max_len: 100,
            truncating:      Truncating::Post,

            encoder_dropout:           0.4,
            encoder_recurrent_dropout: 0.4,
            decoder_dropout:           0.4,
            decoder_recurrent_dropout: 0.2,

            epochs:         1,
            batch_size:     100,
            learning_rate:  1e-3,
            patience:       2,
            train_fraction: 0.9,
            split_seed:     None,
        }
    }
}

impl SummarizerConfig {
    /// Defaults, then the optional JSON file, then the environment.
    pub fn load() -> Result<Self> {
        let file = env::var_os(CONFIG_ENV).map(PathBuf::from);
        let cfg: Self = Self::figment(file.as_deref())?
            .extract()
            .context("Invalid configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The provider stack behind [`SummarizerConfig::load`]. Env keys
    /// are lowercased by figment, so they land on the path fields as is.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            // Json::file skips a missing file silently
            if !path.is_file() {
                bail!("Cannot read config '{}'", path.display());
            }
            figment = figment.merge(Json::file(path));
        }
        Ok(figment.merge(Env::raw().only(&[DATASET_ENV, CHECKPOINT_ENV])))
    }

    /// Reject settings the network cannot be built or trained with.
    pub fn validate(&self) -> Result<()> {
        if self.encoder_layers == 0 {
            bail!("encoder_layers must be at least 1");
        }
        if self.batch_size == 0 {
            bail!("batch_size must be positive");
        }
        let dropouts = [
            ("encoder_dropout", self.encoder_dropout),
            ("encoder_recurrent_dropout", self.encoder_recurrent_dropout),
            ("decoder_dropout", self.decoder_dropout),
            ("decoder_recurrent_dropout", self.decoder_recurrent_dropout),
        ];
        for (name, p) in dropouts {
            if !(0.0..1.0).contains(&p) {
                bail!("{name} must lie in [0, 1), got {p}");
            }
        }
        if !(0.0..=1.0).contains(&self.train_fraction) {
            bail!("train_fraction must lie in [0, 1], got {}", self.train_fraction);
        }
        Ok(())
    }
}
