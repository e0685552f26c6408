// ============================================================
// Layer 1 — CLI Flags
// ============================================================
// The four flags the harness passes. Everything else (paths,
// hyperparameters) comes from SummarizerConfig.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for bad values
//   - type conversion (string → usize, u8, Mode)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, ValueEnum};

/// What a non-paused run does
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Fit vocabularies and train, checkpointing every epoch
    #[default]
    Train,
    /// Restore a checkpoint and summarise the test collections
    Infer,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(long, value_enum, default_value_t = Mode::Train)]
    pub mode: Mode,

    /// Number of training epochs (overrides the config file)
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Checkpoint to restore in infer mode: an epoch number or "latest"
    #[arg(long, default_value = "0")]
    pub iteration: String,

    /// Non-zero: serve harness commands on stdin instead of running a mode
    #[arg(long, default_value_t = 0)]
    pub pause: u8,
}
