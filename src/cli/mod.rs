// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the flags with `clap` and routes to Layer 2.
//
//   --pause N (N ≠ 0)   harness session on stdin/stdout
//   --mode train        TrainUseCase, then the test collections
//                       (if present) through the trained model
//   --mode infer        InferUseCase, one JSON line per summary
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::io;

use anyhow::Result;
use clap::Parser;
use commands::{Mode, RunArgs};

use crate::application::{
    harness::HarnessSession,
    infer_use_case::InferUseCase,
    service::SummarizerService,
    train_use_case::TrainUseCase,
};
use crate::config::SummarizerConfig;
use crate::data::loader::Split;
use crate::domain::dialogue::SummaryResponse;
use crate::ml::InferBackend;

#[derive(Parser, Debug)]
#[command(
    name = "dialogue-summarizer",
    version = "0.1.0",
    about = "Train an attentive encoder-decoder on dialogue transcripts and summarise new ones."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: RunArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut cfg = SummarizerConfig::load()?;
        cfg.epochs = self.args.epochs;

        if self.args.pause != 0 {
            return self.run_harness(cfg);
        }

        match self.args.mode {
            Mode::Train => self.run_train(cfg),
            Mode::Infer => self.run_infer(cfg),
        }
    }

    fn run_harness(&self, cfg: SummarizerConfig) -> Result<()> {
        let service = SummarizerService::<InferBackend>::new(Default::default(), cfg.batch_size);
        let stdin   = io::stdin();
        let stdout  = io::stdout();
        HarnessSession::new(service).run(stdin.lock(), stdout.lock())
    }

    fn run_train(&self, cfg: SummarizerConfig) -> Result<()> {
        tracing::info!(
            "Starting training on '{}' for {} epochs",
            cfg.dataset_path.display(),
            cfg.epochs
        );

        let dataset_path   = cfg.dataset_path.clone();
        let checkpoint_dir = cfg.checkpoint_dir.clone();
        let batch_size     = cfg.batch_size;
        let report = TrainUseCase::new(cfg).execute()?;

        if report.stopped_early {
            println!("Stopped early after {} epochs.", report.history.len());
        }
        println!("Training complete. Checkpoints saved to '{}'.", checkpoint_dir.display());

        if !Split::Test.dir(&dataset_path).is_dir() {
            return Ok(());
        }
        let service = SummarizerService::with_inferencer(report.inferencer, Default::default(), batch_size);
        print_summaries(&service.infer_path(&dataset_path)?)
    }

    fn run_infer(&self, cfg: SummarizerConfig) -> Result<()> {
        let summaries = InferUseCase::new(cfg, self.args.iteration.clone()).execute()?;
        print_summaries(&summaries)
    }
}

/// One `[id, summary]` JSON line per response.
fn print_summaries(summaries: &[SummaryResponse]) -> Result<()> {
    for s in summaries {
        println!("{}", serde_json::to_string(&(&s.id, &s.summary))?);
    }
    Ok(())
}
