// ============================================================
// Layer 2 — Harness Session
// ============================================================
// The paused mode: an external harness drives the model through
// line commands on stdin and reads one JSON reply per line on
// stdout.
//
//   persist <dir>    → {"status":"ok"}
//   restore <dir>    → {"status":"ok"}
//   infer <root>     → [["<dialogue id>","<summary>"], ...]
//   quit             → session ends (so does end of input)
//
// A failing command answers {"error":"..."} and the session
// carries on. Blank lines are ignored.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{anyhow, bail, Result};
use serde_json::{json, Value};

use crate::data::loader::JsonDialogueLoader;
use crate::domain::traits::{DialogueSource, ModelService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Persist(PathBuf),
    Restore(PathBuf),
    Infer(PathBuf),
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None              => (line, ""),
        };

        let path = || -> Result<PathBuf> {
            if arg.is_empty() {
                bail!("'{verb}' needs a path argument");
            }
            Ok(PathBuf::from(arg))
        };

        match verb {
            "persist" => Ok(Command::Persist(path()?)),
            "restore" => Ok(Command::Restore(path()?)),
            "infer"   => Ok(Command::Infer(path()?)),
            "quit"    => Ok(Command::Quit),
            other     => Err(anyhow!("unknown command '{other}'")),
        }
    }
}

pub struct HarnessSession<S: ModelService> {
    service: S,
}

impl<S: ModelService> HarnessSession<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Serve commands from `input` until `quit` or end of input.
    /// Only I/O failures on the streams themselves end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        tracing::info!("Harness session started");

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let reply = match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command)       => self.execute(command),
                Err(e)            => Err(e),
            };

            let value = reply.unwrap_or_else(|e| {
                tracing::warn!("Command '{}' failed: {:#}", line.trim(), e);
                json!({ "error": format!("{e:#}") })
            });
            writeln!(output, "{value}")?;
            output.flush()?;
        }

        tracing::info!("Harness session ended");
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<Value> {
        match command {
            Command::Persist(dir) => {
                self.service.persist(&dir)?;
                Ok(json!({ "status": "ok" }))
            }
            Command::Restore(dir) => {
                self.service.restore(&dir)?;
                Ok(json!({ "status": "ok" }))
            }
            Command::Infer(root) => {
                let records   = JsonDialogueLoader::test(root).load_all()?;
                let summaries = self.service.infer(&records)?;
                let pairs: Vec<(String, String)> = summaries
                    .into_iter()
                    .map(|r| (r.id, r.summary))
                    .collect();
                Ok(json!(pairs))
            }
            Command::Quit => Ok(Value::Null),
        }
    }
}
