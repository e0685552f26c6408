// ============================================================
// Layer 4 — Dialogue Loader
// ============================================================
// Reads the benchmark's JSON collections into DialogueRecords.
//
// On-disk layout under the dataset root:
//   train/train_data/*   training collections (with summaries)
//   test_data/*          evaluation collections (no summaries)
//
// Every file holds one collection:
//   { "data": [
//       { "header": { "dialogueInfo": { "dialogueID": "..." } },
//         "body":   { "dialogue": [ { "utterance": "..." }, ... ],
//                    "summary":  "..." } },
//       ...
//   ] }
//
// Files are read in sorted path order so record order is
// stable across runs. A file that fails to parse is fatal:
// the error names the file and the run stops.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::preprocessor::Preprocessor;
use crate::domain::dialogue::DialogueRecord;
use crate::domain::traits::DialogueSource;

// ─── JSON schema ──────────────────────────────────────────────────────────────
// Only the fields the pipeline reads are declared; serde ignores the rest.

#[derive(Debug, Deserialize)]
struct Collection {
    data: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    header: Header,
    body:   Body,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(rename = "dialogueInfo")]
    dialogue_info: DialogueInfo,
}

#[derive(Debug, Deserialize)]
struct DialogueInfo {
    #[serde(rename = "dialogueID")]
    dialogue_id: String,
}

#[derive(Debug, Deserialize)]
struct Body {
    dialogue: Vec<Utterance>,
    #[serde(default)]
    summary:  Option<String>,
}

#[derive(Debug, Deserialize)]
struct Utterance {
    utterance: String,
}

// ─── Split selection ──────────────────────────────────────────────────────────

/// Which half of the dataset layout to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// Where this split lives under a dataset root.
    pub fn dir(self, root: &Path) -> PathBuf {
        match self {
            Split::Train => root.join("train").join("train_data"),
            Split::Test  => root.join("test_data"),
        }
    }
}

/// Loads every collection of one split under a dataset root.
pub struct JsonDialogueLoader {
    root:  PathBuf,
    split: Split,
}

impl JsonDialogueLoader {
    pub fn new(root: impl Into<PathBuf>, split: Split) -> Self {
        Self { root: root.into(), split }
    }

    pub fn train(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Split::Train)
    }

    pub fn test(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Split::Test)
    }

    /// Sorted list of the files in the split directory.
    fn collection_paths(&self) -> Result<Vec<PathBuf>> {
        let dir = self.split.dir(&self.root);
        if !dir.is_dir() {
            bail!("Data directory '{}' does not exist", dir.display());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl DialogueSource for JsonDialogueLoader {
    fn load_all(&self) -> Result<Vec<DialogueRecord>> {
        let paths = self.collection_paths()?;
        tracing::info!("Reading {} collection files ({:?})", paths.len(), self.split);

        let preprocessor = Preprocessor::new();
        let mut records  = Vec::new();

        for path in &paths {
            let before = records.len();
            records.extend(load_collection(path, &preprocessor)?);
            tracing::debug!(
                "Loaded {} dialogues from '{}'",
                records.len() - before,
                path.display()
            );
        }

        tracing::info!("Loaded {} dialogues", records.len());
        Ok(records)
    }
}

/// Parse one collection file.
fn load_collection(path: &Path, preprocessor: &Preprocessor) -> Result<Vec<DialogueRecord>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let collection: Collection = serde_json::from_slice(&bytes)
        .with_context(|| format!("Malformed dialogue collection '{}'", path.display()))?;

    Ok(collection
        .data
        .into_iter()
        .map(|entry| {
            let dialogue = entry
                .body
                .dialogue
                .iter()
                .map(|u| preprocessor.clean(&u.utterance))
                .filter(|u| !u.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            DialogueRecord::new(
                entry.header.dialogue_info.dialogue_id,
                dialogue,
                entry.body.summary,
            )
        })
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "numberOfItems": 2,
        "data": [
            { "header": { "dialogueInfo": { "dialogueID": "d-1", "numberOfTurns": 2 } },
              "body":   { "dialogue": [ { "utterance": "오늘 뭐 해?", "turnID": "T1" },
                                        { "utterance": "영화  보러 가" } ],
                          "summary": "영화를 보러 간다." } },
            { "header": { "dialogueInfo": { "dialogueID": "d-2" } },
              "body":   { "dialogue": [], "summary": "빈 대화" } }
        ]
    }"#;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_reads_training_layout() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "train/train_data/a.json", COLLECTION);

        let records = JsonDialogueLoader::train(dir.path()).load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "d-1");
        assert_eq!(records[0].dialogue, "오늘 뭐 해? 영화 보러 가");
        assert_eq!(records[0].summary.as_deref(), Some("영화를 보러 간다."));
    }

    #[test]
    fn test_empty_utterance_list_gives_empty_dialogue() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "train/train_data/a.json", COLLECTION);

        let records = JsonDialogueLoader::train(dir.path()).load_all().unwrap();
        assert_eq!(records[1].dialogue, "");
    }

    #[test]
    fn test_test_split_without_summaries() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "test_data/b.json",
            r#"{ "data": [ { "header": { "dialogueInfo": { "dialogueID": "t-9" } },
                             "body": { "dialogue": [ { "utterance": "안녕" } ] } } ] }"#,
        );

        let records = JsonDialogueLoader::test(dir.path()).load_all().unwrap();
        assert_eq!(records, vec![DialogueRecord::new("t-9", "안녕", None)]);
    }

    #[test]
    fn test_files_are_read_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        let one = |id: &str| format!(
            r#"{{ "data": [ {{ "header": {{ "dialogueInfo": {{ "dialogueID": "{id}" }} }},
                              "body": {{ "dialogue": [] }} }} ] }}"#
        );
        write(dir.path(), "test_data/2.json", &one("second"));
        write(dir.path(), "test_data/1.json", &one("first"));

        let ids: Vec<String> = JsonDialogueLoader::test(dir.path())
            .load_all()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "test_data/bad.json", r#"{ "data": [ { "header": {} } ] }"#);

        let err = JsonDialogueLoader::test(dir.path()).load_all().unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonDialogueLoader::train(dir.path()).load_all().is_err());
    }
}
