// ============================================================
// Layer 4 — Summary Samples and Dataset
// ============================================================
// Turns DialogueRecords into fixed-width index sequences.
//
//   encoder_input   encode(dialogue)                 → text_max_len
//   decoder_input   training:   <sos> encode(summary) → summary_max_len
//                   validation: <sos>
//                   inference:  <sos>
//   decoder_target  encode(summary) <eos>           → summary_max_len
//
// Validation and inference share the <sos>-only decoder input.

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::padding::{pad_sequence, Truncating};
use crate::domain::context::InferenceContext;
use crate::domain::dialogue::DialogueRecord;
use crate::domain::vocabulary::{Vocabulary, EOS, PAD, SOS};

/// One encoded and padded example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySample {
    pub encoder_input:  Vec<u32>,
    pub decoder_input:  Vec<u32>,
    /// Empty for inference samples
    pub decoder_target: Vec<u32>,
}

/// How the decoder input of a sample is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderFeed {
    /// `<sos>` followed by the reference summary
    TeacherForced,
    /// `<sos>` followed by padding
    StartOnly,
}

/// Encodes records with a fixed pair of vocabularies and widths.
pub struct SampleBuilder<'a> {
    src_vocab:       &'a Vocabulary,
    tar_vocab:       &'a Vocabulary,
    text_max_len:    usize,
    summary_max_len: usize,
    truncating:      Truncating,
}

impl<'a> SampleBuilder<'a> {
    pub fn new(
        src_vocab:       &'a Vocabulary,
        tar_vocab:       &'a Vocabulary,
        text_max_len:    usize,
        summary_max_len: usize,
        truncating:      Truncating,
    ) -> Self {
        Self { src_vocab, tar_vocab, text_max_len, summary_max_len, truncating }
    }

    pub fn from_context(ctx: &'a InferenceContext) -> Self {
        Self::new(
            ctx.src_vocab(),
            ctx.tar_vocab(),
            ctx.text_max_len(),
            ctx.summary_max_len(),
            ctx.truncating(),
        )
    }

    pub fn encoder_input(&self, dialogue: &str) -> Vec<u32> {
        let ids = self.src_vocab.encode(dialogue);
        pad_sequence(&ids, self.text_max_len, PAD, self.truncating)
    }

    /// `<sos>` then padding: the decoder input used by inference.
    pub fn start_only_input(&self) -> Vec<u32> {
        pad_sequence(&[SOS], self.summary_max_len, PAD, self.truncating)
    }

    /// A sample with targets. Records without a summary train
    /// against an empty summary (just `<eos>`).
    pub fn labelled(&self, record: &DialogueRecord, feed: DecoderFeed) -> SummarySample {
        let summary = self.tar_vocab.encode(record.summary.as_deref().unwrap_or(""));

        let decoder_input = match feed {
            DecoderFeed::TeacherForced => {
                let mut seq = Vec::with_capacity(summary.len() + 1);
                seq.push(SOS);
                seq.extend_from_slice(&summary);
                pad_sequence(&seq, self.summary_max_len, PAD, self.truncating)
            }
            DecoderFeed::StartOnly => self.start_only_input(),
        };

        let mut target = summary;
        target.push(EOS);

        SummarySample {
            encoder_input:  self.encoder_input(&record.dialogue),
            decoder_input,
            decoder_target: pad_sequence(&target, self.summary_max_len, PAD, self.truncating),
        }
    }

    /// A sample without targets, for inference.
    pub fn unlabelled(&self, record: &DialogueRecord) -> SummarySample {
        SummarySample {
            encoder_input:  self.encoder_input(&record.dialogue),
            decoder_input:  self.start_only_input(),
            decoder_target: Vec::new(),
        }
    }
}

pub struct SummaryDataset {
    samples: Vec<SummarySample>,
}

impl SummaryDataset {
    pub fn new(samples: Vec<SummarySample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<SummarySample> for SummaryDataset {
    fn get(&self, index: usize) -> Option<SummarySample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::UNK;

    fn vocabs() -> (Vocabulary, Vocabulary) {
        (
            Vocabulary::fit(&["영화 보러 가자"], 100),
            Vocabulary::fit(&["영화를 본다"], 100),
        )
    }

    #[test]
    fn test_teacher_forced_sample_shifts_target() {
        let (src, tar) = vocabs();
        let builder = SampleBuilder::new(&src, &tar, 5, 4, Truncating::Post);
        let record  = DialogueRecord::new("d", "영화 보러 가자", Some("영화를 본다".into()));

        let s = builder.labelled(&record, DecoderFeed::TeacherForced);
        assert_eq!(s.encoder_input, vec![4, 5, 6, PAD, PAD]);
        assert_eq!(s.decoder_input, vec![SOS, 4, 5, PAD]);
        assert_eq!(s.decoder_target, vec![4, 5, EOS, PAD]);
    }

    #[test]
    fn test_start_only_sample_keeps_target() {
        let (src, tar) = vocabs();
        let builder = SampleBuilder::new(&src, &tar, 5, 4, Truncating::Post);
        let record  = DialogueRecord::new("d", "영화 안 봐", Some("영화를 본다".into()));

        let s = builder.labelled(&record, DecoderFeed::StartOnly);
        assert_eq!(s.encoder_input, vec![4, UNK, UNK, PAD, PAD]);
        assert_eq!(s.decoder_input, vec![SOS, PAD, PAD, PAD]);
        assert_eq!(s.decoder_target, vec![4, 5, EOS, PAD]);
    }

    #[test]
    fn test_empty_dialogue_is_all_padding() {
        let (src, tar) = vocabs();
        let builder = SampleBuilder::new(&src, &tar, 6, 3, Truncating::Post);

        let s = builder.unlabelled(&DialogueRecord::new("d", "", None));
        assert_eq!(s.encoder_input, vec![PAD; 6]);
        assert!(s.decoder_target.is_empty());
    }

    #[test]
    fn test_dataset_indexing() {
        let (src, tar) = vocabs();
        let builder = SampleBuilder::new(&src, &tar, 3, 3, Truncating::Post);
        let ds = SummaryDataset::new(vec![builder.unlabelled(&DialogueRecord::new("d", "영화", None))]);
        assert_eq!(ds.len(), 1);
        assert!(ds.get(0).is_some());
        assert!(ds.get(1).is_none());
    }
}
