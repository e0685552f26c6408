// ============================================================
// Layer 4 — Sequence Padding
// ============================================================
// Brings every index sequence to one fixed width so batches
// stack into rectangular tensors.
//
//   padding:    always on the right, with the pad index
//   truncating: on the right by default (keep the head);
//               Truncating::Pre keeps the tail instead
//
// Example, len = 5, pad = 0:
//   [7, 8]                → [7, 8, 0, 0, 0]
//   [1, 2, 3, 4, 5, 6, 7] → [1, 2, 3, 4, 5]        (Post)
//   [1, 2, 3, 4, 5, 6, 7] → [3, 4, 5, 6, 7]        (Pre)

use serde::{Deserialize, Serialize};

/// Which end of an over-long sequence is cut off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Truncating {
    /// Drop tokens from the front, keep the last `len`
    Pre,
    /// Drop tokens from the back, keep the first `len`
    #[default]
    Post,
}

/// Pad or truncate `seq` to exactly `len` entries.
pub fn pad_sequence(seq: &[u32], len: usize, pad: u32, truncating: Truncating) -> Vec<u32> {
    let kept = if seq.len() > len {
        match truncating {
            Truncating::Pre  => &seq[seq.len() - len..],
            Truncating::Post => &seq[..len],
        }
    } else {
        seq
    };

    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(kept);
    out.resize(len, pad);
    out
}
