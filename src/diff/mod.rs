//! Word-level diffing for reviewing suggested edits.
//!
//! [`compute_word_diff`] aligns two texts token by token with an LCS table
//! and emits [`DiffSegment`]s; [`group_into_phrase_chunks`] folds those into
//! phrase-sized [`PhraseChunk`]s that a reviewer can accept or reject one at
//! a time.

mod lcs;
pub mod phrase;
pub mod tokenizer;

pub use phrase::{
    group_into_phrase_chunks, reconstruct_original, reconstruct_revised, resolve_chunks,
    PhraseChunk, ReviewDecision,
};
pub use tokenizer::tokenize;

use lcs::LcsTable;
use serde::{Deserialize, Serialize};
use tokenizer::is_whitespace_only;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl DiffSegment {
    pub fn equal(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Equal,
            text: text.into(),
        }
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Delete,
            text: text.into(),
        }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Insert,
            text: text.into(),
        }
    }
}

fn default_max_tokens() -> usize {
    500
}

fn default_min_similarity() -> f64 {
    0.15
}

/// Tunables for [`compute_word_diff_with`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Token count above which the LCS table is skipped entirely.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Minimum `lcs / max(len_a, len_b)` ratio for a fine-grained diff.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Report whitespace-only insertions and deletions as unchanged text.
    ///
    /// When enabled the output no longer reconstructs both inputs exactly
    /// wherever whitespace alone changed.
    #[serde(default)]
    pub ignore_whitespace_changes: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            min_similarity: default_min_similarity(),
            ignore_whitespace_changes: false,
        }
    }
}

/// Diff two texts word by word using the default [`DiffOptions`].
pub fn compute_word_diff(original: &str, revised: &str) -> Vec<DiffSegment> {
    compute_word_diff_with(original, revised, &DiffOptions::default())
}

pub fn compute_word_diff_with(
    original: &str,
    revised: &str,
    options: &DiffOptions,
) -> Vec<DiffSegment> {
    if original == revised {
        return if original.is_empty() {
            Vec::new()
        } else {
            vec![DiffSegment::equal(original)]
        };
    }

    let tokens_a = tokenize(original);
    let tokens_b = tokenize(revised);

    if tokens_a.len() > options.max_tokens || tokens_b.len() > options.max_tokens {
        debug!(
            original_tokens = tokens_a.len(),
            revised_tokens = tokens_b.len(),
            "token limit exceeded, replacing whole text"
        );
        return replace_whole(original, revised);
    }

    let table = LcsTable::build(&tokens_a, &tokens_b);
    let longest = tokens_a.len().max(tokens_b.len());
    if longest > 0 {
        let similarity = table.lcs_len() as f64 / longest as f64;
        if similarity < options.min_similarity {
            debug!(similarity, "texts too dissimilar, replacing whole text");
            return replace_whole(original, revised);
        }
    }

    let mut segments = merge_adjacent(
        table
            .backtrack(&tokens_a, &tokens_b)
            .into_iter()
            .map(|(kind, token)| DiffSegment {
                kind,
                text: token.to_string(),
            }),
    );

    if options.ignore_whitespace_changes {
        for segment in &mut segments {
            if segment.kind != SegmentKind::Equal && is_whitespace_only(&segment.text) {
                segment.kind = SegmentKind::Equal;
            }
        }
        segments = merge_adjacent(segments);
    }

    segments
}

fn replace_whole(original: &str, revised: &str) -> Vec<DiffSegment> {
    let mut segments = Vec::with_capacity(2);
    if !original.is_empty() {
        segments.push(DiffSegment::delete(original));
    }
    if !revised.is_empty() {
        segments.push(DiffSegment::insert(revised));
    }
    segments
}

/// Concatenate runs of segments that share a kind.
fn merge_adjacent(segments: impl IntoIterator<Item = DiffSegment>) -> Vec<DiffSegment> {
    let mut merged: Vec<DiffSegment> = Vec::new();
    for segment in segments {
        if segment.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.kind == segment.kind => last.text.push_str(&segment.text),
            _ => merged.push(segment),
        }
    }
    merged
}
