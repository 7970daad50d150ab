use super::tokenizer::is_whitespace_only;
use super::{DiffSegment, SegmentKind};
use serde::{Deserialize, Serialize};

/// A reviewable unit of a diff: unchanged text, or a phrase that was
/// replaced, removed or added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PhraseChunk {
    Equal { text: String },
    Change { deleted: String, inserted: String },
}

impl PhraseChunk {
    pub fn original_text(&self) -> &str {
        match self {
            PhraseChunk::Equal { text } => text,
            PhraseChunk::Change { deleted, .. } => deleted,
        }
    }

    pub fn revised_text(&self) -> &str {
        match self {
            PhraseChunk::Equal { text } => text,
            PhraseChunk::Change { inserted, .. } => inserted,
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(self, PhraseChunk::Change { .. })
    }
}

/// Outcome of reviewing one change chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Accept,
    Reject,
}

/// Group word-level segments into phrase-level chunks.
///
/// Whitespace sitting between two changed segments is folded into both sides
/// of the change, so "cat sat" -> "dog ran" reviews as a single phrase.
/// Any other unchanged text ends the current change.
pub fn group_into_phrase_chunks(segments: &[DiffSegment]) -> Vec<PhraseChunk> {
    let mut chunks = Vec::new();
    let mut equal = String::new();
    let mut i = 0;

    while i < segments.len() {
        if segments[i].kind == SegmentKind::Equal {
            equal.push_str(&segments[i].text);
            i += 1;
            continue;
        }

        if !equal.is_empty() {
            chunks.push(PhraseChunk::Equal {
                text: std::mem::take(&mut equal),
            });
        }

        let mut deleted = String::new();
        let mut inserted = String::new();

        while let Some(segment) = segments.get(i) {
            match segment.kind {
                SegmentKind::Delete => deleted.push_str(&segment.text),
                SegmentKind::Insert => inserted.push_str(&segment.text),
                SegmentKind::Equal => {
                    if !(is_whitespace_only(&segment.text) && change_follows(segments, i + 1)) {
                        break;
                    }
                    deleted.push_str(&segment.text);
                    inserted.push_str(&segment.text);
                }
            }
            i += 1;
        }

        if !deleted.is_empty() || !inserted.is_empty() {
            chunks.push(PhraseChunk::Change { deleted, inserted });
        }
    }

    if !equal.is_empty() {
        chunks.push(PhraseChunk::Equal { text: equal });
    }

    chunks
}

/// Whether a non-equal segment comes next, looking past any further
/// whitespace-only equal segments.
fn change_follows(segments: &[DiffSegment], from: usize) -> bool {
    segments[from..]
        .iter()
        .find(|s| !(s.kind == SegmentKind::Equal && is_whitespace_only(&s.text)))
        .is_some_and(|s| s.kind != SegmentKind::Equal)
}

pub fn reconstruct_original(chunks: &[PhraseChunk]) -> String {
    chunks.iter().map(PhraseChunk::original_text).collect()
}

pub fn reconstruct_revised(chunks: &[PhraseChunk]) -> String {
    chunks.iter().map(PhraseChunk::revised_text).collect()
}

/// Collapse reviewed chunks back into plain text.
///
/// `decisions` holds one entry per change chunk, in order. Change chunks
/// without a decision keep their original text.
pub fn resolve_chunks(chunks: &[PhraseChunk], decisions: &[ReviewDecision]) -> String {
    let mut decisions = decisions.iter();
    let mut out = String::new();

    for chunk in chunks {
        match chunk {
            PhraseChunk::Equal { text } => out.push_str(text),
            PhraseChunk::Change { deleted, inserted } => match decisions.next() {
                Some(ReviewDecision::Accept) => out.push_str(inserted),
                Some(ReviewDecision::Reject) | None => out.push_str(deleted),
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_word_diff;

    fn chunks_for(original: &str, revised: &str) -> Vec<PhraseChunk> {
        group_into_phrase_chunks(&compute_word_diff(original, revised))
    }

    fn change(deleted: &str, inserted: &str) -> PhraseChunk {
        PhraseChunk::Change {
            deleted: deleted.to_string(),
            inserted: inserted.to_string(),
        }
    }

    fn equal(text: &str) -> PhraseChunk {
        PhraseChunk::Equal {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_single_word_change() {
        assert_eq!(
            chunks_for("The cat sat on the mat", "The dog sat on the mat"),
            vec![equal("The "), change("cat", "dog"), equal(" sat on the mat")]
        );
    }

    #[test]
    fn test_adjacent_words_form_one_phrase() {
        assert_eq!(
            chunks_for("The cat sat", "The dog ran"),
            vec![equal("The "), change("cat sat", "dog ran")]
        );
    }

    #[test]
    fn test_unchanged_word_separates_changes() {
        let chunks = chunks_for("red fox and blue bird", "tan fox and pink bird");
        assert_eq!(chunks.iter().filter(|c| c.is_change()).count(), 2);
        assert_eq!(chunks[0], change("red", "tan"));
    }

    #[test]
    fn test_trailing_whitespace_is_not_absorbed() {
        let segments = vec![
            DiffSegment::equal("a "),
            DiffSegment::delete("b"),
            DiffSegment::equal(" "),
        ];
        assert_eq!(
            group_into_phrase_chunks(&segments),
            vec![equal("a "), change("b", ""), equal(" ")]
        );
    }

    #[test]
    fn test_unmerged_whitespace_runs_are_absorbed() {
        let segments = vec![
            DiffSegment::delete("a"),
            DiffSegment::equal(" "),
            DiffSegment::equal("\n"),
            DiffSegment::delete("b"),
            DiffSegment::equal(" "),
            DiffSegment::equal("c"),
        ];
        assert_eq!(
            group_into_phrase_chunks(&segments),
            vec![change("a \nb", " \n"), equal(" c")]
        );
    }

    #[test]
    fn test_chunk_round_trip() {
        let cases = [
            ("The cat sat on the mat.", "A dog sat on a mat!"),
            ("one two three", "one three"),
            ("keep this\n\nand that", "keep these\nand that too"),
            ("", "brand new"),
        ];
        for (original, revised) in cases {
            let chunks = chunks_for(original, revised);
            assert_eq!(reconstruct_original(&chunks), original);
            assert_eq!(reconstruct_revised(&chunks), revised);
        }
    }

    #[test]
    fn test_empty_segments() {
        assert!(group_into_phrase_chunks(&[]).is_empty());
        assert_eq!(
            group_into_phrase_chunks(&[DiffSegment::equal("same")]),
            vec![equal("same")]
        );
    }

    #[test]
    fn test_resolve_chunks() {
        let chunks = chunks_for("red fox and blue bird", "tan fox and pink bird");
        assert_eq!(
            resolve_chunks(&chunks, &[ReviewDecision::Accept, ReviewDecision::Reject]),
            "tan fox and blue bird"
        );
        assert_eq!(resolve_chunks(&chunks, &[]), "red fox and blue bird");
    }

    #[test]
    fn test_chunks_serialize_with_kind_tag() {
        let json = serde_json::to_string(&change("a", "b")).unwrap();
        assert_eq!(json, r#"{"kind":"change","deleted":"a","inserted":"b"}"#);
    }
}
