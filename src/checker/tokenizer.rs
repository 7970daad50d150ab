use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Letters, optionally joined by inner apostrophes ("don't", "o'clock").
    static ref WORD_RE: Regex = Regex::new(r"\p{Alphabetic}+(?:['’]\p{Alphabetic}+)*")
        .expect("word pattern is valid");
}

/// A word located in a larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan<'a> {
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
}

impl WordSpan<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Find the words of `text` together with their byte offsets.
pub fn word_spans(text: &str) -> Vec<WordSpan<'_>> {
    WORD_RE
        .find_iter(text)
        .map(|m| WordSpan {
            text: m.as_str(),
            start: m.start(),
        })
        .collect()
}

/// Whether a token is worth looking up at all: non-empty, not a number, and
/// containing at least one letter.
pub fn is_checkable(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    if token.chars().all(|c| c.is_numeric()) {
        return false;
    }
    token.chars().any(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_spans_with_offsets() {
        let spans = word_spans("Hi, don't  stop—now 42 times.");
        let words: Vec<_> = spans.iter().map(|s| (s.text, s.start)).collect();
        assert_eq!(
            words,
            vec![("Hi", 0), ("don't", 4), ("stop", 11), ("now", 18), ("times", 25)]
        );
    }

    #[test]
    fn test_span_end() {
        let spans = word_spans("  naïve");
        assert_eq!(spans[0].start, 2);
        assert_eq!(spans[0].end(), "  naïve".len());
    }

    #[test]
    fn test_is_checkable() {
        assert!(is_checkable("word"));
        assert!(is_checkable("abc123"));
        assert!(!is_checkable(""));
        assert!(!is_checkable("2024"));
        assert!(!is_checkable("--"));
    }
}
