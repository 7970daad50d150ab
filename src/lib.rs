pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod diff;
pub mod session;
pub mod worker;

pub use checker::{apply_correction, SpellCheckResult, SpellChecker};
pub use config::Config;
pub use diff::{compute_word_diff, group_into_phrase_chunks, DiffSegment, PhraseChunk};
pub use session::SpellSession;

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub error_count: usize,
    pub fixed_count: usize,
    pub errors: Vec<SpellError>,
}

/// A misspelling located by line and column for display.
#[derive(Debug, Clone)]
pub struct SpellError {
    pub word: String,
    pub line: usize,
    pub column: usize,
    pub context: String,
    pub suggestions: Vec<String>,
}

impl SpellError {
    /// Resolve a byte-offset result against the text it was produced from.
    /// Lines and columns are 1-indexed; columns count characters.
    pub fn locate(text: &str, result: &SpellCheckResult) -> Self {
        let before = &text[..result.position.min(text.len())];
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |idx| line_start + idx);

        Self {
            word: result.word.clone(),
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
            context: text[line_start..line_end].trim_end_matches('\r').to_string(),
            suggestions: result.suggestions.clone(),
        }
    }
}
