pub mod dictionary;
pub mod distance;
pub mod suggestions;
pub mod tokenizer;

use crate::Config;
use anyhow::{Context, Result};
use dictionary::{Dictionary, FrequencyTable};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

pub use distance::levenshtein_distance;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

/// One misspelled occurrence in a scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCheckResult {
    /// The word as it appears in the text.
    pub word: String,
    /// Byte offset of the word in the scanned text.
    pub position: usize,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorrectionError {
    #[error("correction range {start}..{end} is outside the text (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("correction range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },

    #[error("expected {expected:?} at offset {position}, found {found:?}")]
    WordMismatch {
        expected: String,
        found: String,
        position: usize,
    },
}

/// Replace the word a result points at with `replacement`.
///
/// Fails instead of splicing when the text has moved on since the scan.
pub fn apply_correction(
    text: &str,
    result: &SpellCheckResult,
    replacement: &str,
) -> Result<String, CorrectionError> {
    let start = result.position;
    let end = start + result.word.len();

    if end > text.len() {
        return Err(CorrectionError::OutOfBounds {
            start,
            end,
            len: text.len(),
        });
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(CorrectionError::NotCharBoundary { start, end });
    }
    if text[start..end] != result.word {
        return Err(CorrectionError::WordMismatch {
            expected: result.word.clone(),
            found: text[start..end].to_string(),
            position: start,
        });
    }

    let mut corrected = String::with_capacity(text.len() - result.word.len() + replacement.len());
    corrected.push_str(&text[..start]);
    corrected.push_str(replacement);
    corrected.push_str(&text[end..]);
    Ok(corrected)
}

pub struct SpellChecker {
    dictionary: Dictionary,
    personal_words: HashSet<String>,
    ignored: HashSet<String>,
    ignore_patterns: Vec<Regex>,
    max_suggestions: usize,
}

impl Default for SpellChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellChecker {
    /// A checker with an empty dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(Dictionary::empty())
    }

    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            personal_words: HashSet::new(),
            ignored: HashSet::new(),
            ignore_patterns: Vec::new(),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    /// Build a checker from configuration.
    ///
    /// The dictionary comes from the configured word list (with its optional
    /// frequency table), else the compiled dictionary for the language, else
    /// the built-in bootstrap list.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dictionary = load_configured_dictionary(config)?;
        let mut checker = Self::with_dictionary(dictionary);
        checker.max_suggestions = config.max_suggestions;
        checker.set_ignore_patterns(&config.ignore_patterns);

        if let Some(personal_dict_path) = &config.personal_dictionary {
            if personal_dict_path.exists() {
                let content = fs::read_to_string(personal_dict_path)
                    .context("Failed to read personal dictionary")?;
                for line in content.lines() {
                    let word = line.trim();
                    if !word.is_empty() && !word.starts_with('#') {
                        checker.add_personal_word(word);
                    }
                }
            }
        }

        Ok(checker)
    }

    /// Replace the dictionary with one built from `words`.
    pub fn load_dictionary<I, S>(&mut self, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dictionary = Dictionary::from_words(words, None)?;
        Ok(())
    }

    /// Replace the dictionary, taking word frequencies from `frequencies`.
    pub fn load_dictionary_with_frequencies<I, S>(
        &mut self,
        words: I,
        frequencies: &FrequencyTable,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dictionary = Dictionary::from_words(words, Some(frequencies))?;
        Ok(())
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    pub fn set_max_suggestions(&mut self, max_suggestions: usize) {
        self.max_suggestions = max_suggestions;
    }

    /// Compile ignore patterns, logging and skipping invalid ones.
    pub fn set_ignore_patterns(&mut self, patterns: &[String]) {
        self.ignore_patterns.clear();
        for pattern in patterns {
            match Regex::new(pattern) {
                Ok(re) => self.ignore_patterns.push(re),
                Err(e) => warn!("Invalid regex pattern '{}': {}", pattern, e),
            }
        }
    }

    /// Accept `word` as correct without touching the dictionary.
    pub fn add_personal_word(&mut self, word: &str) {
        self.personal_words.insert(word.trim().to_lowercase());
    }

    pub fn is_correct(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.dictionary.contains(&word) || self.personal_words.contains(&word)
    }

    /// Dismiss `word` (any casing) for the rest of the session.
    pub fn ignore_word(&mut self, word: &str) {
        self.ignored.insert(word.trim().to_lowercase());
    }

    pub fn is_ignored(&self, word: &str) -> bool {
        self.ignored.contains(&word.trim().to_lowercase())
    }

    pub fn clear_ignored(&mut self) {
        self.ignored.clear();
    }

    /// Up to `max_suggestions` corrections for `word`, best first, cased like
    /// `word`. Empty when the word is already correct.
    pub fn get_suggestions(&self, word: &str, max_suggestions: usize) -> Vec<String> {
        if self.is_correct(word) {
            return Vec::new();
        }

        let trimmed = word.trim();
        suggestions::generate(&trimmed.to_lowercase(), &self.dictionary, max_suggestions)
            .into_iter()
            .map(|suggestion| suggestions::match_case(trimmed, &suggestion))
            .collect()
    }

    /// [`SpellChecker::get_suggestions`] with the configured limit.
    pub fn suggestions(&self, word: &str) -> Vec<String> {
        self.get_suggestions(word, self.max_suggestions)
    }

    /// Check a sequence of words assumed to be separated by single characters.
    ///
    /// Positions are running byte offsets (`word.len() + 1` per word).
    pub fn check_words<S: AsRef<str>>(&self, words: &[S]) -> Vec<SpellCheckResult> {
        let mut results = Vec::new();
        let mut position = 0;

        for word in words {
            let word = word.as_ref();
            if !self.matches_ignore_pattern(word) {
                if let Some(result) = self.inspect(word, position) {
                    results.push(result);
                }
            }
            position += word.len() + 1;
        }

        results
    }

    /// Check free text, locating words with a regex so positions are exact
    /// byte offsets into `text`.
    pub fn check_text(&self, text: &str) -> Vec<SpellCheckResult> {
        let started = Instant::now();
        let ignored_ranges = self.ignored_ranges(text);

        let results: Vec<_> = tokenizer::word_spans(text)
            .into_iter()
            .filter(|span| {
                !ignored_ranges
                    .iter()
                    .any(|range| span.start < range.end && range.start < span.end())
            })
            .filter_map(|span| self.inspect(span.text, span.start))
            .collect();

        debug!(
            bytes = text.len(),
            misspellings = results.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "text checked"
        );

        results
    }

    fn inspect(&self, word: &str, position: usize) -> Option<SpellCheckResult> {
        if !tokenizer::is_checkable(word) || self.is_ignored(word) || self.is_correct(word) {
            return None;
        }

        let suggestions = self.suggestions(word);
        if suggestions.is_empty() {
            return None;
        }

        Some(SpellCheckResult {
            word: word.to_string(),
            position,
            suggestions,
        })
    }

    fn matches_ignore_pattern(&self, word: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| pattern.is_match(word))
    }

    fn ignored_ranges(&self, text: &str) -> Vec<Range<usize>> {
        self.ignore_patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text).map(|m| m.range()))
            .collect()
    }
}

fn load_configured_dictionary(config: &Config) -> Result<Dictionary> {
    let frequencies = config
        .frequency_table
        .as_deref()
        .map(FrequencyTable::from_path)
        .transpose()?;

    if let Some(word_list) = &config.word_list {
        return Dictionary::load_word_list(word_list, frequencies.as_ref());
    }

    let compiled = Dictionary::compiled_path(&config.language)?;
    if compiled.exists() {
        return Dictionary::load_compiled(&compiled);
    }

    debug!(language = %config.language, "no dictionary installed, using bootstrap list");
    Dictionary::bootstrap()
}

/// Append `word` to a personal dictionary file, creating it if needed.
pub fn add_to_personal_dictionary(path: &Path, word: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create personal dictionary directory")?;
    }

    let mut dict_content = if path.exists() {
        fs::read_to_string(path).context("Failed to read personal dictionary")?
    } else {
        String::new()
    };

    if !dict_content.is_empty() && !dict_content.ends_with('\n') {
        dict_content.push('\n');
    }
    dict_content.push_str(&format!("{}\n", word.trim().to_lowercase()));

    fs::write(path, dict_content).context("Failed to write personal dictionary")
}
