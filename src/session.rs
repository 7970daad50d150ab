//! Live spell checking for an open document.
//!
//! A [`SpellSession`] owns the current text and the results on display. Edits
//! are reported through [`SpellSession::content_changed`]; the actual scan
//! runs from [`SpellSession::poll`] once the text has been quiet for the
//! debounce interval. Time is passed in by the caller so the host decides
//! which clock drives the session.

use crate::checker::{self, CorrectionError, SpellCheckResult, SpellChecker};
use crate::Config;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct SpellSession {
    checker: SpellChecker,
    debounce: Duration,
    text: String,
    results: Vec<SpellCheckResult>,
    dirty_since: Option<Instant>,
}

impl SpellSession {
    pub fn new(checker: SpellChecker) -> Self {
        Self::with_debounce(checker, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(checker: SpellChecker, debounce: Duration) -> Self {
        Self {
            checker,
            debounce,
            text: String::new(),
            results: Vec::new(),
            dirty_since: None,
        }
    }

    /// A session over the configured dictionary and debounce interval.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::with_debounce(
            SpellChecker::from_config(config)?,
            Duration::from_millis(config.session.debounce_ms),
        ))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn results(&self) -> &[SpellCheckResult] {
        &self.results
    }

    /// Record new document content; the re-scan waits for the debounce
    /// interval to pass without further changes.
    pub fn content_changed(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.dirty_since = Some(now);
    }

    /// Whether a scan is waiting for the debounce interval.
    pub fn is_pending(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Run the pending scan if the text has been quiet long enough.
    /// Returns `true` when results were refreshed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.dirty_since {
            Some(since) if now.saturating_duration_since(since) >= self.debounce => {
                self.rescan();
                true
            }
            _ => false,
        }
    }

    /// Scan the current text immediately.
    pub fn rescan(&mut self) {
        self.results = self.checker.check_text(&self.text);
        self.dirty_since = None;
        debug!(results = self.results.len(), "session rescanned");
    }

    /// Replace the flagged word with `suggestion` and re-scan right away,
    /// since every later offset may have shifted.
    pub fn apply_correction(
        &mut self,
        result: &SpellCheckResult,
        suggestion: &str,
    ) -> Result<&str, CorrectionError> {
        self.text = checker::apply_correction(&self.text, result, suggestion)?;
        self.rescan();
        Ok(&self.text)
    }

    /// Dismiss a word for the rest of the session, hiding every displayed
    /// occurrence of it.
    pub fn ignore(&mut self, result: &SpellCheckResult) {
        let word = result.word.to_lowercase();
        self.checker.ignore_word(&word);
        self.results.retain(|r| r.word.to_lowercase() != word);
    }

    /// Forget every dismissed word and schedule a re-scan that brings them
    /// back.
    pub fn clear_ignored(&mut self, now: Instant) {
        self.checker.clear_ignored();
        self.dirty_since.get_or_insert(now);
    }
}
