use crate::diff::DiffOptions;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LANGUAGE: &str = "en_US";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub personal_dictionary: Option<PathBuf>,

    /// Plain word list (one word per line) to build the dictionary from.
    #[serde(default)]
    pub word_list: Option<PathBuf>,

    /// `word\tfrequency` table merged into the word list.
    #[serde(default)]
    pub frequency_table: Option<PathBuf>,

    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    #[serde(default)]
    pub diff: DiffOptions,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Check results arriving later than this are ignored.
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_max_suggestions() -> usize {
    crate::checker::DEFAULT_MAX_SUGGESTIONS
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_response_timeout_ms() -> u64 {
    5000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            response_timeout_ms: default_response_timeout_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            personal_dictionary: None,
            word_list: None,
            frequency_table: None,
            ignore_patterns: vec![
                r"\b[A-Z0-9_]{2,}\b".to_string(),    // ALL_CAPS
                r"https?://\S+".to_string(),         // URLs
                r"\b[a-fA-F0-9]{32,}\b".to_string(), // Hashes
                r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}".to_string(), // Emails
            ],
            max_suggestions: default_max_suggestions(),
            diff: DiffOptions::default(),
            session: SessionConfig::default(),
        }
    }
}

/// Command-line values that take precedence over config files.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub personal_dictionary: Option<PathBuf>,
    pub word_list: Option<PathBuf>,
    pub frequency_table: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub max_suggestions: Option<usize>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        let local_path = PathBuf::from(".redraft.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        config.apply(overrides);

        if config.personal_dictionary.is_none() {
            config.personal_dictionary = Self::default_personal_dict_path();
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Values from `other` win wherever they differ from the defaults.
        if other.language != DEFAULT_LANGUAGE {
            self.language = other.language;
        }
        if other.personal_dictionary.is_some() {
            self.personal_dictionary = other.personal_dictionary;
        }
        if other.word_list.is_some() {
            self.word_list = other.word_list;
        }
        if other.frequency_table.is_some() {
            self.frequency_table = other.frequency_table;
        }
        if !other.ignore_patterns.is_empty() {
            self.ignore_patterns = other.ignore_patterns;
        }
        if other.max_suggestions != default_max_suggestions() {
            self.max_suggestions = other.max_suggestions;
        }
        self.merge_diff(other.diff);
        self.merge_session(other.session);
        self
    }

    // A file without `[diff]` or `[session]` still deserializes both tables
    // with defaults, so these merge field by field like the scalars above.
    fn merge_diff(&mut self, other: DiffOptions) {
        let defaults = DiffOptions::default();
        if other.max_tokens != defaults.max_tokens {
            self.diff.max_tokens = other.max_tokens;
        }
        if other.min_similarity != defaults.min_similarity {
            self.diff.min_similarity = other.min_similarity;
        }
        if other.ignore_whitespace_changes != defaults.ignore_whitespace_changes {
            self.diff.ignore_whitespace_changes = other.ignore_whitespace_changes;
        }
    }

    fn merge_session(&mut self, other: SessionConfig) {
        if other.debounce_ms != default_debounce_ms() {
            self.session.debounce_ms = other.debounce_ms;
        }
        if other.response_timeout_ms != default_response_timeout_ms() {
            self.session.response_timeout_ms = other.response_timeout_ms;
        }
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(path) = overrides.personal_dictionary {
            self.personal_dictionary = Some(path);
        }
        if let Some(path) = overrides.word_list {
            self.word_list = Some(path);
        }
        if let Some(path) = overrides.frequency_table {
            self.frequency_table = Some(path);
        }
        self.ignore_patterns.extend(overrides.ignore_patterns);
        if let Some(max) = overrides.max_suggestions {
            self.max_suggestions = max;
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "redraft").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_personal_dict_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "redraft").map(|dirs| dirs.config_dir().join("personal.txt"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "redraft").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "en_US");
        assert_eq!(config.max_suggestions, 3);
        assert_eq!(config.diff.max_tokens, 500);
        assert_eq!(config.session.debounce_ms, 300);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            language: "en_GB".to_string(),
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.language, "en_GB");
    }

    #[test]
    fn test_local_file_keeps_global_tables() {
        let global: Config = toml::from_str(
            r#"
            [diff]
            max_tokens = 1000
            ignore_whitespace_changes = true

            [session]
            debounce_ms = 50
            "#,
        )
        .unwrap();
        let local: Config = toml::from_str(r#"language = "en_GB""#).unwrap();

        let merged = Config::default().merge(global).merge(local);
        assert_eq!(merged.language, "en_GB");
        assert_eq!(merged.diff.max_tokens, 1000);
        assert!(merged.diff.ignore_whitespace_changes);
        assert_eq!(merged.diff.min_similarity, 0.15);
        assert_eq!(merged.session.debounce_ms, 50);
        assert_eq!(merged.session.response_timeout_ms, 5000);
    }

    #[test]
    fn test_local_table_overrides_single_field() {
        let global: Config = toml::from_str("[session]\ndebounce_ms = 50\n").unwrap();
        let local: Config = toml::from_str("[session]\nresponse_timeout_ms = 900\n").unwrap();

        let merged = Config::default().merge(global).merge(local);
        assert_eq!(merged.session.debounce_ms, 50);
        assert_eq!(merged.session.response_timeout_ms, 900);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            max_suggestions = 5

            [diff]
            min_similarity = 0.3

            [session]
            debounce_ms = 150
            "#,
        )
        .unwrap();

        assert_eq!(config.language, "en_US");
        assert_eq!(config.max_suggestions, 5);
        assert_eq!(config.diff.min_similarity, 0.3);
        assert_eq!(config.diff.max_tokens, 500);
        assert_eq!(config.session.debounce_ms, 150);
        assert_eq!(config.session.response_timeout_ms, 5000);
        assert!(config.ignore_patterns.is_empty());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.apply(Overrides {
            language: Some("en_GB".to_string()),
            max_suggestions: Some(1),
            ignore_patterns: vec!["foo".to_string()],
            ..Default::default()
        });
        assert_eq!(config.language, "en_GB");
        assert_eq!(config.max_suggestions, 1);
        assert_eq!(config.ignore_patterns.last().map(String::as_str), Some("foo"));
    }
}
