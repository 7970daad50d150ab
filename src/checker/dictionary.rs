use anyhow::{Context, Result};
use fst::{Map, Streamer};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Word frequencies parsed from `word\tfrequency` lines.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Parse tab-separated `word\tfrequency` lines.
    ///
    /// Blank lines, `#` comments and lines whose count does not parse are
    /// skipped. Keys are lowercased; repeated keys keep the last count.
    pub fn parse(content: &str) -> Self {
        let mut counts = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((word, count)) = line.split_once('\t') else {
                warn!(line = line_no + 1, "frequency line has no tab separator");
                continue;
            };

            match count.trim().parse::<u64>() {
                Ok(count) => {
                    counts.insert(word.trim().to_lowercase(), count);
                }
                Err(_) => warn!(line = line_no + 1, "unparsable frequency {:?}", count),
            }
        }

        Self { counts }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read frequency table: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter
                .into_iter()
                .map(|(word, count)| (word.trim().to_lowercase(), count))
                .collect(),
        }
    }
}

/// Immutable lowercase word -> frequency map backed by an FST.
pub struct Dictionary {
    map: Map<Vec<u8>>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dictionary {
    pub fn empty() -> Self {
        Self {
            map: Map::default(),
        }
    }

    /// Build a dictionary from a word list.
    ///
    /// Words are trimmed and lowercased, empty entries dropped, and repeated
    /// words counted. With a frequency table, each word's count comes from the
    /// table instead and defaults to 0 when the table lacks it.
    pub fn from_words<I, S>(words: I, frequencies: Option<&FrequencyTable>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            *counts.entry(word.to_lowercase()).or_insert(0) += 1;
        }

        if let Some(table) = frequencies {
            for (word, count) in counts.iter_mut() {
                *count = table.get(word).unwrap_or(0);
            }
        }

        let map = Map::from_iter(counts).context("Failed to build dictionary")?;
        debug!(words = map.len(), "dictionary built");

        Ok(Self { map })
    }

    /// Build from a newline-separated word list file (`#` starts a comment).
    pub fn load_word_list(path: &Path, frequencies: Option<&FrequencyTable>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list: {}", path.display()))?;

        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'));

        Self::from_words(words, frequencies)
    }

    /// Load a dictionary previously written with [`Dictionary::save`].
    pub fn load_compiled(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

        let map = Map::new(bytes).context("Failed to parse dictionary")?;
        debug!(words = map.len(), path = %path.display(), "compiled dictionary loaded");

        Ok(Self { map })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create dictionary directory")?;
        }
        fs::write(path, self.map.as_fst().as_bytes())
            .with_context(|| format!("Failed to write dictionary: {}", path.display()))
    }

    /// Case-sensitive lookup; callers pass lowercased words.
    pub fn contains(&self, word: &str) -> bool {
        self.map.contains_key(word)
    }

    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.map.get(word)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All words in lexicographic order.
    pub fn words(&self) -> Vec<String> {
        let mut words = Vec::with_capacity(self.map.len());
        let mut stream = self.map.keys();

        while let Some(key) = stream.next() {
            if let Ok(word) = String::from_utf8(key.to_vec()) {
                words.push(word);
            }
        }

        words
    }

    /// Path of the compiled dictionary for `language` in the data directory.
    pub fn compiled_path(language: &str) -> Result<PathBuf> {
        let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join(format!("{}.dict", language)))
    }

    /// Small built-in word list used when no dictionary is installed.
    pub fn bootstrap() -> Result<Self> {
        Self::from_words(BOOTSTRAP_WORDS.iter().copied(), None)
    }
}

const BOOTSTRAP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "an", "and", "any", "are", "as", "at",
    "back", "be", "because", "been", "before", "but", "by", "can", "come", "could", "day",
    "did", "do", "document", "does", "down", "draft", "edit", "even", "every", "first", "for",
    "from", "get", "give", "go", "good", "had", "has", "have", "he", "her", "here", "him",
    "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "know", "like", "look",
    "make", "many", "me", "more", "most", "my", "new", "no", "not", "now", "of", "on", "one",
    "only", "or", "other", "our", "out", "over", "page", "people", "said", "say", "see",
    "she", "so", "some", "text", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "think", "this", "time", "to", "two", "up", "us", "use", "very", "want",
    "was", "way", "we", "well", "were", "what", "when", "which", "who", "will", "with",
    "word", "work", "would", "write", "year", "you", "your",
];
