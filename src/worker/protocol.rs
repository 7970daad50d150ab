use crate::checker::SpellCheckResult;
use serde::{Deserialize, Serialize};

/// Messages sent from the host to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    LoadDictionary {
        words: Vec<String>,
        /// Optional `(word, count)` pairs overriding list-derived counts.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        frequencies: Vec<(String, u64)>,
    },
    CheckText {
        text: String,
        id: String,
    },
}

/// Messages sent from the worker back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    Ready,
    CheckResult {
        id: String,
        errors: Vec<SpellCheckResult>,
        /// Milliseconds spent scanning.
        #[serde(rename = "processingTime")]
        processing_time: f64,
    },
}
