//! Output document types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reverse lookup: normalized inflected form → dictionary key.
pub type ReverseFormsIndex = BTreeMap<String, String>;

/// One exported dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedWordDocument {
    /// Display form.
    pub word: String,
    /// Canonical form as stored in the source, before key normalization.
    pub word_normalized: String,
    /// Best translations first.
    pub translations: Vec<String>,
    pub gender: String,
    /// Part of speech.
    pub grammar: String,
    pub stress: String,
    /// Known forms; the display word is always present.
    pub forms: Vec<String>,
    pub is_phrase: bool,
    /// Provenance tag.
    pub source: String,
    pub last_updated: String,
    /// Reserved for usage examples; always empty.
    pub examples: Vec<serde_json::Value>,
}

/// Top-level export: `{"dictionary": {...}, "forms_index": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub dictionary: BTreeMap<String, ExportedWordDocument>,
    pub forms_index: ReverseFormsIndex,
}

impl ExportDocument {
    /// Number of dictionary entries.
    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }
}
