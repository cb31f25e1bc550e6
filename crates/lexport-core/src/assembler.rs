//! Per-entry document assembly.
//!
//! Joins an entry with its translations and forms, writes the resulting
//! document under the entry's key and records every other form in the
//! reverse index.

use std::collections::BTreeMap;

use crate::document::{ExportDocument, ExportedWordDocument, ReverseFormsIndex};
use crate::forms::FormsIndex;
use crate::normalize::normalize_key;
use crate::translations::TranslationIndex;
use crate::types::Entry;

/// Knobs for building documents.
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    /// Cap on translations per document.
    pub max_translations: usize,
    /// Cap on forms per document.
    pub max_forms: usize,
    /// Value of the `source` field.
    pub source_tag: String,
    /// `last_updated` for entries without a timestamp.
    pub fallback_timestamp: String,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            max_translations: 10,
            max_forms: 20,
            source_tag: "golden_db".to_string(),
            fallback_timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A document was written under `key`; `replaced` is set when an earlier
    /// entry with the same key was overwritten.
    Assembled { key: String, replaced: bool },
    /// No usable key.
    InvalidKey,
    /// No qualifying translation.
    Untranslated,
}

/// Counters for one assembly pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Documents written (including ones later overwritten).
    pub processed: u64,
    /// Entries dropped for lacking translations.
    pub skipped_untranslated: u64,
    /// Entries dropped for a missing or empty key.
    pub skipped_invalid_key: u64,
    /// Documents that overwrote an earlier one with the same key.
    pub key_collisions: u64,
}

/// Accumulates documents and the reverse forms index.
pub struct DocumentAssembler<'a> {
    translations: &'a TranslationIndex,
    forms: &'a FormsIndex,
    options: AssemblyOptions,
    dictionary: BTreeMap<String, ExportedWordDocument>,
    forms_index: ReverseFormsIndex,
    stats: AssemblyStats,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        translations: &'a TranslationIndex,
        forms: &'a FormsIndex,
        options: AssemblyOptions,
    ) -> Self {
        Self {
            translations,
            forms,
            options,
            dictionary: BTreeMap::new(),
            forms_index: ReverseFormsIndex::new(),
            stats: AssemblyStats::default(),
        }
    }

    /// Process one entry.
    pub fn assemble(&mut self, entry: &Entry) -> EntryOutcome {
        let Some(word_normalized) = entry.word_normalized.as_deref().filter(|w| !w.is_empty())
        else {
            self.stats.skipped_invalid_key += 1;
            return EntryOutcome::InvalidKey;
        };

        let key = normalize_key(word_normalized);
        if key.is_empty() {
            self.stats.skipped_invalid_key += 1;
            return EntryOutcome::InvalidKey;
        }

        let translations = match self.translations.get(entry.id) {
            Some(list) if !list.is_empty() => list,
            _ => {
                self.stats.skipped_untranslated += 1;
                return EntryOutcome::Untranslated;
            }
        };

        let forms = self.collect_forms(&key, &entry.word);
        for form in &forms {
            let normalized = normalize_key(form);
            if !normalized.is_empty() && normalized != key {
                self.forms_index.insert(normalized, key.clone());
            }
        }

        let document = ExportedWordDocument {
            word: entry.word.clone(),
            word_normalized: word_normalized.to_string(),
            translations: translations
                .iter()
                .take(self.options.max_translations)
                .cloned()
                .collect(),
            gender: entry.gender.clone().unwrap_or_default(),
            grammar: entry.part_of_speech.clone().unwrap_or_default(),
            stress: entry.stress.clone().unwrap_or_default(),
            forms: forms.into_iter().take(self.options.max_forms).collect(),
            is_phrase: entry.is_phrase,
            source: self.options.source_tag.clone(),
            last_updated: entry
                .updated_at
                .clone()
                .unwrap_or_else(|| self.options.fallback_timestamp.clone()),
            examples: Vec::new(),
        };

        // Last write wins on key collisions.
        let replaced = self.dictionary.insert(key.clone(), document).is_some();
        if replaced {
            self.stats.key_collisions += 1;
            tracing::debug!(key = %key, entry_id = entry.id, "Key collision, keeping the later entry");
        }
        self.stats.processed += 1;

        EntryOutcome::Assembled { key, replaced }
    }

    /// Known forms for `key`, display word first.
    ///
    /// The word leads the list before any cap is applied, so it is never cut.
    fn collect_forms(&self, key: &str, word: &str) -> Vec<String> {
        let mut forms = vec![word.to_string()];
        if let Some(set) = self.forms.get(key) {
            forms.extend(set.iter().filter(|f| f.as_str() != word).cloned());
        }
        forms
    }

    /// Counters so far.
    pub fn stats(&self) -> &AssemblyStats {
        &self.stats
    }

    /// Finish the pass.
    pub fn finish(self) -> (ExportDocument, AssemblyStats) {
        (
            ExportDocument {
                dictionary: self.dictionary,
                forms_index: self.forms_index,
            },
            self.stats,
        )
    }
}
