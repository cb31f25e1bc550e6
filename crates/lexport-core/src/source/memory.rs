//! In-memory dictionary source.
//!
//! Useful when the rows are already at hand, and for tests that do not
//! need SQL.

use crate::error::ExportResult;
use crate::selector::ExportMode;
use crate::source::DictionarySource;
use crate::types::{Entry, InflectedForm, Translation};

/// Source backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<Entry>,
    translations: Vec<Translation>,
    forms: Option<Vec<InflectedForm>>,
}

impl MemorySource {
    /// Create an empty source with no forms table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translations.push(translation);
        self
    }

    /// Add a form pair; this also makes the forms table present.
    pub fn with_form(mut self, form: InflectedForm) -> Self {
        self.forms.get_or_insert_with(Vec::new).push(form);
        self
    }

    /// Make the forms table present even if it has no rows.
    pub fn with_empty_forms_table(mut self) -> Self {
        self.forms.get_or_insert_with(Vec::new);
        self
    }
}

impl DictionarySource for MemorySource {
    fn translations(&self, min_score: i64) -> ExportResult<Vec<Translation>> {
        let mut selected: Vec<Translation> = self
            .translations
            .iter()
            .filter(|t| t.confidence_score >= min_score)
            .cloned()
            .collect();
        // Stable, so insertion order breaks ties.
        selected.sort_by(|a, b| b.confidence_score.cmp(&a.confidence_score));
        Ok(selected)
    }

    fn inflected_forms(&self) -> ExportResult<Option<Vec<InflectedForm>>> {
        Ok(self.forms.clone())
    }

    fn entries(&self, mode: &ExportMode) -> ExportResult<Vec<Entry>> {
        let mut selected: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| mode.admits(e.updated_at.as_deref()))
            .cloned()
            .collect();
        selected.sort_by_key(|e| e.id);
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translations_sorted_stably() {
        let source = MemorySource::new()
            .with_translation(Translation::new(1, "a", 2))
            .with_translation(Translation::new(1, "b", 5))
            .with_translation(Translation::new(1, "c", 2))
            .with_translation(Translation::new(1, "d", 0));

        let words: Vec<String> = source
            .translations(1)
            .unwrap()
            .into_iter()
            .map(|t| t.display_word)
            .collect();
        assert_eq!(words, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_forms_table_presence() {
        assert!(MemorySource::new().inflected_forms().unwrap().is_none());
        assert_eq!(
            MemorySource::new()
                .with_empty_forms_table()
                .inflected_forms()
                .unwrap(),
            Some(vec![])
        );
    }
}
