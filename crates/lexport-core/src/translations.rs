//! Per-entry translation lists.

use std::collections::HashMap;

use crate::error::ExportResult;
use crate::source::DictionarySource;
use crate::types::Translation;

/// Mapping entry id → translations, best first.
///
/// Entries without a qualifying translation are absent rather than mapped
/// to an empty list.
#[derive(Debug, Clone, Default)]
pub struct TranslationIndex {
    by_entry: HashMap<i64, Vec<String>>,
}

impl TranslationIndex {
    /// Load every translation scoring at least `min_score`.
    pub fn build<S: DictionarySource + ?Sized>(source: &S, min_score: i64) -> ExportResult<Self> {
        tracing::info!(min_score, "Loading translations");
        let index = Self::from_rows(source.translations(min_score)?, min_score);
        tracing::info!(
            entries = index.len(),
            translations = index.translation_count(),
            "Loaded translations"
        );
        Ok(index)
    }

    /// Group rows by entry.
    ///
    /// Rows are re-filtered and stably sorted by descending score, so the
    /// order within an entry never depends on how the source sorted ties.
    pub fn from_rows(rows: impl IntoIterator<Item = Translation>, min_score: i64) -> Self {
        let mut rows: Vec<Translation> = rows
            .into_iter()
            .filter(|t| t.confidence_score >= min_score)
            .collect();
        rows.sort_by(|a, b| b.confidence_score.cmp(&a.confidence_score));

        let mut by_entry: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            by_entry.entry(row.entry_id).or_default().push(row.display_word);
        }
        Self { by_entry }
    }

    /// Translations for an entry, best first.
    pub fn get(&self, entry_id: i64) -> Option<&[String]> {
        self.by_entry.get(&entry_id).map(Vec::as_slice)
    }

    /// Number of entries with at least one translation.
    pub fn len(&self) -> usize {
        self.by_entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entry.is_empty()
    }

    /// Total translations across all entries.
    pub fn translation_count(&self) -> usize {
        self.by_entry.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_entry_best_first() {
        let index = TranslationIndex::from_rows(
            vec![
                Translation::new(1, "здравствуй", 3),
                Translation::new(2, "кошка", 4),
                Translation::new(1, "привет", 5),
                Translation::new(1, "салют", 3),
            ],
            1,
        );

        assert_eq!(index.len(), 2);
        assert_eq!(index.translation_count(), 4);
        assert_eq!(
            index.get(1).unwrap(),
            &["привет".to_string(), "здравствуй".to_string(), "салют".to_string()]
        );
        assert_eq!(index.get(2).unwrap(), &["кошка".to_string()]);
    }

    #[test]
    fn test_below_threshold_is_absent() {
        let index = TranslationIndex::from_rows(
            vec![Translation::new(7, "плохо", 1), Translation::new(8, "хорошо", 3)],
            2,
        );
        assert!(index.get(7).is_none());
        assert!(index.get(8).is_some());
        assert!(index.get(9).is_none());
    }

    #[test]
    fn test_empty() {
        let index = TranslationIndex::from_rows(Vec::new(), 0);
        assert!(index.is_empty());
        assert_eq!(index.translation_count(), 0);
    }
}
