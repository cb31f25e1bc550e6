//! Inflected forms grouped by base form.
//!
//! Base forms are grouped under [`normalize_key`], the same function that
//! produces dictionary keys, so an entry finds its forms by its own key even
//! when the base form carries reserved characters.

use std::collections::{BTreeSet, HashMap};

use crate::error::ExportResult;
use crate::normalize::normalize_key;
use crate::source::DictionarySource;
use crate::types::InflectedForm;

/// Mapping normalized base form → raw inflected forms.
#[derive(Debug, Clone, Default)]
pub struct FormsIndex {
    by_base: HashMap<String, BTreeSet<String>>,
    available: bool,
}

impl FormsIndex {
    /// Load all form pairs. A missing forms table yields an empty index.
    pub fn build<S: DictionarySource + ?Sized>(source: &S) -> ExportResult<Self> {
        tracing::info!("Loading inflected forms");
        let index = match source.inflected_forms()? {
            Some(rows) => Self::from_rows(rows),
            None => {
                tracing::warn!("No inflected forms available, entries will only list their own word");
                Self::unavailable()
            }
        };
        tracing::info!(base_forms = index.len(), "Loaded inflected forms");
        Ok(index)
    }

    /// Group rows, skipping empty base forms and empty inflections.
    pub fn from_rows(rows: impl IntoIterator<Item = InflectedForm>) -> Self {
        let mut by_base: HashMap<String, BTreeSet<String>> = HashMap::new();
        for row in rows {
            let base = row.base_form.as_deref().map(normalize_key).unwrap_or_default();
            if base.is_empty() || row.inflected_form.trim().is_empty() {
                continue;
            }
            by_base.entry(base).or_default().insert(row.inflected_form);
        }
        Self {
            by_base,
            available: true,
        }
    }

    /// Index used when the forms table is absent.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Known inflections for a dictionary key.
    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.by_base.get(key)
    }

    /// Whether the forms table was present.
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn len(&self) -> usize {
        self.by_base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_base.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn test_groups_case_and_whitespace_insensitive() {
        let index = FormsIndex::from_rows(vec![
            InflectedForm::new("Kočka ", "kočky"),
            InflectedForm::new("kočka", "kočce"),
            InflectedForm::new("kočka", "kočky"),
        ]);

        let forms = index.get("kočka").unwrap();
        assert_eq!(forms.len(), 2);
        assert!(forms.contains("kočky"));
        assert!(forms.contains("kočce"));
    }

    #[test]
    fn test_base_form_found_by_stripped_key() {
        let index = FormsIndex::from_rows(vec![InflectedForm::new("dům/byt", "domu")]);
        assert!(index.get("důmbyt").is_some());
        assert!(index.get("dům/byt").is_none());
    }

    #[test]
    fn test_skips_empty_rows() {
        let index = FormsIndex::from_rows(vec![
            InflectedForm::new("   ", "nic"),
            InflectedForm {
                base_form: None,
                inflected_form: "sirotek".to_string(),
            },
            InflectedForm::new("pes", "  "),
        ]);
        assert!(index.is_empty());
        assert!(index.is_available());
    }

    #[test]
    fn test_missing_table_is_unavailable() {
        let index = FormsIndex::build(&MemorySource::new()).unwrap();
        assert!(!index.is_available());
        assert!(index.is_empty());
        assert!(index.get("anything").is_none());
    }
}
