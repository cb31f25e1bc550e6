//! Read-only access to the relational dictionary store.
//!
//! The export only ever performs three bulk reads, so the collaborator is a
//! small trait rather than a general query interface.

pub mod memory;
pub mod sqlite;

use crate::error::ExportResult;
use crate::selector::ExportMode;
use crate::types::{Entry, InflectedForm, Translation};

pub use memory::MemorySource;
pub use sqlite::SqliteSource;

/// Trait for dictionary sources.
pub trait DictionarySource {
    /// All translations with `confidence_score >= min_score`, ordered by
    /// score descending. Ties keep the store's read order.
    fn translations(&self, min_score: i64) -> ExportResult<Vec<Translation>>;

    /// All (base form, inflected form) pairs.
    ///
    /// Returns `Ok(None)` when the forms table is absent or unreadable;
    /// that is a degraded but valid state, not an error.
    fn inflected_forms(&self) -> ExportResult<Option<Vec<InflectedForm>>>;

    /// Entries selected by `mode`, in processing order.
    fn entries(&self, mode: &ExportMode) -> ExportResult<Vec<Entry>>;
}

impl<S: DictionarySource + ?Sized> DictionarySource for &S {
    fn translations(&self, min_score: i64) -> ExportResult<Vec<Translation>> {
        (**self).translations(min_score)
    }

    fn inflected_forms(&self) -> ExportResult<Option<Vec<InflectedForm>>> {
        (**self).inflected_forms()
    }

    fn entries(&self, mode: &ExportMode) -> ExportResult<Vec<Entry>> {
        (**self).entries(mode)
    }
}
