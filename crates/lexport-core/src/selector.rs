//! Export mode selection and candidate entry queries.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

use crate::error::{ExportError, ExportResult};
use crate::source::DictionarySource;
use crate::types::Entry;

/// Which entries a run exports.
///
/// Decided once before the main loop; every entry of the run is processed
/// the same way regardless of mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Every entry in the source.
    #[default]
    Full,
    /// Only entries with `updated_at >= since`.
    Incremental { since: String },
}

impl ExportMode {
    /// Build a mode from an optional cutoff.
    ///
    /// The cutoff is validated as a date or timestamp, but the raw string is
    /// what gets compared against `updated_at`, lexicographically, exactly
    /// as the source store compares text columns.
    pub fn from_cutoff(since: Option<&str>) -> ExportResult<Self> {
        match since.map(str::trim) {
            None | Some("") => Ok(Self::Full),
            Some(since) => {
                if !is_valid_cutoff(since) {
                    return Err(ExportError::invalid_timestamp(since));
                }
                Ok(Self::Incremental {
                    since: since.to_string(),
                })
            }
        }
    }

    /// Whether this is an incremental (delta) export.
    pub fn is_incremental(&self) -> bool {
        matches!(self, Self::Incremental { .. })
    }

    /// The cutoff, if any.
    pub fn since(&self) -> Option<&str> {
        match self {
            Self::Full => None,
            Self::Incremental { since } => Some(since),
        }
    }

    /// Whether an entry with the given modification timestamp is selected.
    ///
    /// A missing timestamp never passes an incremental filter.
    pub fn admits(&self, updated_at: Option<&str>) -> bool {
        match self {
            Self::Full => true,
            Self::Incremental { since } => updated_at.is_some_and(|ts| ts >= since.as_str()),
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Incremental { since } => write!(f, "incremental since {}", since),
        }
    }
}

fn is_valid_cutoff(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// Queries the candidate entries for one run.
pub struct EntrySelector<'a, S: DictionarySource + ?Sized> {
    source: &'a S,
    mode: &'a ExportMode,
}

impl<'a, S: DictionarySource + ?Sized> EntrySelector<'a, S> {
    pub fn new(source: &'a S, mode: &'a ExportMode) -> Self {
        Self { source, mode }
    }

    /// Fetch the candidates, in processing order.
    pub fn select(&self) -> ExportResult<Vec<Entry>> {
        match self.mode {
            ExportMode::Full => {
                tracing::info!("Full mode: exporting the whole source");
            }
            ExportMode::Incremental { since } => {
                tracing::info!(since = %since, "Incremental mode: exporting entries changed since cutoff");
            }
        }

        let entries = self.source.entries(self.mode)?;
        tracing::info!(candidates = entries.len(), "Selected candidate entries");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemorySource;

    #[test]
    fn test_from_cutoff_none_is_full() {
        assert_eq!(ExportMode::from_cutoff(None).unwrap(), ExportMode::Full);
        assert_eq!(ExportMode::from_cutoff(Some("  ")).unwrap(), ExportMode::Full);
    }

    #[test]
    fn test_from_cutoff_accepts_dates_and_timestamps() {
        for value in [
            "2024-01-22",
            "2024-01-22 10:15:00",
            "2024-01-22T10:15:00",
            "2024-01-22T10:15:00.123456",
            "2024-01-22T10:15:00Z",
            "2024-01-22T10:15:00+01:00",
        ] {
            let mode = ExportMode::from_cutoff(Some(value)).unwrap();
            assert!(mode.is_incremental(), "{} should be incremental", value);
            assert_eq!(mode.since(), Some(value));
        }
    }

    #[test]
    fn test_from_cutoff_rejects_garbage() {
        let err = ExportMode::from_cutoff(Some("last tuesday")).unwrap_err();
        assert!(err.to_string().contains("last tuesday"));
    }

    #[test]
    fn test_admits() {
        let full = ExportMode::Full;
        assert!(full.admits(None));
        assert!(full.admits(Some("2020-01-01")));

        let delta = ExportMode::from_cutoff(Some("2024-01-22")).unwrap();
        assert!(!delta.admits(None));
        assert!(!delta.admits(Some("2024-01-21 23:59:59")));
        assert!(delta.admits(Some("2024-01-22")));
        assert!(delta.admits(Some("2024-01-22 00:00:01")));
        assert!(delta.admits(Some("2025-06-01")));
    }

    #[test]
    fn test_display() {
        assert_eq!(ExportMode::Full.to_string(), "full");
        let delta = ExportMode::from_cutoff(Some("2024-01-22")).unwrap();
        assert_eq!(delta.to_string(), "incremental since 2024-01-22");
    }

    #[test]
    fn test_selector_applies_mode() {
        let source = MemorySource::new()
            .with_entry(Entry::new(1, "starý").with_updated_at("2023-12-31"))
            .with_entry(Entry::new(2, "nový").with_updated_at("2024-02-01"))
            .with_entry(Entry::new(3, "bez data"));

        let full = ExportMode::Full;
        assert_eq!(EntrySelector::new(&source, &full).select().unwrap().len(), 3);

        let delta = ExportMode::from_cutoff(Some("2024-01-01")).unwrap();
        let selected = EntrySelector::new(&source, &delta).select().unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 2);
    }
}
