//! Serialization of the final export document.
//!
//! The document is written compactly, UTF-8, with non-ASCII characters kept
//! literal. Writes go to a temporary file in the target directory that is
//! renamed over the output path only once fully flushed.

use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::document::ExportDocument;
use crate::error::{ErrorCode, ExportError, ExportResult};
use crate::selector::ExportMode;

/// Destination-side import command the operator should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportCommand {
    /// Replace the whole tree (full export).
    Set,
    /// Merge into the existing tree (incremental export).
    Update,
}

impl ImportCommand {
    /// Pick the command for an export mode.
    pub fn for_mode(mode: &ExportMode) -> Self {
        if mode.is_incremental() {
            Self::Update
        } else {
            Self::Set
        }
    }

    /// Whether running this command overwrites the whole destination.
    pub fn overwrites(&self) -> bool {
        matches!(self, Self::Set)
    }

    /// Command line for importing `output`.
    pub fn command_line(&self, output: &Path) -> String {
        let verb = match self {
            Self::Set => "set",
            Self::Update => "update",
        };
        format!("firebase database:{} / {}", verb, output.display())
    }

    /// Operator guidance for this command.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Set => {
                "Full export: import via the console's Import JSON, or run the set command below. \
                 WARNING: this overwrites the entire database."
            }
            Self::Update => "Partial update: merge it with the update command below.",
        }
    }
}

impl fmt::Display for ImportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Writes an [`ExportDocument`] to a file.
#[derive(Debug, Clone)]
pub struct ExportWriter {
    path: PathBuf,
}

impl ExportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the document atomically and return the file size in bytes.
    pub fn write(&self, document: &ExportDocument) -> ExportResult<u64> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| self.persist_error(e))?;

        let temp_file = NamedTempFile::new_in(parent).map_err(|e| self.persist_error(e))?;
        {
            let mut writer = BufWriter::new(&temp_file);
            Self::write_to(document, &mut writer).map_err(|e| self.rewrap(e))?;
            writer.flush().map_err(|e| self.persist_error(e))?;
        }
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| self.persist_error(e))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| self.persist_error(e))?;

        let size = fs::metadata(&self.path)
            .map_err(|e| self.persist_error(e))?
            .len();
        tracing::info!(path = %self.path.display(), bytes = size, "Wrote export document");
        Ok(size)
    }

    /// Serialize the document compactly into any writer.
    pub fn write_to<W: Write>(document: &ExportDocument, writer: W) -> ExportResult<()> {
        serde_json::to_writer(writer, document)?;
        Ok(())
    }

    fn persist_error(&self, err: impl std::error::Error + Send + Sync + 'static) -> ExportError {
        ExportError::write(&self.path, ErrorCode::WrtPersistFailed, err)
    }

    fn rewrap(&self, err: ExportError) -> ExportError {
        match err {
            ExportError::Serialization(e) if e.is_io() => {
                ExportError::write(&self.path, ErrorCode::WrtPersistFailed, e)
            }
            ExportError::Serialization(e) => {
                ExportError::write(&self.path, ErrorCode::WrtSerializeFailed, e)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ExportedWordDocument;

    fn sample() -> ExportDocument {
        let mut document = ExportDocument::default();
        document.dictionary.insert(
            "kůň".to_string(),
            ExportedWordDocument {
                word: "kůň".to_string(),
                word_normalized: "kůň".to_string(),
                translations: vec!["лошадь".to_string(), "конь".to_string()],
                gender: "m".to_string(),
                grammar: "noun".to_string(),
                stress: String::new(),
                forms: vec!["kůň".to_string(), "koně".to_string()],
                is_phrase: false,
                source: "golden_db".to_string(),
                last_updated: "2024-01-10".to_string(),
                examples: Vec::new(),
            },
        );
        document
            .forms_index
            .insert("koně".to_string(), "kůň".to_string());
        document
    }

    #[test]
    fn test_compact_and_unescaped() {
        let mut buffer = Vec::new();
        ExportWriter::write_to(&sample(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("лошадь"));
        assert!(text.contains("\"kůň\""));
        assert!(!text.contains("\\u"));
        assert!(!text.contains('\n'));
        assert!(!text.contains(": "));
        assert!(text.starts_with("{\"dictionary\":{"));
    }

    #[test]
    fn test_write_reports_size_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("firebase_update.json");
        let writer = ExportWriter::new(&path);

        let size = writer.write(&sample()).unwrap();
        assert_eq!(size, fs::metadata(&path).unwrap().len());

        let parsed: ExportDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, sample());

        let files: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firebase_update.json");
        fs::write(&path, "stale").unwrap();

        ExportWriter::new(&path).write(&ExportDocument::default()).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"dictionary":{},"forms_index":{}}"#
        );
    }

    #[test]
    fn test_write_failure_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go.
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();

        let err = ExportWriter::new(&path).write(&sample()).unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(err.code(), ErrorCode::WrtPersistFailed);
    }

    #[test]
    fn test_import_command() {
        let full = ImportCommand::for_mode(&ExportMode::Full);
        assert_eq!(full, ImportCommand::Set);
        assert!(full.overwrites());
        assert_eq!(
            full.command_line(Path::new("firebase_update.json")),
            "firebase database:set / firebase_update.json"
        );

        let delta = ImportCommand::for_mode(&ExportMode::from_cutoff(Some("2024-01-22")).unwrap());
        assert_eq!(delta, ImportCommand::Update);
        assert!(!delta.overwrites());
        assert_eq!(
            delta.command_line(Path::new("firebase_update.json")),
            "firebase database:update / firebase_update.json"
        );
    }
}
