//! SQLite dictionary source.
//!
//! Schema read by the export:
//!
//! ```sql
//! czech_words   (id, word, word_normalized, gender, part_of_speech, stress, is_phrase, updated_at)
//! translations  (czech_id, russian_id, confidence_score)
//! russian_words (id, word)
//! word_forms    (base_form, inflected_form)   -- optional
//! ```

use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};
use crate::selector::ExportMode;
use crate::source::DictionarySource;
use crate::types::{Entry, InflectedForm, Translation};

const TRANSLATIONS_QUERY: &str = r#"
    SELECT t.czech_id, r.word, t.confidence_score
    FROM translations t
    JOIN russian_words r ON t.russian_id = r.id
    WHERE t.confidence_score >= ?1
    ORDER BY t.confidence_score DESC, t.rowid ASC
"#;

const FORMS_QUERY: &str = "SELECT base_form, inflected_form FROM word_forms";

const ENTRIES_QUERY: &str = r#"
    SELECT id, word, word_normalized, gender, part_of_speech, stress, is_phrase, updated_at
    FROM czech_words
"#;

/// Read-only SQLite source.
///
/// Owns the single connection for the run; it is closed when the source is
/// dropped, or explicitly through [`SqliteSource::close`].
pub struct SqliteSource {
    conn: Connection,
    path: PathBuf,
}

impl SqliteSource {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ExportError::source_not_found(path));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| ExportError::source_open(path, e))?;

        tracing::info!(path = %path.display(), "Connected to source database");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Wrap an already open in-memory connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            path: PathBuf::from(":memory:"),
        }
    }

    /// Path of the underlying database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection, reporting any error from the driver.
    pub fn close(self) -> ExportResult<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| ExportError::from(e))?;
        tracing::debug!(path = %path.display(), "Closed source database");
        Ok(())
    }

    fn read_forms(&self) -> rusqlite::Result<Vec<InflectedForm>> {
        let mut stmt = self.conn.prepare(FORMS_QUERY)?;
        let rows = stmt.query_map([], |row| {
            Ok((text_column(row, 0)?, text_column(row, 1)?))
        })?;

        let mut forms = Vec::new();
        for row in rows {
            let (base_form, inflected_form) = row?;
            if let Some(inflected_form) = inflected_form {
                forms.push(InflectedForm {
                    base_form,
                    inflected_form,
                });
            }
        }
        Ok(forms)
    }
}

impl DictionarySource for SqliteSource {
    fn translations(&self, min_score: i64) -> ExportResult<Vec<Translation>> {
        let mut stmt = self.conn.prepare(TRANSLATIONS_QUERY)?;
        let rows = stmt.query_map(params![min_score], |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                text_column(row, 1)?,
                score_column(row.get(2)?),
            ))
        })?;

        let mut translations = Vec::new();
        for row in rows {
            if let (Some(entry_id), Some(display_word), Some(confidence_score)) = row? {
                translations.push(Translation {
                    entry_id,
                    display_word,
                    confidence_score,
                });
            }
        }
        Ok(translations)
    }

    fn inflected_forms(&self) -> ExportResult<Option<Vec<InflectedForm>>> {
        match self.read_forms() {
            Ok(forms) => Ok(Some(forms)),
            Err(e) => {
                tracing::warn!(error = %e, "word_forms table missing or unreadable, continuing without forms");
                Ok(None)
            }
        }
    }

    fn entries(&self, mode: &ExportMode) -> ExportResult<Vec<Entry>> {
        let entries = match mode.since() {
            Some(since) => {
                let sql = format!("{ENTRIES_QUERY} WHERE updated_at >= ?1 ORDER BY id");
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![since], entry_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("{ENTRIES_QUERY} ORDER BY id");
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([], entry_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(entries)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        word: text_column(row, 1)?.unwrap_or_default(),
        word_normalized: text_column(row, 2)?,
        gender: text_column(row, 3)?,
        part_of_speech: text_column(row, 4)?,
        stress: text_column(row, 5)?,
        is_phrase: truthy(row.get(6)?),
        updated_at: text_column(row, 7)?,
    })
}

/// Read a loosely typed column as text. SQLite does not enforce column
/// types, so timestamps may come back as numbers.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Null => None,
        Value::Text(s) => Some(s),
        Value::Integer(n) => Some(n.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    })
}

/// Coerce a confidence score to an integer. Fractional scores are floored,
/// which keeps every score that passed `>= min_score` at or above it.
/// Text that is not a number yields `None` and the row is dropped.
fn score_column(value: Value) -> Option<i64> {
    match value {
        Value::Integer(n) => Some(n),
        Value::Real(f) => Some(f.floor() as i64),
        Value::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.floor() as i64))
        }
        Value::Null | Value::Blob(_) => None,
    }
}

fn truthy(value: Value) -> bool {
    match value {
        Value::Null => false,
        Value::Integer(n) => n != 0,
        Value::Real(f) => f != 0.0,
        Value::Text(s) => !s.is_empty(),
        Value::Blob(b) => !b.is_empty(),
    }
}
