//! The one-shot export job.
//!
//! Both auxiliary indexes are built in full before the main loop, so the
//! loop itself never queries the source.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::assembler::{AssemblyStats, DocumentAssembler, EntryOutcome};
use crate::config::ExportConfig;
use crate::document::ExportDocument;
use crate::error::ExportResult;
use crate::forms::FormsIndex;
use crate::selector::{EntrySelector, ExportMode};
use crate::source::{DictionarySource, SqliteSource};
use crate::translations::TranslationIndex;
use crate::writer::{ExportWriter, ImportCommand};

/// Result of building the document, before anything is written.
#[derive(Debug, Clone)]
pub struct AssembledExport {
    pub mode: ExportMode,
    /// Entries returned by the selection query.
    pub candidates: usize,
    pub document: ExportDocument,
    pub stats: AssemblyStats,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub mode: ExportMode,
    pub candidates: usize,
    /// Documents in the written dictionary.
    pub entries_written: usize,
    pub stats: AssemblyStats,
    pub forms_index_size: usize,
    pub output_path: PathBuf,
    pub file_size_bytes: u64,
    pub elapsed: Duration,
    pub import_command: ImportCommand,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// The selection matched nothing; no file was written.
    NoCandidates { mode: ExportMode },
    /// The document was written.
    Written(ExportReport),
}

/// Export job over a dictionary source.
pub struct Exporter<S: DictionarySource> {
    source: S,
    config: ExportConfig,
}

impl Exporter<SqliteSource> {
    /// Validate the configuration and open the SQLite source it names.
    pub fn open(config: ExportConfig) -> ExportResult<Self> {
        config.validate()?;
        let source = SqliteSource::open(&config.source_path)?;
        Ok(Self::new(source, config))
    }
}

impl<S: DictionarySource> Exporter<S> {
    pub fn new(source: S, config: ExportConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Give back the source, e.g. to close it explicitly.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Build the document in memory.
    ///
    /// Returns `Ok(None)` when no entry matches the selection.
    pub fn assemble(&self) -> ExportResult<Option<AssembledExport>> {
        self.config.validate()?;
        let mode = self.config.mode()?;

        let translations =
            TranslationIndex::build(&self.source, self.config.min_translation_score)?;
        let forms = FormsIndex::build(&self.source)?;

        tracing::info!("Assembling export documents");
        let entries = EntrySelector::new(&self.source, &mode).select()?;
        if entries.is_empty() {
            tracing::warn!(mode = %mode, "No entries match the export criteria");
            return Ok(None);
        }

        let candidates = entries.len();
        let fallback_timestamp = chrono::Utc::now().to_rfc3339();
        let mut assembler = DocumentAssembler::new(
            &translations,
            &forms,
            self.config.assembly_options(fallback_timestamp),
        );

        let interval = self.config.progress_interval;
        for entry in &entries {
            let outcome = assembler.assemble(entry);
            let processed = assembler.stats().processed;
            if progress_due(&outcome, processed, interval) {
                tracing::info!(processed, total = candidates, "Assembly progress");
            }
        }

        let (document, stats) = assembler.finish();
        tracing::info!(
            processed = stats.processed,
            skipped_untranslated = stats.skipped_untranslated,
            skipped_invalid_key = stats.skipped_invalid_key,
            key_collisions = stats.key_collisions,
            forms_index = document.forms_index.len(),
            "Assembly finished"
        );

        Ok(Some(AssembledExport {
            mode,
            candidates,
            document,
            stats,
        }))
    }

    /// Run the whole job: build the document and write it.
    pub fn run(&self) -> ExportResult<ExportOutcome> {
        let started = Instant::now();

        let Some(assembled) = self.assemble()? else {
            return Ok(ExportOutcome::NoCandidates {
                mode: self.config.mode()?,
            });
        };

        let writer = ExportWriter::new(&self.config.output_path);
        tracing::info!(
            path = %writer.path().display(),
            forms_index = assembled.document.forms_index.len(),
            "Writing export document"
        );
        let file_size_bytes = writer.write(&assembled.document)?;

        Ok(ExportOutcome::Written(ExportReport {
            import_command: ImportCommand::for_mode(&assembled.mode),
            mode: assembled.mode,
            candidates: assembled.candidates,
            entries_written: assembled.document.len(),
            stats: assembled.stats,
            forms_index_size: assembled.document.forms_index.len(),
            output_path: self.config.output_path.clone(),
            file_size_bytes,
            elapsed: started.elapsed(),
        }))
    }
}

/// Progress is reported on assembled entries only, so a run of skipped
/// entries after a boundary does not repeat the line.
fn progress_due(outcome: &EntryOutcome, processed: u64, interval: u64) -> bool {
    matches!(outcome, EntryOutcome::Assembled { .. })
        && interval > 0
        && processed > 0
        && processed % interval == 0
}

impl ExportReport {
    /// File size in mebibytes.
    pub fn file_size_mb(&self) -> f64 {
        self.file_size_bytes as f64 / (1024.0 * 1024.0)
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Export complete ({})", self.mode)?;
        writeln!(f, "  File:                 {}", self.output_path.display())?;
        writeln!(f, "  Candidates found:     {}", self.candidates)?;
        writeln!(f, "  Words in dictionary:  {}", self.entries_written)?;
        writeln!(f, "  Skipped (untranslated): {}", self.stats.skipped_untranslated)?;
        if self.stats.skipped_invalid_key > 0 {
            writeln!(f, "  Skipped (no key):     {}", self.stats.skipped_invalid_key)?;
        }
        if self.stats.key_collisions > 0 {
            writeln!(f, "  Key collisions:       {}", self.stats.key_collisions)?;
        }
        writeln!(f, "  Forms in index:       {}", self.forms_index_size)?;
        writeln!(f, "  Size:                 {:.2} MB", self.file_size_mb())?;
        writeln!(f, "  Elapsed:              {:.1?}", self.elapsed)?;
        writeln!(f)?;
        writeln!(f, "Import instructions:")?;
        writeln!(f, "  {}", self.import_command.advice())?;
        write!(
            f,
            "  {}",
            self.import_command.command_line(&self.output_path)
        )
    }
}
