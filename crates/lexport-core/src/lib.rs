//! lexport-core - Core library for lexport.
//!
//! Converts a relational dictionary store (entries, translations, inflected
//! forms) into one denormalized JSON document for bulk import into a
//! hierarchical key-value store, together with a reverse index from every
//! inflected form to its dictionary key.
//!
//! # Example
//!
//! ```ignore
//! use lexport_core::{ExportConfig, ExportOutcome, Exporter};
//!
//! let config = ExportConfig::builder()
//!     .source_path("czech_russian_dictionary.db")
//!     .export_since("2024-01-22")
//!     .build();
//!
//! match Exporter::open(config)?.run()? {
//!     ExportOutcome::Written(report) => println!("{}", report),
//!     ExportOutcome::NoCandidates { .. } => println!("Nothing to export"),
//! }
//! ```

pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod exporter;
pub mod forms;
pub mod normalize;
pub mod selector;
pub mod source;
pub mod translations;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use assembler::{AssemblyOptions, AssemblyStats, DocumentAssembler, EntryOutcome};
pub use config::{ExportConfig, ExportConfigBuilder};
pub use document::{ExportDocument, ExportedWordDocument, ReverseFormsIndex};
pub use error::{ErrorCode, ExportError, ExportResult};
pub use exporter::{AssembledExport, ExportOutcome, ExportReport, Exporter};
pub use forms::FormsIndex;
pub use normalize::{normalize_key, RESERVED_CHARS};
pub use selector::{EntrySelector, ExportMode};
pub use source::{DictionarySource, MemorySource, SqliteSource};
pub use translations::TranslationIndex;
pub use types::{Entry, InflectedForm, Translation};
pub use writer::{ExportWriter, ImportCommand};
