//! lexport - one-shot dictionary export.
//!
//! Reads the dictionary database and writes a single JSON document ready for
//! bulk import into the destination tree.
//!
//! # Configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. `--config <file>` (`.toml`, `.json`, `.yaml`)
//! 3. environment (`LEXPORT_SOURCE_PATH`, `LEXPORT_OUTPUT_PATH`,
//!    `LEXPORT_MIN_SCORE`, `LEXPORT_EXPORT_SINCE`), including a `.env` file
//! 4. command-line flags
//!
//! Logs go to stderr (`RUST_LOG` overrides the default `info` level); the
//! operator report goes to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lexport_core::{ExportConfig, ExportError, ExportOutcome, Exporter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Export the dictionary database to a JSON document for bulk import.
#[derive(Debug, Parser)]
#[command(name = "lexport", version, about)]
struct Cli {
    /// Configuration file (.toml, .json, .yaml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source SQLite database.
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Output JSON document.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum translation confidence score.
    #[arg(long)]
    min_score: Option<i64>,

    /// Only export entries updated at or after this date (YYYY-MM-DD).
    #[arg(long, conflicts_with = "full")]
    since: Option<String>,

    /// Force a full export, ignoring any configured cutoff.
    #[arg(long)]
    full: bool,
}

impl Cli {
    fn load_config(&self) -> Result<ExportConfig> {
        Ok(self.apply_flags(self.base_config()?.with_env_overrides()))
    }

    /// Defaults, or the `--config` file when given.
    fn base_config(&self) -> Result<ExportConfig> {
        match &self.config {
            Some(path) => ExportConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display())),
            None => Ok(ExportConfig::default()),
        }
    }

    fn apply_flags(&self, mut config: ExportConfig) -> ExportConfig {
        if let Some(source) = &self.source {
            config.source_path = source.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(score) = self.min_score {
            config.min_translation_score = score;
        }
        if let Some(since) = &self.since {
            config.export_since = Some(since.clone());
        }
        if self.full {
            config.export_since = None;
        }
        config
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs to stderr so the report on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            if let Some(suggestion) = e.downcast_ref::<ExportError>().and_then(|e| e.suggestion()) {
                tracing::error!("{}", suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    tracing::info!(
        source = %config.source_path.display(),
        output = %config.output_path.display(),
        min_score = config.min_translation_score,
        since = config.export_since.as_deref().unwrap_or("-"),
        "Starting export"
    );

    let exporter = Exporter::open(config)?;
    let outcome = exporter.run();

    // Close explicitly so a failing close is reported; drop covers the error paths.
    if let Err(e) = exporter.into_source().close() {
        tracing::warn!(error = %e, "Failed to close source database");
    }

    match outcome {
        Ok(ExportOutcome::Written(report)) => {
            println!("{}", report);
            Ok(())
        }
        Ok(ExportOutcome::NoCandidates { mode }) => {
            println!("No entries to export ({}). Nothing was written.", mode);
            Ok(())
        }
        Err(e) if !e.is_fatal() => {
            // Reported, but the run still ends normally.
            tracing::error!(code = e.code().as_str(), "{}", e);
            println!("Export failed while writing the output: {}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
