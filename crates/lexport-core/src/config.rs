//! Configuration for an export run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::assembler::AssemblyOptions;
use crate::error::{ExportError, ExportResult};
use crate::selector::ExportMode;

/// Settings for one export run. Read once, before the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Path to the source SQLite database.
    pub source_path: PathBuf,
    /// Where the export document is written.
    pub output_path: PathBuf,
    /// Minimum translation confidence score (1 accepts everything).
    pub min_translation_score: i64,
    /// Only export entries updated at or after this date/timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_since: Option<String>,
    /// Cap on translations per entry.
    pub max_translations: usize,
    /// Cap on forms per entry.
    pub max_forms: usize,
    /// Value of each document's `source` field.
    pub source_tag: String,
    /// Log progress every this many processed entries (0 disables).
    pub progress_interval: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("czech_russian_dictionary.db"),
            output_path: PathBuf::from("firebase_update.json"),
            min_translation_score: 1,
            export_since: None,
            max_translations: 10,
            max_forms: 20,
            source_tag: "golden_db".to_string(),
            progress_interval: 5000,
        }
    }
}

impl ExportConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| ExportError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ExportError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| ExportError::Configuration(e.to_string())),
            _ => Err(ExportError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides.
    ///
    /// Reads:
    /// - `LEXPORT_SOURCE_PATH`
    /// - `LEXPORT_OUTPUT_PATH`
    /// - `LEXPORT_MIN_SCORE`
    /// - `LEXPORT_EXPORT_SINCE` (empty means full export)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("LEXPORT_SOURCE_PATH") {
            self.source_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("LEXPORT_OUTPUT_PATH") {
            self.output_path = PathBuf::from(path);
        }

        if let Ok(score) = std::env::var("LEXPORT_MIN_SCORE") {
            match score.trim().parse() {
                Ok(score) => self.min_translation_score = score,
                Err(_) => tracing::warn!(value = %score, "Ignoring non-numeric LEXPORT_MIN_SCORE"),
            }
        }

        if let Ok(since) = std::env::var("LEXPORT_EXPORT_SINCE") {
            self.export_since = Some(since).filter(|s| !s.trim().is_empty());
        }

        self
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> ExportResult<()> {
        if self.max_translations == 0 {
            return Err(ExportError::validation("max_translations must be at least 1"));
        }
        if self.max_forms == 0 {
            return Err(ExportError::validation("max_forms must be at least 1"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ExportError::validation("output_path must not be empty"));
        }
        self.mode()?;
        Ok(())
    }

    /// Export mode implied by `export_since`.
    pub fn mode(&self) -> ExportResult<ExportMode> {
        ExportMode::from_cutoff(self.export_since.as_deref())
    }

    /// Options for the document assembler, with a fallback timestamp.
    pub fn assembly_options(&self, fallback_timestamp: impl Into<String>) -> AssemblyOptions {
        AssemblyOptions {
            max_translations: self.max_translations,
            max_forms: self.max_forms,
            source_tag: self.source_tag.clone(),
            fallback_timestamp: fallback_timestamp.into(),
        }
    }
}

/// Builder for ExportConfig.
#[derive(Default)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// Set the source database path.
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source_path = path.into();
        self
    }

    /// Set the output document path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Set the minimum translation score.
    pub fn min_translation_score(mut self, score: i64) -> Self {
        self.config.min_translation_score = score;
        self
    }

    /// Export only entries updated since the given date.
    pub fn export_since(mut self, since: impl Into<String>) -> Self {
        self.config.export_since = Some(since.into());
        self
    }

    /// Set the translations cap.
    pub fn max_translations(mut self, max: usize) -> Self {
        self.config.max_translations = max;
        self
    }

    /// Set the forms cap.
    pub fn max_forms(mut self, max: usize) -> Self {
        self.config.max_forms = max;
        self
    }

    /// Set the `source` tag.
    pub fn source_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.source_tag = tag.into();
        self
    }

    /// Set the progress logging interval.
    pub fn progress_interval(mut self, interval: u64) -> Self {
        self.config.progress_interval = interval;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ExportConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.min_translation_score, 1);
        assert_eq!(config.max_translations, 10);
        assert_eq!(config.max_forms, 20);
        assert!(config.export_since.is_none());
        assert_eq!(config.mode().unwrap(), ExportMode::Full);
        config.validate().unwrap();
    }

    #[test]
    fn test_builder() {
        let config = ExportConfig::builder()
            .source_path("dict.db")
            .output_path("out.json")
            .min_translation_score(3)
            .export_since("2024-01-22")
            .source_tag("test")
            .build();

        assert_eq!(config.source_path, PathBuf::from("dict.db"));
        assert_eq!(config.min_translation_score, 3);
        assert!(config.mode().unwrap().is_incremental());
        assert_eq!(config.assembly_options("now").source_tag, "test");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ExportConfig::builder().max_forms(0).build().validate().is_err());
        assert!(ExportConfig::builder()
            .max_translations(0)
            .build()
            .validate()
            .is_err());
        assert!(ExportConfig::builder()
            .export_since("soon")
            .build()
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_file_formats() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("lexport.toml");
        std::fs::write(
            &toml_path,
            "source_path = \"a.db\"\nmin_translation_score = 3\nexport_since = \"2024-01-22\"\n",
        )
        .unwrap();
        let config = ExportConfig::from_file(&toml_path).unwrap();
        assert_eq!(config.source_path, PathBuf::from("a.db"));
        assert_eq!(config.min_translation_score, 3);
        assert_eq!(config.export_since.as_deref(), Some("2024-01-22"));
        assert_eq!(config.max_forms, 20);

        let json_path = dir.path().join("lexport.json");
        std::fs::write(&json_path, r#"{"output_path": "b.json"}"#).unwrap();
        let config = ExportConfig::from_file(&json_path).unwrap();
        assert_eq!(config.output_path, PathBuf::from("b.json"));

        let yaml_path = dir.path().join("lexport.yaml");
        std::fs::write(&yaml_path, "max_translations: 5\n").unwrap();
        let config = ExportConfig::from_file(&yaml_path).unwrap();
        assert_eq!(config.max_translations, 5);

        let ini_path = dir.path().join("lexport.ini");
        std::fs::write(&ini_path, "x=1").unwrap();
        assert!(matches!(
            ExportConfig::from_file(&ini_path),
            Err(ExportError::Configuration(_))
        ));
    }
}
