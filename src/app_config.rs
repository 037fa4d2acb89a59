use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. The tier-name vocabularies
/// live here as plain data so they can be extended without touching the
/// classification logic.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Linguistic-type names that identify each tier role
    #[serde(default)]
    pub vocabularies: Vocabularies,

    /// Content filters applied after name matching
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Interlinear alignment settings
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Fingerprint settings
    #[serde(default)]
    pub fingerprint: FingerprintConfig,

    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Tier role name vocabularies, matched exactly against linguistic-type names
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Vocabularies {
    #[serde(default = "default_transcription_names")]
    pub transcription: Vec<String>,

    #[serde(default = "default_translation_names")]
    pub translation: Vec<String>,

    #[serde(default = "default_gloss_names")]
    pub gloss: Vec<String>,

    #[serde(default = "default_comment_names")]
    pub comment: Vec<String>,
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self {
            transcription: default_transcription_names(),
            translation: default_translation_names(),
            gloss: default_gloss_names(),
            comment: default_comment_names(),
        }
    }
}

/// Settings for the language and token filters of the classifier
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassificationConfig {
    /// Languages of wider communication (ISO 639-1 or 639-2/3 codes).
    /// Transcriptions must not be in one of these; translations must.
    #[serde(default = "default_major_languages")]
    pub major_languages: Vec<String>,

    /// Detector confidence a result must exceed to count
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Minimum mean token count per annotation for a translation tier
    #[serde(default = "default_min_translation_tokens")]
    pub min_translation_tokens: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            major_languages: default_major_languages(),
            confidence_threshold: default_confidence_threshold(),
            min_translation_tokens: default_min_translation_tokens(),
        }
    }
}

/// Interlinear alignment settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AlignmentConfig {
    /// Tier ID that is always used as gloss tier when present
    #[serde(default)]
    pub gloss_tier_override: Option<String>,
}

/// Fingerprint settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FingerprintConfig {
    /// Render time subdivisions and inclusions as symbolic subdivisions
    #[serde(default)]
    pub lumped: bool,
}

/// Batch processing settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Number of documents processed concurrently
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { jobs: default_jobs() }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_transcription_names() -> Vec<String> {
    strings(&[
        "Transcription", "transcription", "Transcript", "transcript", "Transkription",
        "Orthography", "orthography", "Utterance", "utterance", "utterances",
        "Text", "text", "tx", "Phrase", "phrase", "Sentence", "sentence",
        "default-lt", "UtteranceType", "Transcripción", "transcripcion", "Transcrição",
    ])
}

fn default_translation_names() -> Vec<String> {
    strings(&[
        "Translation", "translation", "Free Translation", "free translation",
        "Free translation", "FreeTranslation", "ft", "fte", "ftn", "tl", "tr",
        "English translation", "Traducción", "traduccion", "Tradução", "traduction",
        "Übersetzung", "Terjemahan", "Перевод",
    ])
}

fn default_gloss_names() -> Vec<String> {
    strings(&[
        "Gloss", "gloss", "Glosses", "glosses", "ge", "gl", "mb-ge", "Morpheme gloss",
        "morpheme gloss", "Glossing", "glossing", "Glosa", "glosa", "GLOSS", "IGT",
    ])
}

fn default_comment_names() -> Vec<String> {
    strings(&[
        "Comment", "comment", "Comments", "comments", "nt", "Note", "note",
        "Notes", "notes", "Remark", "remarks", "Comentario", "Kommentar",
    ])
}

fn default_major_languages() -> Vec<String> {
    strings(&[
        "en", "es", "fr", "pt", "de", "ru", "zh", "ar", "id", "ms", "it", "nl", "ja", "tr", "hi",
    ])
}

fn default_confidence_threshold() -> f64 {
    0.95
}

fn default_min_translation_tokens() -> f64 {
    1.5
}

fn default_jobs() -> usize {
    4
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        for code in &self.classification.major_languages {
            language_utils::validate_language_code(code)
                .with_context(|| format!("Invalid major language in configuration: {}", code))?;
        }

        let threshold = self.classification.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!("Confidence threshold must be between 0 and 1, got {}", threshold));
        }

        if self.classification.min_translation_tokens < 0.0 {
            return Err(anyhow!(
                "Minimum translation tokens must not be negative, got {}",
                self.classification.min_translation_tokens
            ));
        }

        if self.batch.jobs == 0 {
            return Err(anyhow!("Batch jobs must be at least 1"));
        }

        let vocabularies = &self.vocabularies;
        if vocabularies.transcription.is_empty() && vocabularies.translation.is_empty() && vocabularies.gloss.is_empty() {
            return Err(anyhow!("At least one tier name vocabulary must be non-empty"));
        }

        Ok(())
    }
}
