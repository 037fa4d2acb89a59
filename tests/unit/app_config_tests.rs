/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use glossalign::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.classification.confidence_threshold, 0.95);
    assert_eq!(config.classification.min_translation_tokens, 1.5);
    assert!(config.classification.major_languages.contains(&"en".to_string()));
    assert!(config.vocabularies.transcription.contains(&"Transcription".to_string()));
    assert!(config.vocabularies.translation.contains(&"ft".to_string()));
    assert!(config.vocabularies.comment.contains(&"nt".to_string()));
    assert_eq!(config.alignment.gloss_tier_override, None);
    assert!(!config.fingerprint.lumped);
    assert_eq!(config.batch.jobs, 4);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid major language
    config.classification.major_languages = vec!["en".to_string(), "e1g".to_string()];
    assert!(config.validate().is_err());
    config.classification.major_languages = vec!["eng".to_string(), "fre".to_string()];
    assert!(config.validate().is_ok());

    // Threshold outside 0..=1
    config.classification.confidence_threshold = -0.1;
    assert!(config.validate().is_err());
    config.classification.confidence_threshold = 0.8;

    // Negative token minimum
    config.classification.min_translation_tokens = -1.0;
    assert!(config.validate().is_err());
    config.classification.min_translation_tokens = 2.0;

    // No workers
    config.batch.jobs = 0;
    assert!(config.validate().is_err());
    config.batch.jobs = 1;

    // No vocabulary left to match against
    config.vocabularies.transcription.clear();
    config.vocabularies.translation.clear();
    config.vocabularies.gloss.clear();
    assert!(config.validate().is_err());
}

/// Test saving and reloading a configuration file
#[test]
fn test_config_save_and_load_withCustomValues_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.vocabularies.gloss.push("Glosa morfema".to_string());
    config.alignment.gloss_tier_override = Some("gl@SP".to_string());
    config.fingerprint.lumped = true;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert!(loaded.vocabularies.gloss.contains(&"Glosa morfema".to_string()));
    assert_eq!(loaded.alignment.gloss_tier_override.as_deref(), Some("gl@SP"));
    assert!(loaded.fingerprint.lumped);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.log_level.to_level_filter(), log::LevelFilter::Debug);
    Ok(())
}

/// Test that a partial file falls back to defaults for missing sections
#[test]
fn test_config_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        r#"{ "classification": { "confidence_threshold": 0.9 }, "batch": { "jobs": 8 } }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.classification.confidence_threshold, 0.9);
    assert_eq!(config.classification.min_translation_tokens, 1.5);
    assert_eq!(config.batch.jobs, 8);
    assert!(!config.vocabularies.gloss.is_empty());
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that unreadable files are reported as errors
#[test]
fn test_config_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}
