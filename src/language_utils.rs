use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling and detection
///
/// This module provides functions for validating, normalizing, and
/// matching ISO 639-1 (2-letter) and ISO 639-2/3 (3-letter) language codes,
/// plus the statistical language detection used to tell vernacular text
/// from text in a language of wider communication.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T or 639-3 (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

// ISO 639-2/B codes that differ from their 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

// Individual languages reported by the detector under a code that differs
// from the macrolanguage code people put in configuration
fn macrolanguage(code: &str) -> &str {
    match code {
        "cmn" => "zho",
        "pes" => "fas",
        "zsm" => "msa",
        "arb" => "ara",
        "ekk" => "est",
        "lvs" => "lav",
        "nob" => "nor",
        "uzn" => "uzb",
        _ => code,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2/3 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if part2b_to_part2t(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to a 3-letter ISO 639-2/T (or 639-3) code
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(macrolanguage(lang.to_639_3()).to_string());
        }
    } else if normalized_code.len() == 3 {
        if let Some(part2t) = part2b_to_part2t(&normalized_code) {
            return Ok(part2t.to_string());
        }
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(macrolanguage(&normalized_code).to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(normalized1), Ok(normalized2)) => normalized1 == normalized2,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Result of a language detection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// ISO 639-3 code of the detected language
    pub code: String,
    /// Detector confidence between 0.0 and 1.0
    pub confidence: f64,
}

impl Detection {
    pub fn new(code: &str, confidence: f64) -> Self {
        Self {
            code: code.to_string(),
            confidence,
        }
    }

    /// Whether the detected language is one of `accepted`
    pub fn is_one_of(&self, accepted: &[String]) -> bool {
        accepted.iter().any(|code| language_codes_match(&self.code, code))
    }

    /// Human-readable language name, falling back to the code
    pub fn language_name(&self) -> String {
        get_language_name(&self.code).unwrap_or_else(|_| self.code.clone())
    }
}

/// Statistical language identification
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`, or `None` if nothing can be detected
    fn detect(&self, text: &str) -> Option<Detection>;
}

/// Detector backed by the `whatlang` trigram models
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<Detection> {
        let info = whatlang::detect(text)?;
        Some(Detection {
            code: macrolanguage(info.lang().code()).to_string(),
            confidence: info.confidence(),
        })
    }
}

/// Rule-based detector for tests and dry runs.
///
/// Returns the detection of the first rule whose needle occurs in the text.
#[derive(Debug, Clone, Default)]
pub struct MockDetector {
    rules: Vec<(String, Detection)>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, needle: &str, code: &str, confidence: f64) -> Self {
        self.rules.push((needle.to_string(), Detection::new(code, confidence)));
        self
    }
}

impl LanguageDetector for MockDetector {
    fn detect(&self, text: &str) -> Option<Detection> {
        self.rules
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map(|(_, detection)| detection.clone())
    }
}
