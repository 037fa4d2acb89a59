/*!
 * Tier role classification.
 *
 * A tier becomes a candidate for a role when its linguistic-type name is in
 * that role's vocabulary. Transcription and translation candidates then go
 * through content filters: an ID-number check and a language detection pass
 * that separates vernacular text from text in a language of wider
 * communication.
 */

use std::collections::BTreeMap;
use std::fmt;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::app_config::{ClassificationConfig, Vocabularies};
use crate::eaf::document::EafDocument;
use crate::language_utils::{Detection, LanguageDetector};

// Catalog or example numbers: three or more trailing digits, or a leading digit
static ID_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d|\d{3,}$").unwrap()
});

/// Semantic role of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierRole {
    Transcription,
    Translation,
    Gloss,
    Comment,
}

impl TierRole {
    pub const ALL: [TierRole; 4] = [Self::Transcription, Self::Translation, Self::Gloss, Self::Comment];
}

impl fmt::Display for TierRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transcription => "transcription",
            Self::Translation => "translation",
            Self::Gloss => "gloss",
            Self::Comment => "comment",
        };
        write!(f, "{}", name)
    }
}

/// Why a name-matched tier was turned down for a role
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    EmptyTier,
    IdTier,
    /// Transcription text confidently in a major language
    MajorLanguage(Detection),
    NoLanguageDetected,
    LowConfidence(Detection),
    /// Translation text confidently in a language that is not accepted
    NotMajorLanguage(Detection),
    /// Mean tokens per annotation below the minimum
    TooFewTokens(f64),
}

/// Candidate tiers per role, in declaration order
#[derive(Debug, Clone, Default)]
pub struct RoleCandidates {
    pub transcription: Vec<String>,
    pub translation: Vec<String>,
    pub gloss: Vec<String>,
    pub comment: Vec<String>,
    /// (tier ID, role, reason) for every name-matched tier that was rejected
    pub rejections: Vec<(String, TierRole, Rejection)>,
}

impl RoleCandidates {
    pub fn for_role(&self, role: TierRole) -> &[String] {
        match role {
            TierRole::Transcription => &self.transcription,
            TierRole::Translation => &self.translation,
            TierRole::Gloss => &self.gloss,
            TierRole::Comment => &self.comment,
        }
    }

    fn push(&mut self, role: TierRole, tier_id: &str) {
        let list = match role {
            TierRole::Transcription => &mut self.transcription,
            TierRole::Translation => &mut self.translation,
            TierRole::Gloss => &mut self.gloss,
            TierRole::Comment => &mut self.comment,
        };
        list.push(tier_id.to_string());
    }

    /// Single role of a tier: the first role, in declaration order of
    /// `TierRole`, that accepted it
    pub fn assignment(&self, tier_id: &str) -> Option<TierRole> {
        TierRole::ALL
            .into_iter()
            .find(|role| self.for_role(*role).iter().any(|id| id == tier_id))
    }

    pub fn is_empty(&self) -> bool {
        TierRole::ALL.iter().all(|role| self.for_role(*role).is_empty())
    }
}

/// Role → tier ID → (annotation ID → text)
pub type RoleMaps = BTreeMap<TierRole, BTreeMap<String, BTreeMap<String, String>>>;

/// Build the role maps of a document from its candidates
pub fn role_maps(document: &EafDocument, candidates: &RoleCandidates) -> RoleMaps {
    let mut maps = RoleMaps::new();
    for role in TierRole::ALL {
        let tiers = maps.entry(role).or_default();
        for tier_id in candidates.for_role(role) {
            tiers.insert(tier_id.clone(), document.text_map(tier_id));
        }
    }
    maps
}

/// Whether the tokens look like catalog or example numbers rather than text.
///
/// Only the first two tokens are inspected; fewer than two tokens never
/// qualify.
pub fn is_id_tier(tokens: &[&str]) -> bool {
    tokens.len() >= 2 && tokens[..2].iter().all(|token| ID_TOKEN_REGEX.is_match(token))
}

// Content of one tier, with the detection pass run at most once
struct TierContent<'d> {
    tokens: Vec<&'d str>,
    annotation_count: usize,
    text: String,
    detection: OnceCell<Option<Detection>>,
}

impl<'d> TierContent<'d> {
    fn new(document: &'d EafDocument, tier_id: &str) -> Self {
        Self {
            tokens: document.tier_tokens(tier_id),
            annotation_count: document.tier_annotations(tier_id).len(),
            text: document.tier_text(tier_id),
            detection: OnceCell::new(),
        }
    }

    fn detection(&self, detector: &dyn LanguageDetector) -> Option<&Detection> {
        self.detection
            .get_or_init(|| detector.detect(&self.text))
            .as_ref()
    }

    fn mean_tokens(&self) -> f64 {
        if self.annotation_count == 0 {
            return 0.0;
        }
        self.tokens.len() as f64 / self.annotation_count as f64
    }
}

/// Assigns role candidates to the tiers of a document
pub struct TierClassifier<'a> {
    vocabularies: &'a Vocabularies,
    settings: &'a ClassificationConfig,
    detector: &'a dyn LanguageDetector,
}

impl<'a> TierClassifier<'a> {
    pub fn new(
        vocabularies: &'a Vocabularies,
        settings: &'a ClassificationConfig,
        detector: &'a dyn LanguageDetector,
    ) -> Self {
        Self {
            vocabularies,
            settings,
            detector,
        }
    }

    /// Classify every tier of the document
    pub fn classify(&self, document: &EafDocument) -> RoleCandidates {
        let mut candidates = RoleCandidates::default();
        let doc_id = document.identifier();

        for tier in document.tiers() {
            let name = tier.linguistic_type.as_str();
            let content = TierContent::new(document, &tier.id);

            for role in TierRole::ALL {
                if !self.vocabulary(role).iter().any(|entry| entry == name) {
                    continue;
                }

                let verdict = match role {
                    TierRole::Transcription => self.check_transcription(&content),
                    TierRole::Translation => self.check_translation(&content),
                    TierRole::Gloss if content.tokens.is_empty() => Err(Rejection::EmptyTier),
                    TierRole::Gloss | TierRole::Comment => Ok(()),
                };

                match verdict {
                    Ok(()) => {
                        debug!("{}: tier '{}' is a {} candidate", doc_id, tier.id, role);
                        candidates.push(role, &tier.id);
                    }
                    Err(rejection) => {
                        log_rejection(&doc_id, &tier.id, role, &rejection);
                        candidates.rejections.push((tier.id.clone(), role, rejection));
                    }
                }
            }
        }

        candidates
    }

    fn vocabulary(&self, role: TierRole) -> &[String] {
        match role {
            TierRole::Transcription => &self.vocabularies.transcription,
            TierRole::Translation => &self.vocabularies.translation,
            TierRole::Gloss => &self.vocabularies.gloss,
            TierRole::Comment => &self.vocabularies.comment,
        }
    }

    fn is_confident(&self, detection: &Detection) -> bool {
        detection.confidence > self.settings.confidence_threshold
    }

    fn check_transcription(&self, content: &TierContent) -> Result<(), Rejection> {
        if content.tokens.is_empty() {
            return Err(Rejection::EmptyTier);
        }
        if is_id_tier(&content.tokens) {
            return Err(Rejection::IdTier);
        }
        if let Some(detection) = content.detection(self.detector) {
            if self.is_confident(detection) && detection.is_one_of(&self.settings.major_languages) {
                return Err(Rejection::MajorLanguage(detection.clone()));
            }
        }
        Ok(())
    }

    fn check_translation(&self, content: &TierContent) -> Result<(), Rejection> {
        if content.tokens.is_empty() {
            return Err(Rejection::EmptyTier);
        }

        let detection = content
            .detection(self.detector)
            .ok_or(Rejection::NoLanguageDetected)?;
        if !self.is_confident(detection) {
            return Err(Rejection::LowConfidence(detection.clone()));
        }
        if !detection.is_one_of(&self.settings.major_languages) {
            return Err(Rejection::NotMajorLanguage(detection.clone()));
        }

        let mean = content.mean_tokens();
        if mean < self.settings.min_translation_tokens {
            return Err(Rejection::TooFewTokens(mean));
        }
        Ok(())
    }
}

fn log_rejection(doc_id: &str, tier_id: &str, role: TierRole, rejection: &Rejection) {
    match rejection {
        Rejection::EmptyTier => debug!("{}: tier '{}' is empty, not a {} tier", doc_id, tier_id, role),
        Rejection::IdTier => info!("{}: tier '{}' holds ID numbers, not a {} tier", doc_id, tier_id, role),
        Rejection::MajorLanguage(detection) => info!(
            "{}: tier '{}' is {} (confidence {:.2}), not a vernacular transcription",
            doc_id, tier_id, detection.language_name(), detection.confidence
        ),
        Rejection::NoLanguageDetected => warn!(
            "{}: no language detected for tier '{}', rejecting it as {}",
            doc_id, tier_id, role
        ),
        Rejection::LowConfidence(detection) => info!(
            "{}: tier '{}' detected as {} with only {:.2} confidence, rejecting it as {}",
            doc_id, tier_id, detection.language_name(), detection.confidence, role
        ),
        Rejection::NotMajorLanguage(detection) => info!(
            "{}: tier '{}' is {}, which is not an accepted {} language",
            doc_id, tier_id, detection.language_name(), role
        ),
        Rejection::TooFewTokens(mean) => info!(
            "{}: tier '{}' averages {:.2} tokens per annotation, too short for a {}",
            doc_id, tier_id, mean, role
        ),
    }
}
