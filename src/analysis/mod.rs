/*!
 * Analyses over a loaded document.
 *
 * `DocumentAnalysis` ties one document to the configuration and language
 * detector it is analysed with. Role candidates and role maps are computed
 * on first use and cached on the analysis, so several outputs can be
 * produced from the same classification pass.
 */

use once_cell::sync::OnceCell;

use crate::app_config::Config;
use crate::eaf::document::EafDocument;
use crate::language_utils::LanguageDetector;

pub mod fingerprint;
pub mod gloss;
pub mod interlinear;
pub mod lgr;
pub mod roles;
pub mod stats;

pub use gloss::{GlossPair, GlossSentence};
pub use interlinear::{InterlinearAligner, InterlinearLine};
pub use lgr::LgrConformance;
pub use roles::{RoleCandidates, RoleMaps, TierClassifier, TierRole};
pub use stats::{DocumentStats, TierStats};

/// Analysis context for one document
pub struct DocumentAnalysis<'a> {
    document: &'a EafDocument,
    config: &'a Config,
    detector: &'a dyn LanguageDetector,
    candidates: OnceCell<RoleCandidates>,
    role_maps: OnceCell<RoleMaps>,
}

impl<'a> DocumentAnalysis<'a> {
    pub fn new(document: &'a EafDocument, config: &'a Config, detector: &'a dyn LanguageDetector) -> Self {
        Self {
            document,
            config,
            detector,
            candidates: OnceCell::new(),
            role_maps: OnceCell::new(),
        }
    }

    pub fn document(&self) -> &'a EafDocument {
        self.document
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Role candidates, classified on first call
    pub fn candidates(&self) -> &RoleCandidates {
        self.candidates.get_or_init(|| {
            TierClassifier::new(&self.config.vocabularies, &self.config.classification, self.detector)
                .classify(self.document)
        })
    }

    /// Role → tier → annotation text maps
    pub fn role_maps(&self) -> &RoleMaps {
        self.role_maps
            .get_or_init(|| roles::role_maps(self.document, self.candidates()))
    }

    /// Assigned role of every tier, in declaration order
    pub fn assignments(&self) -> Vec<(String, Option<TierRole>)> {
        let candidates = self.candidates();
        self.document
            .tiers()
            .iter()
            .map(|tier| (tier.id.clone(), candidates.assignment(&tier.id)))
            .collect()
    }

    /// Fingerprint in the configured mode
    pub fn fingerprint(&self) -> &'a str {
        self.document.fingerprint(self.config.fingerprint.lumped)
    }

    /// Gloss sentences of the tier the aligner would choose
    pub fn gloss_sentences(&self) -> Vec<GlossSentence> {
        let tier = interlinear::select_gloss_tier(
            self.document,
            self.candidates().for_role(TierRole::Gloss),
            self.config.alignment.gloss_tier_override.as_deref(),
        );
        match tier {
            Some(tier_id) => gloss::assemble_sentences(self.document, &tier_id),
            None => Vec::new(),
        }
    }

    pub fn interlinear_lines(&self) -> Vec<InterlinearLine> {
        InterlinearAligner::new(self.document, self.candidates())
            .with_gloss_override(self.config.alignment.gloss_tier_override.as_deref())
            .align()
    }

    pub fn stats(&self) -> DocumentStats {
        stats::document_stats(self)
    }
}
