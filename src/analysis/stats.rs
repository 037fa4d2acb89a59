use serde::Serialize;

use crate::eaf::model::ConstraintKind;
use super::roles::TierRole;
use super::{lgr, DocumentAnalysis};

/// Summary of one tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierStats {
    pub id: String,
    pub linguistic_type: String,
    pub constraint: ConstraintKind,
    pub parent: Option<String>,
    pub annotations: usize,
    pub tokens: usize,
    pub duration_secs: f64,
    pub role: Option<TierRole>,
}

/// Summary of one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStats {
    pub document: String,
    pub url: Option<String>,
    pub fingerprint: String,
    pub lumped_fingerprint: String,
    pub tier_count: usize,
    pub annotation_count: usize,
    /// Share of grammatical gloss labels that follow the Leipzig list
    pub gloss_abbreviation_ratio: Option<f64>,
    pub tiers: Vec<TierStats>,
}

pub fn document_stats(analysis: &DocumentAnalysis) -> DocumentStats {
    let document = analysis.document();
    let candidates = analysis.candidates();

    let tiers = document
        .tiers()
        .iter()
        .map(|tier| TierStats {
            id: tier.id.clone(),
            linguistic_type: tier.linguistic_type.clone(),
            constraint: tier.constraint,
            parent: tier.parent.clone(),
            annotations: document.tier_annotations(&tier.id).len(),
            tokens: document.tier_tokens(&tier.id).len(),
            duration_secs: document.tier_duration_secs(&tier.id),
            role: candidates.assignment(&tier.id),
        })
        .collect();

    let glosses: Vec<String> = analysis
        .gloss_sentences()
        .iter()
        .flat_map(|sentence| sentence.glosses())
        .collect();

    DocumentStats {
        document: document.identifier(),
        url: document.source().url.clone(),
        fingerprint: document.fingerprint(false).to_string(),
        lumped_fingerprint: document.fingerprint(true).to_string(),
        tier_count: document.tiers().len(),
        annotation_count: document.annotations().len(),
        gloss_abbreviation_ratio: lgr::abbreviation_ratio(&glosses),
        tiers,
    }
}
