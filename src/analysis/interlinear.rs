/*!
 * Interlinear alignment.
 *
 * Picks one gloss tier and one translation tier among the role candidates,
 * assembles the gloss sentences and looks up the primary text, translation
 * and comment belonging to each sentence. Lookups go through three stages:
 *
 * 1. the sentence key itself,
 * 2. the key with its trailing number incremented by one,
 * 3. every annotation anchored on the same time-aligned annotation.
 *
 * The second stage is a heuristic for files whose translation annotation is
 * numbered right after the transcription it belongs to. It is never the
 * primary path and every hit is logged.
 */

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use log::{debug, info, warn};
use serde::Serialize;

use crate::eaf::document::EafDocument;
use crate::errors::AppError;
use super::gloss::{self, GlossSentence};
use super::lgr::{self, LgrConformance};
use super::roles::{RoleCandidates, TierRole};

pub const PRIMARY_TEXT_PLACEHOLDER: &str = "PRIMARY TEXT NOT RETRIEVED";
pub const TRANSLATION_PLACEHOLDER: &str = "TRANSLATION NOT RETRIEVED";

/// How a lookup found its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupPath {
    Direct,
    IncrementedId(String),
    SharedAnchor(String),
}

/// One aligned interlinear record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterlinearLine {
    pub id: String,
    pub primary_text: String,
    pub analyzed_words: Vec<String>,
    pub glosses: Vec<String>,
    pub translation: String,
    pub comment: String,
    pub lgr_conformance: LgrConformance,
}

impl InterlinearLine {
    fn is_blank(&self) -> bool {
        self.primary_text.is_empty()
            && self.translation.is_empty()
            && self.comment.is_empty()
            && self.analyzed_words.iter().all(String::is_empty)
            && self.glosses.iter().all(String::is_empty)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Primary_Text")]
    primary_text: &'a str,
    #[serde(rename = "Analyzed_Word")]
    analyzed_word: String,
    #[serde(rename = "Gloss")]
    gloss: String,
    #[serde(rename = "Translated_Text")]
    translated_text: &'a str,
    #[serde(rename = "Comment")]
    comment: &'a str,
    #[serde(rename = "LGR_Conformance")]
    lgr_conformance: &'a str,
}

impl<'a> From<&'a InterlinearLine> for CsvRow<'a> {
    fn from(line: &'a InterlinearLine) -> Self {
        Self {
            id: &line.id,
            primary_text: &line.primary_text,
            analyzed_word: line.analyzed_words.join("\t"),
            gloss: line.glosses.join("\t"),
            translated_text: &line.translation,
            comment: &line.comment,
            lgr_conformance: line.lgr_conformance.as_str(),
        }
    }
}

/// Write lines as CSV with every field quoted
pub fn write_csv<W: io::Write>(lines: &[InterlinearLine], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    if lines.is_empty() {
        csv_writer.write_record([
            "ID", "Primary_Text", "Analyzed_Word", "Gloss", "Translated_Text", "Comment", "LGR_Conformance",
        ])?;
    }
    for line in lines {
        csv_writer.serialize(CsvRow::from(line))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write lines to a CSV file, creating or truncating it along with any
/// missing parent directories
pub fn write_csv_file(lines: &[InterlinearLine], path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::File(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::File(format!("Failed to create {}: {}", path.display(), e)))?;
    write_csv(lines, io::BufWriter::new(file))?;
    Ok(())
}

/// Increment the trailing number of an annotation ID: `ann4` → `ann5`.
///
/// Leading zeros keep their width where possible: `a09` → `a10`.
pub fn increment_id(id: &str) -> Option<String> {
    let digits_start = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    let (prefix, digits) = id.split_at(digits_start);
    let next = digits.parse::<u64>().ok()?.checked_add(1)?;
    Some(format!("{}{:0width$}", prefix, next, width = digits.len()))
}

/// Find the text for `key` in `map`.
///
/// `shared_anchor` lists the annotations resolved to the same time anchor as
/// `key`, in document order.
pub fn lookup_text<'m>(
    map: &'m BTreeMap<String, String>,
    key: &str,
    shared_anchor: &[String],
) -> Option<(&'m str, LookupPath)> {
    if let Some(text) = map.get(key) {
        return Some((text.as_str(), LookupPath::Direct));
    }

    if let Some(next) = increment_id(key) {
        if let Some(text) = map.get(&next) {
            return Some((text.as_str(), LookupPath::IncrementedId(next)));
        }
    }

    shared_anchor
        .iter()
        .filter(|sibling| sibling.as_str() != key)
        .find_map(|sibling| {
            map.get(sibling)
                .map(|text| (text.as_str(), LookupPath::SharedAnchor(sibling.clone())))
        })
}

/// Candidate with the largest total character count; the first one wins ties
pub fn select_translation_tier<'c>(document: &EafDocument, candidates: &'c [String]) -> Option<&'c str> {
    let mut best: Option<(&'c str, usize)> = None;
    for tier_id in candidates {
        let chars: usize = document
            .tier_annotations(tier_id)
            .iter()
            .map(|a| a.text.chars().count())
            .sum();
        if best.is_none_or(|(_, top)| chars > top) {
            best = Some((tier_id.as_str(), chars));
        }
    }
    best.map(|(tier_id, _)| tier_id)
}

/// Distinct gloss tokens over total gloss tokens, 0.0 for an empty tier
pub fn gloss_diversity(document: &EafDocument, tier_id: &str) -> f64 {
    let tokens = document.tier_tokens(tier_id);
    if tokens.is_empty() {
        return 0.0;
    }
    let distinct: std::collections::HashSet<&str> = tokens.iter().copied().collect();
    distinct.len() as f64 / tokens.len() as f64
}

/// Gloss tier to align on.
///
/// An override naming an existing tier wins outright; otherwise the
/// candidate with the most diverse glosses is taken, the first one on ties.
pub fn select_gloss_tier(
    document: &EafDocument,
    candidates: &[String],
    override_tier: Option<&str>,
) -> Option<String> {
    if let Some(tier_id) = override_tier {
        if document.tier(tier_id).is_some() {
            return Some(tier_id.to_string());
        }
        warn!(
            "{}: gloss tier override '{}' not found, falling back to candidates",
            document.identifier(),
            tier_id
        );
    }

    let mut best: Option<(&String, f64)> = None;
    for tier_id in candidates {
        let diversity = gloss_diversity(document, tier_id);
        if best.is_none_or(|(_, top)| diversity > top) {
            best = Some((tier_id, diversity));
        }
    }
    best.map(|(tier_id, _)| tier_id.clone())
}

/// Merge the text maps of several tiers; earlier tiers win on duplicate IDs
fn union_map(document: &EafDocument, tiers: &[String]) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for tier_id in tiers {
        for (id, text) in document.text_map(tier_id) {
            merged.entry(id).or_insert(text);
        }
    }
    merged
}

/// Aligns gloss sentences with primary text, translation and comments
pub struct InterlinearAligner<'a> {
    document: &'a EafDocument,
    candidates: &'a RoleCandidates,
    gloss_override: Option<&'a str>,
}

impl<'a> InterlinearAligner<'a> {
    pub fn new(document: &'a EafDocument, candidates: &'a RoleCandidates) -> Self {
        Self {
            document,
            candidates,
            gloss_override: None,
        }
    }

    pub fn with_gloss_override(mut self, tier_id: Option<&'a str>) -> Self {
        self.gloss_override = tier_id;
        self
    }

    /// Produce the interlinear lines of the document
    pub fn align(&self) -> Vec<InterlinearLine> {
        let doc_id = self.document.identifier();

        let Some(gloss_tier) = select_gloss_tier(
            self.document,
            self.candidates.for_role(TierRole::Gloss),
            self.gloss_override,
        ) else {
            info!("{}: no gloss tier, nothing to align", doc_id);
            return Vec::new();
        };

        let primary = union_map(self.document, self.candidates.for_role(TierRole::Transcription));
        let comments = union_map(self.document, self.candidates.for_role(TierRole::Comment));
        let translation_tier = select_translation_tier(self.document, self.candidates.for_role(TierRole::Translation));
        let translations = translation_tier
            .map(|tier_id| self.document.text_map(tier_id))
            .unwrap_or_default();

        match translation_tier {
            Some(tier_id) => debug!("{}: aligning gloss tier '{}' with translation tier '{}'", doc_id, gloss_tier, tier_id),
            None => warn!("{}: no translation tier, aligning gloss tier '{}' alone", doc_id, gloss_tier),
        }

        let name = self.document.source().name();
        let mut lines = Vec::new();

        for sentence in gloss::assemble_sentences(self.document, &gloss_tier) {
            let Some(key) = sentence.key.as_deref() else {
                continue;
            };
            let line = self.build_line(&name, key, &sentence, &primary, &translations, &comments);
            if line.is_blank() {
                debug!("{}: dropping blank line {}", doc_id, line.id);
                continue;
            }
            lines.push(line);
        }

        info!("{}: {} interlinear lines", doc_id, lines.len());
        lines
    }

    fn build_line(
        &self,
        name: &str,
        key: &str,
        sentence: &GlossSentence,
        primary: &BTreeMap<String, String>,
        translations: &BTreeMap<String, String>,
        comments: &BTreeMap<String, String>,
    ) -> InterlinearLine {
        let shared_anchor = self.document.resolver().dependents(key);

        let primary_text = self
            .find(primary, key, shared_anchor, "primary text")
            .unwrap_or_else(|| PRIMARY_TEXT_PLACEHOLDER.to_string());
        let translation = self
            .find(translations, key, shared_anchor, "translation")
            .unwrap_or_else(|| TRANSLATION_PLACEHOLDER.to_string());
        let comment = lookup_text(comments, key, shared_anchor)
            .map(|(text, _)| text.to_string())
            .unwrap_or_default();

        let analyzed_words = sentence.words();
        let glosses = sentence.glosses();
        let lgr_conformance = lgr::conformance(&analyzed_words, &glosses);

        InterlinearLine {
            id: format!("{}-{}", name, key),
            primary_text,
            analyzed_words,
            glosses,
            translation,
            comment,
            lgr_conformance,
        }
    }

    fn find(
        &self,
        map: &BTreeMap<String, String>,
        key: &str,
        shared_anchor: &[String],
        what: &str,
    ) -> Option<String> {
        let doc_id = self.document.identifier();
        match lookup_text(map, key, shared_anchor) {
            Some((text, LookupPath::Direct)) => Some(text.to_string()),
            Some((text, LookupPath::IncrementedId(next))) => {
                debug!("{}: {} for {} found under incremented ID {}", doc_id, what, key, next);
                Some(text.to_string())
            }
            Some((text, LookupPath::SharedAnchor(sibling))) => {
                debug!("{}: {} for {} found on co-anchored annotation {}", doc_id, what, key, sibling);
                Some(text.to_string())
            }
            None => {
                warn!("{}: no {} retrieved for {}", doc_id, what, key);
                None
            }
        }
    }
}
