/*!
 * Per-document context.
 *
 * An `EafDocument` owns everything loaded from one file: the tier hierarchy,
 * the annotations in document order and the resolver built over them. It is
 * read-only after loading; the fingerprints are computed on first use and
 * cached on the instance.
 */

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use log::{info, warn};
use once_cell::sync::OnceCell;

use crate::analysis::fingerprint;
use crate::errors::DocumentError;
use super::hierarchy::TierHierarchy;
use super::model::{Annotation, DocumentSource, Tier};
use super::parser;
use super::resolver::AnnotationResolver;

/// Loaded annotation document
#[derive(Debug)]
pub struct EafDocument {
    source: DocumentSource,
    hierarchy: TierHierarchy,
    resolver: AnnotationResolver,
    annotations: Vec<Annotation>,
    index: HashMap<String, usize>,
    by_tier: HashMap<String, Vec<usize>>,
    fingerprint: OnceCell<String>,
    lumped_fingerprint: OnceCell<String>,
}

impl EafDocument {
    /// Read and load a document from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let source = DocumentSource::new(path.as_ref());
        let xml = std::fs::read_to_string(path.as_ref()).map_err(|source_error| DocumentError::Io {
            document: source.identifier(),
            source: source_error,
        })?;
        Self::from_xml(source, &xml)
    }

    /// Load a document from XML text
    pub fn from_xml(source: DocumentSource, xml: &str) -> Result<Self, DocumentError> {
        let identifier = source.identifier();
        let raw = parser::parse_document(&identifier, xml)?;

        let hierarchy = TierHierarchy::build(&identifier, &raw.linguistic_types, &raw.tiers)?;

        // First occurrence wins for both the index and the resolver
        let mut annotations: Vec<Annotation> = Vec::with_capacity(raw.annotations.len());
        let mut index = HashMap::with_capacity(raw.annotations.len());
        let mut by_tier: HashMap<String, Vec<usize>> = HashMap::new();
        for annotation in raw.annotations {
            if index.contains_key(&annotation.id) {
                warn!("{}: duplicate annotation ID {}, keeping the first", identifier, annotation.id);
                continue;
            }
            let position = annotations.len();
            index.insert(annotation.id.clone(), position);
            by_tier.entry(annotation.tier_id.clone()).or_default().push(position);
            annotations.push(annotation);
        }

        let resolver = AnnotationResolver::build(&identifier, raw.timeslots, &annotations)?;

        info!(
            "Loaded {}: {} tiers, {} annotations",
            identifier,
            hierarchy.tiers().len(),
            annotations.len()
        );

        Ok(Self {
            source,
            hierarchy,
            resolver,
            annotations,
            index,
            by_tier,
            fingerprint: OnceCell::new(),
            lumped_fingerprint: OnceCell::new(),
        })
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    /// Identifier used in log lines and errors
    pub fn identifier(&self) -> String {
        self.source.identifier()
    }

    pub fn hierarchy(&self) -> &TierHierarchy {
        &self.hierarchy
    }

    pub fn resolver(&self) -> &AnnotationResolver {
        &self.resolver
    }

    pub fn tiers(&self) -> &[Tier] {
        self.hierarchy.tiers()
    }

    pub fn tier(&self, id: &str) -> Option<&Tier> {
        self.hierarchy.tier(id)
    }

    /// All annotations in document order
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.index.get(id).map(|&i| &self.annotations[i])
    }

    /// Annotations of one tier in document order
    pub fn tier_annotations(&self, tier_id: &str) -> Vec<&Annotation> {
        self.by_tier
            .get(tier_id)
            .map(|positions| positions.iter().map(|&i| &self.annotations[i]).collect())
            .unwrap_or_default()
    }

    /// Annotation ID → text for one tier
    pub fn text_map(&self, tier_id: &str) -> BTreeMap<String, String> {
        self.tier_annotations(tier_id)
            .into_iter()
            .map(|a| (a.id.clone(), a.text.clone()))
            .collect()
    }

    /// Whitespace-separated tokens of all annotations of a tier
    pub fn tier_tokens(&self, tier_id: &str) -> Vec<&str> {
        self.tier_annotations(tier_id)
            .into_iter()
            .flat_map(|a| a.text.split_whitespace())
            .collect()
    }

    /// Concatenated text of a tier, one annotation per space-separated chunk
    pub fn tier_text(&self, tier_id: &str) -> String {
        self.tier_annotations(tier_id)
            .into_iter()
            .map(|a| a.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Duration of a tier in seconds
    pub fn tier_duration_secs(&self, tier_id: &str) -> f64 {
        self.resolver.tier_duration_secs(&self.tier_annotations(tier_id))
    }

    /// Structural fingerprint, cached per mode
    pub fn fingerprint(&self, lumped: bool) -> &str {
        let cell = if lumped { &self.lumped_fingerprint } else { &self.fingerprint };
        cell.get_or_init(|| fingerprint::render(&self.hierarchy, lumped))
    }
}
