/*!
 * Annotation resolution.
 *
 * Reference annotations inherit their timing from the nearest alignable
 * annotation reached by following parent links. The resolver indexes both
 * annotation shapes, walks every chain once with a memo table and a cycle
 * guard, and answers timing questions from the result.
 */

use std::collections::{HashMap, HashSet};
use log::{debug, warn};

use crate::errors::DocumentError;
use super::model::{Annotation, AnnotationKind};

/// Index of annotation links and resolved time anchors for one document
#[derive(Debug, Clone, Default)]
pub struct AnnotationResolver {
    document: String,
    timeslots: HashMap<String, u64>,
    /// Alignable ID → (start slot, end slot)
    alignable: HashMap<String, (String, String)>,
    /// Reference ID → parent annotation ID
    references: HashMap<String, String>,
    /// Annotation ID → nearest alignable ancestor, `None` for broken chains
    ancestors: HashMap<String, Option<String>>,
    /// Alignable ID → annotations resolving to it, in document order
    dependents: HashMap<String, Vec<String>>,
}

impl AnnotationResolver {
    /// Index the annotations and resolve every reference chain.
    ///
    /// Dangling parent references are logged and left unresolved. A cycle
    /// anywhere in the reference graph fails the whole document.
    pub fn build(
        document: &str,
        timeslots: HashMap<String, u64>,
        annotations: &[Annotation],
    ) -> Result<Self, DocumentError> {
        let mut resolver = Self {
            document: document.to_string(),
            timeslots,
            ..Self::default()
        };

        for annotation in annotations {
            match &annotation.kind {
                AnnotationKind::Alignable { start_slot, end_slot } => {
                    resolver
                        .alignable
                        .insert(annotation.id.clone(), (start_slot.clone(), end_slot.clone()));
                }
                AnnotationKind::Reference { parent, .. } => {
                    resolver.references.insert(annotation.id.clone(), parent.clone());
                }
            }
        }

        let mut memo: HashMap<String, Option<String>> = HashMap::with_capacity(annotations.len());
        for annotation in annotations {
            resolver.resolve_chain(document, &annotation.id, &mut memo)?;
        }

        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for annotation in annotations {
            if let Some(Some(ancestor)) = memo.get(&annotation.id) {
                dependents
                    .entry(ancestor.clone())
                    .or_default()
                    .push(annotation.id.clone());
            }
        }

        resolver.ancestors = memo;
        resolver.dependents = dependents;
        Ok(resolver)
    }

    // Walk parent links from `start` until an alignable, a memoized result or a
    // missing parent is found, then record the outcome for the whole path.
    fn resolve_chain(
        &self,
        document: &str,
        start: &str,
        memo: &mut HashMap<String, Option<String>>,
    ) -> Result<Option<String>, DocumentError> {
        let mut path: Vec<&str> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = start;

        let outcome = loop {
            if let Some(known) = memo.get(current) {
                break known.clone();
            }
            if self.alignable.contains_key(current) {
                break Some(current.to_string());
            }
            match self.references.get(current) {
                Some(parent) => {
                    if !visited.insert(current) {
                        return Err(DocumentError::CyclicAnnotationGraph {
                            document: document.to_string(),
                            annotation: current.to_string(),
                        });
                    }
                    path.push(current);
                    current = parent;
                }
                None => {
                    let referrer = path.last().copied().unwrap_or(start);
                    warn!(
                        "{}: annotation {} references missing annotation {}, leaving it without time anchor",
                        document, referrer, current
                    );
                    break None;
                }
            }
        };

        if self.alignable.contains_key(start) {
            memo.insert(start.to_string(), Some(start.to_string()));
        }
        for id in path {
            memo.insert(id.to_string(), outcome.clone());
        }

        Ok(outcome)
    }

    /// Nearest alignable ancestor; alignable annotations are their own ancestor
    pub fn ancestor(&self, annotation_id: &str) -> Option<&str> {
        self.ancestors
            .get(annotation_id)
            .and_then(|ancestor| ancestor.as_deref())
    }

    /// Annotations that resolve to the given alignable, in document order
    pub fn dependents(&self, ancestor_id: &str) -> &[String] {
        self.dependents
            .get(ancestor_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Identifier of the document the resolver was built for
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn is_alignable(&self, annotation_id: &str) -> bool {
        self.alignable.contains_key(annotation_id)
    }

    /// Parent of a reference annotation
    pub fn parent(&self, annotation_id: &str) -> Option<&str> {
        self.references.get(annotation_id).map(String::as_str)
    }

    /// Millisecond offset of a time slot
    pub fn time(&self, slot: &str) -> Option<u64> {
        self.timeslots.get(slot).copied()
    }

    /// Start and end in milliseconds of an alignable annotation.
    ///
    /// `None` when either slot is unaligned or undeclared.
    pub fn span(&self, alignable_id: &str) -> Option<(u64, u64)> {
        let (start_slot, end_slot) = self.alignable.get(alignable_id)?;
        match (self.time(start_slot), self.time(end_slot)) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => {
                debug!("{}: annotation {} has an unaligned time slot", self.document, alignable_id);
                None
            }
        }
    }

    /// Duration of any annotation in milliseconds, taken from its time anchor
    pub fn duration_ms(&self, annotation_id: &str) -> u64 {
        self.ancestor(annotation_id)
            .and_then(|ancestor| self.span(ancestor))
            .map(|(start, end)| end.saturating_sub(start))
            .unwrap_or(0)
    }

    /// Start time of the annotation's time anchor
    pub fn anchor_start_ms(&self, annotation_id: &str) -> Option<u64> {
        self.ancestor(annotation_id)
            .and_then(|ancestor| self.span(ancestor))
            .map(|(start, _)| start)
    }

    /// Duration of a tier in seconds.
    ///
    /// Tiers with at least two time-anchored annotations sum those directly.
    /// Otherwise annotations sharing an anchor start time are counted once,
    /// since dependents of one anchor all report the anchor's duration.
    pub fn tier_duration_secs(&self, annotations: &[&Annotation]) -> f64 {
        let direct: Vec<u64> = annotations
            .iter()
            .filter(|a| a.is_alignable())
            .map(|a| self.duration_ms(&a.id))
            .collect();
        let direct_total: u64 = direct.iter().sum();

        if direct.len() >= 2 && direct_total > 0 {
            return direct_total as f64 / 1000.0;
        }

        let mut seen_starts = HashSet::new();
        let mut total: u64 = 0;
        for annotation in annotations {
            let Some(start) = self.anchor_start_ms(&annotation.id) else {
                continue;
            };
            if seen_starts.insert(start) {
                total += self.duration_ms(&annotation.id);
            }
        }
        total as f64 / 1000.0
    }
}
