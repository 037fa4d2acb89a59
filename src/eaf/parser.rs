use std::collections::{HashMap, HashSet};
use log::{debug, warn};
use roxmltree::Node;

use crate::errors::DocumentError;
use super::model::{Annotation, ConstraintKind, LinguisticType, TierDeclaration};

// @module: ELAN XML loading

/// Declarations and annotations read straight from the XML tree
#[derive(Debug, Default)]
pub struct RawDocument {
    pub linguistic_types: Vec<LinguisticType>,
    pub tiers: Vec<TierDeclaration>,
    pub timeslots: HashMap<String, u64>,
    /// All annotations in document order
    pub annotations: Vec<Annotation>,
}

/// Parse ELAN XML into raw declarations.
///
/// `document` is only used to label errors and log lines.
pub fn parse_document(document: &str, xml: &str) -> Result<RawDocument, DocumentError> {
    let tree = roxmltree::Document::parse(xml).map_err(|source| DocumentError::Xml {
        document: document.to_string(),
        source,
    })?;

    let root = tree.root_element();
    if root.tag_name().name() != "ANNOTATION_DOCUMENT" {
        return Err(DocumentError::NotAnAnnotationDocument {
            document: document.to_string(),
            root: root.tag_name().name().to_string(),
        });
    }

    let mut raw = RawDocument::default();
    let mut seen_tiers: HashSet<String> = HashSet::new();

    for node in root.children().filter(Node::is_element) {
        match node.tag_name().name() {
            "TIME_ORDER" => parse_time_order(document, node, &mut raw.timeslots)?,
            "LINGUISTIC_TYPE" => {
                let id = required(document, node, "LINGUISTIC_TYPE_ID")?;
                raw.linguistic_types.push(LinguisticType {
                    id: id.to_string(),
                    constraint: ConstraintKind::from_constraint(node.attribute("CONSTRAINTS")),
                });
            }
            "TIER" => {
                let id = required(document, node, "TIER_ID")?;
                let linguistic_type_ref = required(document, node, "LINGUISTIC_TYPE_REF")?;
                if !seen_tiers.insert(id.to_string()) {
                    warn!("{}: duplicate tier '{}' ignored along with its annotations", document, id);
                    continue;
                }
                raw.tiers.push(TierDeclaration {
                    id: id.to_string(),
                    linguistic_type_ref: linguistic_type_ref.to_string(),
                    parent_ref: node.attribute("PARENT_REF").map(str::to_string),
                });
                parse_tier_annotations(document, id, node, &mut raw.annotations)?;
            }
            _ => {}
        }
    }

    debug!(
        "{}: {} linguistic types, {} tiers, {} time slots, {} annotations",
        document,
        raw.linguistic_types.len(),
        raw.tiers.len(),
        raw.timeslots.len(),
        raw.annotations.len()
    );

    Ok(raw)
}

fn parse_time_order(document: &str, node: Node, timeslots: &mut HashMap<String, u64>) -> Result<(), DocumentError> {
    for slot in node.children().filter(|n| n.has_tag_name("TIME_SLOT")) {
        let id = required(document, slot, "TIME_SLOT_ID")?;

        // Unaligned slots have no value and stay out of the table
        let Some(value) = slot.attribute("TIME_VALUE") else {
            continue;
        };

        let millis = value.trim().parse::<u64>().map_err(|_| DocumentError::InvalidTimeValue {
            document: document.to_string(),
            slot: id.to_string(),
            value: value.to_string(),
        })?;
        timeslots.insert(id.to_string(), millis);
    }
    Ok(())
}

fn parse_tier_annotations(
    document: &str,
    tier_id: &str,
    tier: Node,
    annotations: &mut Vec<Annotation>,
) -> Result<(), DocumentError> {
    for wrapper in tier.children().filter(|n| n.has_tag_name("ANNOTATION")) {
        for element in wrapper.children().filter(Node::is_element) {
            let annotation = match element.tag_name().name() {
                "ALIGNABLE_ANNOTATION" => {
                    let id = required(document, element, "ANNOTATION_ID")?;
                    let start = required(document, element, "TIME_SLOT_REF1")?;
                    let end = required(document, element, "TIME_SLOT_REF2")?;
                    Annotation::alignable(id, tier_id, start, end, &annotation_text(document, id, element))
                }
                "REF_ANNOTATION" => {
                    let id = required(document, element, "ANNOTATION_ID")?;
                    let parent = required(document, element, "ANNOTATION_REF")?;
                    Annotation::reference(
                        id,
                        tier_id,
                        parent,
                        element.attribute("PREVIOUS_ANNOTATION"),
                        &annotation_text(document, id, element),
                    )
                }
                other => {
                    warn!("{}: ignoring unexpected <{}> in tier '{}'", document, other, tier_id);
                    continue;
                }
            };
            annotations.push(annotation);
        }
    }
    Ok(())
}

fn annotation_text(document: &str, annotation_id: &str, element: Node) -> String {
    let value = element
        .children()
        .find(|n| n.has_tag_name("ANNOTATION_VALUE"))
        .and_then(|n| n.text());

    match value {
        Some(text) => text.trim().to_string(),
        None => {
            debug!("{}: annotation {} has no text, using empty string", document, annotation_id);
            String::new()
        }
    }
}

fn required<'a>(document: &str, node: Node<'a, '_>, attribute: &str) -> Result<&'a str, DocumentError> {
    node.attribute(attribute).ok_or_else(|| DocumentError::MissingAttribute {
        document: document.to_string(),
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
    })
}
