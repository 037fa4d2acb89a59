/*!
 * Gloss sentence assembly.
 *
 * Gloss annotations are grouped into sentences by their time anchor. Each
 * annotation without a previous link opens a (word, gloss) pair; annotations
 * with a previous link continue the last pair of the open sentence, which
 * rebuilds glosses that were split over several elements.
 */

use log::{debug, warn};
use serde::Serialize;

use crate::eaf::document::EafDocument;

/// One word with its gloss
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlossPair {
    pub word: String,
    pub gloss: String,
}

/// Pairs sharing one time anchor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GlossSentence {
    /// ID of the time-anchored annotation the pairs belong to
    pub key: Option<String>,
    pub pairs: Vec<GlossPair>,
}

impl GlossSentence {
    pub fn words(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.word.clone()).collect()
    }

    pub fn glosses(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.gloss.clone()).collect()
    }
}

/// Assemble the sentences of a gloss tier in document order.
///
/// The buffered sentence is flushed whenever the anchor changes, and once
/// more at the end of input even when it is empty.
pub fn assemble_sentences(document: &EafDocument, gloss_tier_id: &str) -> Vec<GlossSentence> {
    let doc_id = document.identifier();
    let resolver = document.resolver();
    let mut sentences = Vec::new();
    let mut buffer = GlossSentence::default();

    for annotation in document.tier_annotations(gloss_tier_id) {
        let Some(key) = resolver.ancestor(&annotation.id) else {
            warn!("{}: gloss annotation {} has no time anchor, skipping it", doc_id, annotation.id);
            continue;
        };

        if annotation.is_continuation() {
            match buffer.pairs.last_mut() {
                Some(pair) if buffer.key.as_deref() == Some(key) => {
                    pair.gloss.push_str(&annotation.text);
                }
                _ => {
                    warn!(
                        "{}: continuation {} has no open sentence for anchor {}, dropping '{}'",
                        doc_id, annotation.id, key, annotation.text
                    );
                }
            }
            continue;
        }

        if buffer.key.as_deref() != Some(key) {
            if buffer.key.is_some() {
                sentences.push(std::mem::take(&mut buffer));
            }
            buffer.key = Some(key.to_string());
        }

        let word = annotation
            .parent_id()
            .and_then(|parent| document.annotation(parent))
            .map(|parent| parent.text.clone())
            .unwrap_or_default();

        buffer.pairs.push(GlossPair {
            word,
            gloss: annotation.text.clone(),
        });
    }

    sentences.push(buffer);
    debug!("{}: assembled {} sentences from tier '{}'", doc_id, sentences.len(), gloss_tier_id);
    sentences
}
