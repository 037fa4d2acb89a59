/*!
 * Common test utilities for the glossalign test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use glossalign::language_utils::MockDetector;

/// Routes library log output through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the sample glossed document in the specified directory
pub fn create_sample_eaf(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, &sample_document_xml())
}

/// Detector that recognises the English translations of the sample document
pub fn english_detector() -> MockDetector {
    MockDetector::new()
        .with_rule("eating", "eng", 0.99)
        .with_rule("slept", "eng", 0.99)
}

struct TierEntry {
    id: String,
    linguistic_type: String,
    parent: Option<String>,
    annotations: Vec<String>,
}

/// Builder for small ELAN documents
#[derive(Default)]
pub struct EafBuilder {
    slots: Vec<(String, Option<u64>)>,
    linguistic_types: Vec<(String, Option<String>)>,
    tiers: Vec<TierEntry>,
}

impl EafBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(mut self, id: &str, millis: u64) -> Self {
        self.slots.push((id.to_string(), Some(millis)));
        self
    }

    pub fn unaligned_slot(mut self, id: &str) -> Self {
        self.slots.push((id.to_string(), None));
        self
    }

    pub fn linguistic_type(mut self, id: &str, constraint: Option<&str>) -> Self {
        self.linguistic_types.push((id.to_string(), constraint.map(str::to_string)));
        self
    }

    pub fn tier(mut self, id: &str, linguistic_type: &str, parent: Option<&str>) -> Self {
        self.tiers.push(TierEntry {
            id: id.to_string(),
            linguistic_type: linguistic_type.to_string(),
            parent: parent.map(str::to_string),
            annotations: Vec::new(),
        });
        self
    }

    fn push_annotation(&mut self, tier: &str, element: String) {
        let entry = self
            .tiers
            .iter_mut()
            .find(|entry| entry.id == tier)
            .expect("tier must be declared before its annotations");
        entry.annotations.push(element);
    }

    pub fn alignable(mut self, tier: &str, id: &str, start: &str, end: &str, text: &str) -> Self {
        let element = format!(
            r#"<ANNOTATION><ALIGNABLE_ANNOTATION ANNOTATION_ID="{}" TIME_SLOT_REF1="{}" TIME_SLOT_REF2="{}"><ANNOTATION_VALUE>{}</ANNOTATION_VALUE></ALIGNABLE_ANNOTATION></ANNOTATION>"#,
            id, start, end, text
        );
        self.push_annotation(tier, element);
        self
    }

    pub fn reference(mut self, tier: &str, id: &str, parent: &str, previous: Option<&str>, text: &str) -> Self {
        let previous = previous
            .map(|p| format!(r#" PREVIOUS_ANNOTATION="{}""#, p))
            .unwrap_or_default();
        let element = format!(
            r#"<ANNOTATION><REF_ANNOTATION ANNOTATION_ID="{}" ANNOTATION_REF="{}"{}><ANNOTATION_VALUE>{}</ANNOTATION_VALUE></REF_ANNOTATION></ANNOTATION>"#,
            id, parent, previous, text
        );
        self.push_annotation(tier, element);
        self
    }

    pub fn build(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ANNOTATION_DOCUMENT AUTHOR=\"\" FORMAT=\"3.0\" VERSION=\"3.0\">\n");

        xml.push_str("  <TIME_ORDER>\n");
        for (id, value) in &self.slots {
            match value {
                Some(millis) => xml.push_str(&format!("    <TIME_SLOT TIME_SLOT_ID=\"{}\" TIME_VALUE=\"{}\"/>\n", id, millis)),
                None => xml.push_str(&format!("    <TIME_SLOT TIME_SLOT_ID=\"{}\"/>\n", id)),
            }
        }
        xml.push_str("  </TIME_ORDER>\n");

        for entry in &self.tiers {
            let parent = entry
                .parent
                .as_ref()
                .map(|p| format!(" PARENT_REF=\"{}\"", p))
                .unwrap_or_default();
            xml.push_str(&format!(
                "  <TIER TIER_ID=\"{}\" LINGUISTIC_TYPE_REF=\"{}\"{}>\n",
                entry.id, entry.linguistic_type, parent
            ));
            for annotation in &entry.annotations {
                xml.push_str("    ");
                xml.push_str(annotation);
                xml.push('\n');
            }
            xml.push_str("  </TIER>\n");
        }

        for (id, constraint) in &self.linguistic_types {
            let constraint = constraint
                .as_ref()
                .map(|c| format!(" CONSTRAINTS=\"{}\"", c))
                .unwrap_or_default();
            xml.push_str(&format!(
                "  <LINGUISTIC_TYPE LINGUISTIC_TYPE_ID=\"{}\" TIME_ALIGNABLE=\"true\"{}/>\n",
                id, constraint
            ));
        }

        xml.push_str("</ANNOTATION_DOCUMENT>\n");
        xml
    }
}

/// Builder preloaded with the sample document: a transcription tier with
/// words, glosses, a free translation and a comment tier
pub fn sample_builder() -> EafBuilder {
    EafBuilder::new()
        .slot("ts1", 0)
        .slot("ts2", 1500)
        .slot("ts3", 3200)
        .linguistic_type("Transcription", None)
        .linguistic_type("Words", Some("Symbolic_Subdivision"))
        .linguistic_type("gloss", Some("Symbolic_Association"))
        .linguistic_type("Translation", Some("Symbolic_Association"))
        .linguistic_type("Comment", Some("Symbolic_Association"))
        .tier("tx", "Transcription", None)
        .tier("words", "Words", Some("tx"))
        .tier("ge", "gloss", Some("words"))
        .tier("ft", "Translation", Some("tx"))
        .tier("nt", "Comment", Some("tx"))
        .alignable("tx", "a1", "ts1", "ts2", "ni-na-kula samaki")
        .alignable("tx", "a2", "ts2", "ts3", "u-li-lala")
        .reference("words", "a3", "a1", None, "ni-na-kula")
        .reference("words", "a4", "a1", Some("a3"), "samaki")
        .reference("words", "a5", "a2", None, "u-li-lala")
        .reference("ge", "a6", "a3", None, "1SG-PRS-eat")
        .reference("ge", "a7", "a4", None, "fish")
        .reference("ge", "a8", "a5", None, "2SG-PST")
        .reference("ge", "a9", "a5", Some("a8"), "-sleep")
        .reference("ft", "a10", "a1", None, "I am eating fish")
        .reference("ft", "a11", "a2", None, "You slept well")
        .reference("nt", "a12", "a1", None, "elicited")
}

pub fn sample_document_xml() -> String {
    sample_builder().build()
}
