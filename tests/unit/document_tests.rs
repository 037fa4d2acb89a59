/*!
 * Tests for document loading, the tier hierarchy, annotation resolution and fingerprints
 */

use anyhow::Result;
use glossalign::eaf::{ConstraintKind, DocumentSource, EafDocument};
use glossalign::errors::DocumentError;
use crate::common::{self, EafBuilder};

fn load(xml: &str) -> Result<EafDocument, DocumentError> {
    EafDocument::from_xml(DocumentSource::new("sample.eaf"), xml)
}

/// Test that the sample document loads with its tier tree intact
#[test]
fn test_from_xml_withSampleDocument_shouldBuildTierTree() -> Result<()> {
    let doc = load(&common::sample_document_xml())?;

    assert_eq!(doc.tiers().len(), 5);
    assert_eq!(doc.annotations().len(), 12);

    let hierarchy = doc.hierarchy();
    let top: Vec<&str> = hierarchy.top_level().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(top, vec!["tx"]);

    let children: Vec<&str> = hierarchy.children("tx").iter().map(|t| t.id.as_str()).collect();
    assert_eq!(children, vec!["words", "ft", "nt"]);

    assert_eq!(doc.tier("ge").unwrap().constraint, ConstraintKind::SymbolicAssociation);
    assert_eq!(doc.tier("ge").unwrap().parent.as_deref(), Some("words"));
    Ok(())
}

/// Test that the fingerprint of the sample document follows the tier tree
#[test]
fn test_fingerprint_withSampleDocument_shouldEncodeStructure() -> Result<()> {
    let doc = load(&common::sample_document_xml())?;
    assert_eq!(doc.fingerprint(false), "[R[s[a]][a][a]]");
    assert_eq!(doc.fingerprint(true), "[R[s[a]][a][a]]");
    Ok(())
}

/// Test that two parses of the same file give the same fingerprint
#[test]
fn test_fingerprint_withTwoParses_shouldBeDeterministic() -> Result<()> {
    let xml = common::sample_document_xml();
    let first = load(&xml)?;
    let second = load(&xml)?;
    assert_eq!(first.fingerprint(false), second.fingerprint(false));
    assert_eq!(first.fingerprint(true), second.fingerprint(true));
    Ok(())
}

/// Test that renaming tiers and types leaves the fingerprint unchanged
#[test]
fn test_fingerprint_withRenamedTiers_shouldBeUnchanged() -> Result<()> {
    let renamed = EafBuilder::new()
        .slot("t1", 0)
        .slot("t2", 900)
        .linguistic_type("utt", None)
        .linguistic_type("seg", Some("Symbolic_Subdivision"))
        .linguistic_type("assoc", Some("Symbolic_Association"))
        .tier("ref@SP", "utt", None)
        .tier("mb@SP", "seg", Some("ref@SP"))
        .tier("gl@SP", "assoc", Some("mb@SP"))
        .tier("fte@SP", "assoc", Some("ref@SP"))
        .tier("note@SP", "assoc", Some("ref@SP"))
        .build();

    let original = load(&common::sample_document_xml())?;
    let renamed = load(&renamed)?;
    assert_eq!(original.fingerprint(false), renamed.fingerprint(false));
    Ok(())
}

/// Test the time subdivision example and its lumped rendering
#[test]
fn test_fingerprint_withTimeSubdivision_shouldLumpInLumpedMode() -> Result<()> {
    let xml = EafBuilder::new()
        .linguistic_type("main", None)
        .linguistic_type("trans", Some("Symbolic_Association"))
        .linguistic_type("parts", Some("Time_Subdivision"))
        .tier("A", "main", None)
        .tier("B", "trans", Some("A"))
        .tier("C", "parts", Some("A"))
        .build();
    let doc = load(&xml)?;
    assert_eq!(doc.fingerprint(false), "[R[a][t]]");
    assert_eq!(doc.fingerprint(true), "[R[a][s]]");
    Ok(())
}

/// Test that every resolved ancestor is either missing or time-aligned
#[test]
fn test_ancestors_withSampleDocument_shouldBeAlignable() -> Result<()> {
    let doc = load(&common::sample_document_xml())?;
    let resolver = doc.resolver();

    for annotation in doc.annotations() {
        if let Some(ancestor) = resolver.ancestor(&annotation.id) {
            assert!(resolver.is_alignable(ancestor), "{} resolved to {}", annotation.id, ancestor);
        }
    }
    assert_eq!(resolver.ancestor("a9"), Some("a2"));
    assert_eq!(resolver.ancestor("a1"), Some("a1"));
    Ok(())
}

/// Test that durations are taken from the time anchor and never negative
#[test]
fn test_durations_withSampleDocument_shouldUseAnchors() -> Result<()> {
    let doc = load(&common::sample_document_xml())?;
    let resolver = doc.resolver();

    assert_eq!(resolver.duration_ms("a1"), 1500);
    assert_eq!(resolver.duration_ms("a6"), 1500);
    assert_eq!(resolver.duration_ms("a11"), 1700);

    for tier in doc.tiers() {
        assert!(doc.tier_duration_secs(&tier.id) >= 0.0);
    }
    assert!((doc.tier_duration_secs("tx") - 3.2).abs() < 1e-9);
    assert!((doc.tier_duration_secs("ft") - 3.2).abs() < 1e-9);
    Ok(())
}

/// Test that unaligned time slots and dangling references degrade gracefully
#[test]
fn test_resolver_withUnalignedSlotAndDanglingReference_shouldUseDefaults() -> Result<()> {
    let xml = EafBuilder::new()
        .slot("ts1", 100)
        .unaligned_slot("ts2")
        .linguistic_type("utt", None)
        .linguistic_type("assoc", Some("Symbolic_Association"))
        .tier("tx", "utt", None)
        .tier("ft", "assoc", Some("tx"))
        .alignable("tx", "a1", "ts1", "ts2", "ka")
        .reference("ft", "a2", "a1", None, "so")
        .reference("ft", "a3", "a99", None, "lost")
        .build();
    let doc = load(&xml)?;
    let resolver = doc.resolver();

    assert_eq!(resolver.span("a1"), None);
    assert_eq!(resolver.duration_ms("a2"), 0);
    assert_eq!(resolver.ancestor("a3"), None);
    assert_eq!(doc.tier_duration_secs("tx"), 0.0);
    Ok(())
}

/// Test that cyclic annotation references fail the load
#[test]
fn test_from_xml_withCyclicAnnotations_shouldFail() {
    let xml = EafBuilder::new()
        .linguistic_type("utt", None)
        .linguistic_type("assoc", Some("Symbolic_Association"))
        .tier("tx", "utt", None)
        .tier("ft", "assoc", Some("tx"))
        .reference("ft", "a1", "a2", None, "one")
        .reference("ft", "a2", "a1", None, "two")
        .build();

    let result = load(&xml);
    assert!(matches!(result, Err(DocumentError::CyclicAnnotationGraph { .. })));
}

/// Test that cyclic tier parents fail the load
#[test]
fn test_from_xml_withCyclicTierParents_shouldFail() {
    let xml = EafBuilder::new()
        .linguistic_type("assoc", Some("Symbolic_Association"))
        .tier("A", "assoc", Some("B"))
        .tier("B", "assoc", Some("A"))
        .build();

    let result = load(&xml);
    assert!(matches!(result, Err(DocumentError::CyclicTierHierarchy { .. })));
}

/// Test that a tier with an undeclared linguistic type fails the load
#[test]
fn test_from_xml_withUndeclaredLinguisticType_shouldFail() {
    let xml = EafBuilder::new()
        .linguistic_type("utt", None)
        .tier("tx", "missing-type", None)
        .build();

    match load(&xml) {
        Err(error @ DocumentError::UnknownLinguisticType { .. }) => {
            assert_eq!(error.document(), "sample.eaf");
        }
        other => panic!("expected UnknownLinguisticType, got {:?}", other.map(|_| ())),
    }
}

/// Test that an empty document loads with an empty fingerprint
#[test]
fn test_from_xml_withNoTiers_shouldLoadEmpty() -> Result<()> {
    let doc = load(&EafBuilder::new().build())?;
    assert!(doc.hierarchy().is_empty());
    assert_eq!(doc.fingerprint(false), "");
    Ok(())
}

/// Test loading from disk
#[test]
fn test_from_path_withSampleFile_shouldRecordSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_sample_eaf(temp_dir.path(), "story.eaf")?;

    let doc = EafDocument::from_path(&path)?;
    assert_eq!(doc.source().name(), "story");
    assert_eq!(doc.source().path, path);

    let missing = EafDocument::from_path(temp_dir.path().join("missing.eaf"));
    assert!(matches!(missing, Err(DocumentError::Io { .. })));
    Ok(())
}
