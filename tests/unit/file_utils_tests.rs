/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use glossalign::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path creates the correct path
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input_file = Path::new("/tmp/corpus/story.eaf");
    let output_dir = Path::new("/tmp/output");

    assert_eq!(
        FileManager::generate_output_path(input_file, output_dir, "csv"),
        Path::new("/tmp/output/story.csv")
    );
    assert_eq!(
        FileManager::generate_output_path(input_file, output_dir, ".json"),
        Path::new("/tmp/output/story.json")
    );
}

/// Test recursive search for annotation files
#[test]
fn test_find_files_withNestedDirectories_shouldFindAllEafFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("speaker1").join("session2");
    fs::create_dir_all(&nested)?;

    common::create_sample_eaf(temp_dir.path(), "b.eaf")?;
    common::create_sample_eaf(&nested, "a.EAF")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "not an annotation file")?;
    common::create_test_file(temp_dir.path(), "b.pfsx", "<preferences/>")?;

    let found = FileManager::find_files(temp_dir.path(), "eaf")?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().unwrap().eq_ignore_ascii_case("eaf")));

    let mut sorted = found.clone();
    sorted.sort();
    assert_eq!(found, sorted);
    Ok(())
}

/// Test that documents are collected from both files and directories
#[test]
fn test_collect_documents_withFilesAndDirectories_shouldCollectBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let corpus = temp_dir.path().join("corpus");
    fs::create_dir_all(&corpus)?;
    common::create_sample_eaf(&corpus, "one.eaf")?;
    common::create_sample_eaf(&corpus, "two.eaf")?;
    let single = common::create_sample_eaf(temp_dir.path(), "single.eaf")?;

    let documents = FileManager::collect_documents(&[corpus.clone(), single.clone()])?;
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[2], single);

    let missing = FileManager::collect_documents(&[temp_dir.path().join("nowhere")]);
    assert!(missing.is_err());
    Ok(())
}

/// Test reading and writing text files
#[test]
fn test_write_to_file_withMissingParent_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("deep").join("result.csv");

    FileManager::write_to_file(&path, "\"ID\"\n")?;
    assert_eq!(FileManager::read_to_string(&path)?, "\"ID\"\n");
    Ok(())
}

/// Test file type detection by extension and by content
#[test]
fn test_detect_file_type_withVariousFiles_shouldRecognizeEaf() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let by_extension = common::create_test_file(temp_dir.path(), "x.eaf", "")?;
    let by_content = common::create_sample_eaf(temp_dir.path(), "export.xml")?;
    let other = common::create_test_file(temp_dir.path(), "other.xml", "<TEI/>")?;

    assert_eq!(FileManager::detect_file_type(&by_extension)?, FileType::Eaf);
    assert_eq!(FileManager::detect_file_type(&by_content)?, FileType::Eaf);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert!(FileManager::detect_file_type(temp_dir.path().join("missing.eaf")).is_err());
    Ok(())
}
