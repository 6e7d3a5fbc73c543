/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;

use crate::common;
use lexis::file_utils::FileManager;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.md", "content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("nested").join("subdir");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.is_dir());
    Ok(())
}

/// Test that write then read round-trips content
#[test]
fn test_write_and_read_shouldRoundTripContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("roundtrip.md");
    let content = "# Title\n\nSome content.";

    FileManager::write_to_file(&test_file, content)?;

    assert_eq!(FileManager::read_to_string(&test_file)?, content);
    Ok(())
}

/// Test that publish_atomic writes the full content at the target path
#[test]
fn test_publish_atomic_shouldWriteContentAtTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("published.md");

    FileManager::publish_atomic(&target, "translated text")?;

    assert_eq!(FileManager::read_to_string(&target)?, "translated text");
    Ok(())
}

/// Test that publish_atomic overwrites an existing file cleanly
#[test]
fn test_publish_atomic_withExistingFile_shouldOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("published.md");

    FileManager::publish_atomic(&target, "first")?;
    FileManager::publish_atomic(&target, "second")?;

    assert_eq!(FileManager::read_to_string(&target)?, "second");
    Ok(())
}

/// Test that find_files only matches the requested extension, sorted by name
#[test]
fn test_find_files_shouldFilterAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "002-chunk.md", "b")?;
    common::create_test_file(temp_dir.path(), "001-chunk.md", "a")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "x")?;
    common::create_test_file(temp_dir.path(), "010-chunk.md", "c")?;

    let found = FileManager::find_files(temp_dir.path(), "md")?;

    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["001-chunk.md", "002-chunk.md", "010-chunk.md"]);
    Ok(())
}

/// Test that find_files does not descend into subdirectories
#[test]
fn test_find_files_shouldStayShallow() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "top.md", "t")?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_test_file(&nested, "deep.md", "d")?;

    let found = FileManager::find_files(temp_dir.path(), "md")?;

    assert_eq!(found.len(), 1);
    Ok(())
}

/// Test that the translated output lands beside the source by default
#[test]
fn test_translated_output_path_withoutOverride_shouldStayBesideSource() {
    let input = Path::new("/work/chunks/001-chunk.md");

    let output = FileManager::translated_output_path(input, None, "English");

    assert_eq!(output, Path::new("/work/chunks/001-chunk_English.md"));
}

/// Test that an output directory override redirects the translated file
#[test]
fn test_translated_output_path_withOverride_shouldUseOutputDir() {
    let input = Path::new("/work/chunks/001-chunk.md");
    let output_dir = Path::new("/out");

    let output = FileManager::translated_output_path(input, Some(output_dir), "en");

    assert_eq!(output, Path::new("/out/001-chunk_en.md"));
}

/// Test translation output detection against the configured target
#[test]
fn test_is_translation_output_shouldMatchTargetSuffix() {
    assert!(FileManager::is_translation_output(
        "chunks/001-chunk_English.md",
        "English"
    ));
    assert!(!FileManager::is_translation_output(
        "chunks/001-chunk.md",
        "English"
    ));
    // A different language suffix is not an output for this target
    assert!(!FileManager::is_translation_output(
        "chunks/001-chunk_French.md",
        "English"
    ));
}
