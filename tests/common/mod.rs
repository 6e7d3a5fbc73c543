/*!
 * Common test utilities for the lexis test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use lexis::translation::OrchestratorOptions;


/// Initialize logging for tests; safe to call more than once
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

/// Creates a directory of ordered Markdown chunk files, each with
/// `lines_per_chunk` numbered lines, and returns their paths in order.
pub fn create_chunk_dir(
    dir: &Path,
    chunk_count: usize,
    lines_per_chunk: usize,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(chunk_count);
    for seq in 1..=chunk_count {
        let content = chunk_content(seq, lines_per_chunk);
        let path = create_test_file(dir, &format!("{:03}-chunk.md", seq), &content)?;
        paths.push(path);
    }
    Ok(paths)
}

/// Deterministic content for chunk `seq`: numbered lines.
pub fn chunk_content(seq: usize, lines: usize) -> String {
    (1..=lines)
        .map(|i| format!("chunk {} line {}", seq, i))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Standard orchestrator options for tests.
pub fn test_options(target_language: &str) -> OrchestratorOptions {
    OrchestratorOptions {
        source_language: "es".to_string(),
        target_language: target_language.to_string(),
        prompt_template: "Translate from {source_language} to {target_language}.".to_string(),
        context_lines: 5,
        output_dir: None,
    }
}
