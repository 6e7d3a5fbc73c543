/*!
 * Tests for the translation orchestrator: skip/translate/fail state
 * transitions, directory processing, re-entrancy, and context feeding.
 */

use anyhow::Result;
use std::sync::atomic::Ordering;

use crate::common;
use crate::common::mock_providers::RecordingProvider;
use lexis::errors::AppError;
use lexis::file_utils::FileManager;
use lexis::providers::mock::MockProvider;
use lexis::translation::{ChunkOutcome, TranslationOrchestrator};

/// Test that a directory run translates every pending chunk
#[tokio::test]
async fn test_translateDirectory_withWorkingProvider_shouldTranslateAllChunks() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let chunks = common::create_chunk_dir(temp_dir.path(), 3, 8)?;

    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::working()),
        common::test_options("en"),
    )?;
    let summary = orchestrator.translate_directory(temp_dir.path()).await?;

    assert_eq!(summary.translated, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);
    for chunk in &chunks {
        let output = orchestrator.output_path_for(chunk);
        assert!(FileManager::file_exists(&output));
        let translated = FileManager::read_to_string(&output)?;
        assert!(translated.contains("TRANSLATED"));
    }
    Ok(())
}

/// Test that re-running a completed directory performs zero provider calls
#[tokio::test]
async fn test_translateDirectory_runTwice_shouldSkipAllOnSecondRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_chunk_dir(temp_dir.path(), 3, 4)?;

    let provider = MockProvider::working();
    let invocations = provider.counter_handle();
    let orchestrator =
        TranslationOrchestrator::new(Box::new(provider), common::test_options("en"))?;

    let first = orchestrator.translate_directory(temp_dir.path()).await?;
    assert_eq!(first.translated, 3);
    assert_eq!(invocations.load(Ordering::SeqCst), 3);

    let second = orchestrator.translate_directory(temp_dir.path()).await?;
    assert_eq!(second.translated, 0);
    assert_eq!(second.skipped, 3);
    assert_eq!(second.failed, 0);
    // No additional provider invocations on the second run
    assert_eq!(invocations.load(Ordering::SeqCst), 3);
    Ok(())
}

/// Test that a per-chunk failure does not stop the batch
#[tokio::test]
async fn test_translateDirectory_withIntermittentFailures_shouldIsolateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let chunks = common::create_chunk_dir(temp_dir.path(), 3, 4)?;

    // Fails on the second call, which is chunk 002
    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::intermittent(2)),
        common::test_options("en"),
    )?;
    let summary = orchestrator.translate_directory(temp_dir.path()).await?;

    assert_eq!(summary.translated, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, chunks[1]);

    assert!(FileManager::file_exists(orchestrator.output_path_for(&chunks[0])));
    assert!(!FileManager::file_exists(orchestrator.output_path_for(&chunks[1])));
    assert!(FileManager::file_exists(orchestrator.output_path_for(&chunks[2])));
    Ok(())
}

/// Test that resuming after a partial run only translates the gaps
#[tokio::test]
async fn test_translateDirectory_afterPartialRun_shouldOnlyTranslateRemaining() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let chunks = common::create_chunk_dir(temp_dir.path(), 3, 4)?;

    // First pass leaves chunk 002 untranslated
    let first_orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::intermittent(2)),
        common::test_options("en"),
    )?;
    first_orchestrator.translate_directory(temp_dir.path()).await?;

    // Resume with a healthy provider
    let provider = MockProvider::working();
    let invocations = provider.counter_handle();
    let orchestrator =
        TranslationOrchestrator::new(Box::new(provider), common::test_options("en"))?;
    let summary = orchestrator.translate_directory(temp_dir.path()).await?;

    assert_eq!(summary.translated, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    assert!(FileManager::file_exists(orchestrator.output_path_for(&chunks[1])));
    Ok(())
}

/// Test that an authentication failure aborts the whole run
#[tokio::test]
async fn test_translateDirectory_withAuthFailure_shouldAbortRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let chunks = common::create_chunk_dir(temp_dir.path(), 3, 4)?;

    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::auth_failing()),
        common::test_options("en"),
    )?;
    let result = orchestrator.translate_directory(temp_dir.path()).await;

    assert!(matches!(result, Err(AppError::Provider(_))));
    for chunk in &chunks {
        assert!(!FileManager::file_exists(orchestrator.output_path_for(chunk)));
    }
    Ok(())
}

/// Test that an empty provider response counts as a failure, not an output
#[tokio::test]
async fn test_translateDirectory_withEmptyResponses_shouldRecordFailures() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let chunks = common::create_chunk_dir(temp_dir.path(), 2, 4)?;

    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::empty()),
        common::test_options("en"),
    )?;
    let summary = orchestrator.translate_directory(temp_dir.path()).await?;

    assert_eq!(summary.translated, 0);
    assert_eq!(summary.failed, 2);
    for chunk in &chunks {
        assert!(!FileManager::file_exists(orchestrator.output_path_for(chunk)));
    }
    Ok(())
}

/// Test that interior chunks receive exactly the neighbouring context lines
#[tokio::test]
async fn test_translateDirectory_shouldFeedBoundaryContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_chunk_dir(temp_dir.path(), 3, 8)?;

    let provider = RecordingProvider::new();
    let requests = provider.requests_handle();
    let orchestrator =
        TranslationOrchestrator::new(Box::new(provider), common::test_options("en"))?;
    orchestrator.translate_directory(temp_dir.path()).await?;

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 3);

    // Chunk 2's previous-context is exactly the last 5 lines of chunk 1
    let expected_before = (4..=8)
        .map(|i| format!("chunk 1 line {}", i))
        .collect::<Vec<String>>()
        .join("\n");
    let expected_after = (1..=5)
        .map(|i| format!("chunk 3 line {}", i))
        .collect::<Vec<String>>()
        .join("\n");
    assert_eq!(requests[1].context_before.as_deref(), Some(expected_before.as_str()));
    assert_eq!(requests[1].context_after.as_deref(), Some(expected_after.as_str()));

    // Boundary chunks only get the side that exists
    assert!(requests[0].context_before.is_none());
    assert!(requests[0].context_after.is_some());
    assert!(requests[2].context_after.is_none());

    // The composed payload marks the context as reference-only
    let payload = requests[1].user_prompt();
    assert!(payload.contains("do not translate"));
    assert!(payload.contains(&expected_before));
    Ok(())
}

/// Test that context is disabled entirely with zero context lines
#[tokio::test]
async fn test_translateDirectory_withZeroContextLines_shouldSendNoContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_chunk_dir(temp_dir.path(), 3, 8)?;

    let provider = RecordingProvider::new();
    let requests = provider.requests_handle();
    let mut options = common::test_options("en");
    options.context_lines = 0;
    let orchestrator = TranslationOrchestrator::new(Box::new(provider), options)?;
    orchestrator.translate_directory(temp_dir.path()).await?;

    let requests = requests.lock().unwrap();
    assert!(requests.iter().all(|r| r.context_before.is_none() && r.context_after.is_none()));
    Ok(())
}

/// Test that discovery excludes outputs and keeps lexical order
#[tokio::test]
async fn test_discoverSources_shouldExcludeOutputsAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "002-chunk.md", "b")?;
    common::create_test_file(temp_dir.path(), "001-chunk.md", "a")?;
    common::create_test_file(temp_dir.path(), "001-chunk_en.md", "existing output")?;

    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::working()),
        common::test_options("en"),
    )?;
    let sources = orchestrator.discover_sources(temp_dir.path())?;

    let names: Vec<String> = sources
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["001-chunk.md", "002-chunk.md"]);
    Ok(())
}

/// Test that an input already shaped like an output is skipped, not re-sent
#[tokio::test]
async fn test_translateFile_withOutputShapedName_shouldSkip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "book_en.md", "already translated")?;

    let provider = MockProvider::working();
    let invocations = provider.counter_handle();
    let orchestrator =
        TranslationOrchestrator::new(Box::new(provider), common::test_options("en"))?;
    let outcome = orchestrator.translate_file(&input).await?;

    assert!(matches!(outcome, ChunkOutcome::Skipped { .. }));
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
    Ok(())
}

/// Test the deterministic output naming rule on a page-chunk stem
#[tokio::test]
async fn test_translateFile_shouldUseDeterministicOutputNaming() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "book_chunk_002_pages_11-20.md",
        "contenido del segundo fragmento",
    )?;

    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::working()),
        common::test_options("English"),
    )?;
    let outcome = orchestrator.translate_file(&input).await?;

    match outcome {
        ChunkOutcome::Translated { output, .. } => {
            assert_eq!(
                output.file_name().unwrap().to_string_lossy(),
                "book_chunk_002_pages_11-20_English.md"
            );
            assert!(FileManager::file_exists(&output));
        }
        other => panic!("expected translated outcome, got {:?}", other),
    }
    Ok(())
}

/// Test that a missing input file surfaces an error for single-file runs
#[tokio::test]
async fn test_translateFile_withMissingInput_shouldFail() -> Result<()> {
    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::working()),
        common::test_options("en"),
    )?;

    let result = orchestrator
        .translate_file(std::path::Path::new("/no/such/chunk.md"))
        .await;

    assert!(result.is_err());
    Ok(())
}

/// Test that an output directory override redirects published files
#[tokio::test]
async fn test_translateDirectory_withOutputDirOverride_shouldRedirectOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let out_dir = temp_dir.path().join("translations");
    common::create_chunk_dir(temp_dir.path(), 2, 3)?;

    let mut options = common::test_options("en");
    options.output_dir = Some(out_dir.clone());
    let orchestrator =
        TranslationOrchestrator::new(Box::new(MockProvider::working()), options)?;
    let summary = orchestrator.translate_directory(temp_dir.path()).await?;

    assert_eq!(summary.translated, 2);
    assert!(FileManager::file_exists(out_dir.join("001-chunk_en.md")));
    assert!(FileManager::file_exists(out_dir.join("002-chunk_en.md")));
    Ok(())
}
