/*!
 * End-to-end workflow tests: chunk naming, conversion-shaped directories,
 * context feeding, and translation outputs working together.
 */

use anyhow::Result;

use crate::common;
use crate::common::mock_providers::RecordingProvider;
use lexis::chunking::{ChunkMode, PageChunker, StructuralChunker};
use lexis::file_utils::FileManager;
use lexis::providers::mock::MockProvider;
use lexis::translation::{TerminologyDictionary, TranslationOrchestrator};

/// The 25-page book scenario: page ranges, chunk naming, context feeding,
/// and the translated output name for chunk 2.
#[tokio::test]
async fn test_pipeline_with25PageBook_shouldProduceExpectedArtifacts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    // Page chunking plan for a 25-page PDF at 10 pages per chunk
    let chunker = PageChunker::new(10).unwrap();
    let ranges = chunker.plan(25).unwrap();
    assert_eq!(
        ranges.iter().map(|r| (r.start, r.end)).collect::<Vec<_>>(),
        vec![(1, 10), (11, 20), (21, 25)]
    );

    // Simulate the converter step: each chunk PDF became a sibling .md
    let mut md_paths = Vec::new();
    for range in &ranges {
        let pdf_name = PageChunker::chunk_filename("book", range);
        let md_name = pdf_name.replace(".pdf", ".md");
        let content = common::chunk_content(range.seq, 8);
        md_paths.push(common::create_test_file(temp_dir.path(), &md_name, &content)?);
    }

    // Translate the converted chunks with boundary context
    let provider = RecordingProvider::new();
    let requests = provider.requests_handle();
    let orchestrator =
        TranslationOrchestrator::new(Box::new(provider), common::test_options("English"))?;
    let summary = orchestrator.translate_directory(temp_dir.path()).await?;

    assert_eq!(summary.translated, 3);
    assert_eq!(summary.failed, 0);

    // Chunk 2's request carried its neighbours' boundary lines, marked
    // reference-only
    let requests = requests.lock().unwrap();
    let chunk2_payload = requests[1].user_prompt();
    assert!(chunk2_payload.contains("do not translate"));
    assert!(chunk2_payload.contains("chunk 1 line 8"));
    assert!(chunk2_payload.contains("chunk 3 line 1"));

    // Chunk 2's translated output follows the deterministic naming rule
    assert!(FileManager::file_exists(
        temp_dir.path().join("book_chunk_002_pages_11-20_English.md")
    ));
    Ok(())
}

/// Markdown chunking into a directory followed by a translation run.
#[tokio::test]
async fn test_pipeline_chunkMdThenTranslate_shouldTranslateEverySection() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let book = common::create_test_file(
        temp_dir.path(),
        "book.md",
        "# One\nprimera seccion\n# Two\nsegunda seccion\n# Three\ntercera seccion",
    )?;
    let chunks_dir = temp_dir.path().join("book_chunks");

    let chunker = StructuralChunker::new(ChunkMode::Heading { max_level: 1 }).unwrap();
    let written = chunker.chunk_file(&book, &chunks_dir)?;
    assert_eq!(written.len(), 3);

    let orchestrator = TranslationOrchestrator::new(
        Box::new(MockProvider::working()),
        common::test_options("en"),
    )?;
    let summary = orchestrator.translate_directory(&chunks_dir).await?;

    assert_eq!(summary.translated, 3);
    assert!(FileManager::file_exists(chunks_dir.join("001-One_en.md")));
    assert!(FileManager::file_exists(chunks_dir.join("002-Two_en.md")));
    assert!(FileManager::file_exists(chunks_dir.join("003-Three_en.md")));
    Ok(())
}

/// A terminology dictionary flows into every composed request.
#[tokio::test]
async fn test_pipeline_withDictionary_shouldInjectTerminology() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_chunk_dir(temp_dir.path(), 2, 3)?;
    let dictionary = TerminologyDictionary::parse("poder: power, authority")?;

    let provider = RecordingProvider::new();
    let requests = provider.requests_handle();
    let orchestrator =
        TranslationOrchestrator::new(Box::new(provider), common::test_options("en"))?
            .with_dictionary(Some(dictionary));
    orchestrator.translate_directory(temp_dir.path()).await?;

    let requests = requests.lock().unwrap();
    for request in requests.iter() {
        let payload = request.user_prompt();
        assert!(payload.contains("## Terminology"));
        assert!(payload.contains("poder -> power, authority"));
    }
    Ok(())
}

/// Interrupt-and-resume: a second pass over a partially translated
/// directory recomputes byte-identical context for the chunks it finishes.
#[tokio::test]
async fn test_pipeline_resume_shouldRecomputeIdenticalContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_chunk_dir(temp_dir.path(), 3, 8)?;

    // Full pass, recording the context each chunk was given
    let reference_provider = RecordingProvider::new();
    let reference_requests = reference_provider.requests_handle();
    let reference = TranslationOrchestrator::new(
        Box::new(reference_provider),
        common::test_options("en"),
    )?;
    reference.translate_directory(temp_dir.path()).await?;

    // Simulate an interrupted run: remove one output, leave the others
    let victim = temp_dir.path().join("002-chunk_en.md");
    std::fs::remove_file(&victim)?;

    let resume_provider = RecordingProvider::new();
    let resume_requests = resume_provider.requests_handle();
    let resume = TranslationOrchestrator::new(
        Box::new(resume_provider),
        common::test_options("en"),
    )?;
    let summary = resume.translate_directory(temp_dir.path()).await?;

    assert_eq!(summary.translated, 1);
    assert_eq!(summary.skipped, 2);

    // The re-translated chunk saw exactly the context of the first pass
    let reference_requests = reference_requests.lock().unwrap();
    let resume_requests = resume_requests.lock().unwrap();
    assert_eq!(resume_requests.len(), 1);
    assert_eq!(
        resume_requests[0].context_before,
        reference_requests[1].context_before
    );
    assert_eq!(
        resume_requests[0].context_after,
        reference_requests[1].context_after
    );
    Ok(())
}
