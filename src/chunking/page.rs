/*!
 * Page-based PDF chunking.
 *
 * Splits a paginated source document into consecutive page ranges of a
 * configured size and writes each range to its own chunk PDF. Range
 * planning is pure arithmetic; the PDF I/O lives in separate functions so
 * the partition contract can be tested without a PDF fixture.
 */

use log::info;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::errors::{AppError, ConfigError, InputError};
use crate::file_utils::FileManager;

/// A contiguous, inclusive 1-based page range within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// 1-based chunk sequence number
    pub seq: usize,
    /// First page of the range (1-based, inclusive)
    pub start: usize,
    /// Last page of the range (1-based, inclusive)
    pub end: usize,
}

impl PageRange {
    /// Number of pages covered by this range.
    pub fn page_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Splits PDF files into page-bounded chunk files.
#[derive(Debug, Clone, Copy)]
pub struct PageChunker {
    pages_per_chunk: usize,
}

impl PageChunker {
    /// Create a new page chunker.
    pub fn new(pages_per_chunk: usize) -> Result<Self, ConfigError> {
        if pages_per_chunk == 0 {
            return Err(ConfigError::ZeroPagesPerChunk);
        }
        Ok(Self { pages_per_chunk })
    }

    /// Partition `[1..total_pages]` into consecutive ranges.
    ///
    /// Produces `ceil(total_pages / pages_per_chunk)` ranges; every range
    /// holds exactly `pages_per_chunk` pages except the final one, which
    /// holds the remainder.
    pub fn plan(&self, total_pages: usize) -> Result<Vec<PageRange>, InputError> {
        if total_pages == 0 {
            return Err(InputError::EmptyDocument);
        }

        let mut ranges = Vec::with_capacity(total_pages.div_ceil(self.pages_per_chunk));
        let mut start = 1;
        let mut seq = 1;
        while start <= total_pages {
            let end = (start + self.pages_per_chunk - 1).min(total_pages);
            ranges.push(PageRange { seq, start, end });
            start = end + 1;
            seq += 1;
        }

        Ok(ranges)
    }

    /// Derive the chunk file name for a range.
    ///
    /// The zero-padded sequence number makes lexical file order coincide
    /// with numeric sequence order.
    pub fn chunk_filename(base: &str, range: &PageRange) -> String {
        format!(
            "{}_chunk_{:03}_pages_{}-{}.pdf",
            base, range.seq, range.start, range.end
        )
    }

    /// Split a PDF into chunk files under `output_dir`.
    ///
    /// An unreadable or empty source aborts the operation before any chunk
    /// file is written. Returns the written chunk paths in sequence order.
    pub async fn split_pdf(&self, input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        let chunker = *self;
        let input = input.to_path_buf();
        let output_dir = output_dir.to_path_buf();

        // pdfium is a blocking C library; keep it off the async workers
        task::spawn_blocking(move || chunker.split_pdf_blocking(&input, &output_dir))
            .await
            .map_err(|e| AppError::Unknown(format!("PDF split task panicked: {}", e)))?
    }

    fn split_pdf_blocking(&self, input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        if !input.exists() {
            return Err(InputError::NotFound(input.to_path_buf()).into());
        }

        let pdfium = Pdfium::default();
        let source = pdfium
            .load_pdf_from_file(input, None)
            .map_err(|e| InputError::Unreadable {
                path: input.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        let total_pages = source.pages().len() as usize;
        let ranges = self.plan(total_pages)?;

        info!(
            "Splitting {:?} ({} pages) into {} chunk(s) of up to {} page(s)",
            input,
            total_pages,
            ranges.len(),
            self.pages_per_chunk
        );

        FileManager::ensure_dir(output_dir).map_err(AppError::from)?;
        let base = FileManager::file_stem(input);

        let mut written = Vec::with_capacity(ranges.len());
        for range in &ranges {
            let mut chunk_doc = pdfium
                .create_new_pdf()
                .map_err(|e| AppError::File(format!("Failed to create chunk document: {:?}", e)))?;

            chunk_doc
                .pages_mut()
                .copy_pages_from_document(&source, &format!("{}-{}", range.start, range.end), 0)
                .map_err(|e| AppError::File(format!(
                    "Failed to copy pages {}-{} from {:?}: {:?}",
                    range.start, range.end, input, e
                )))?;

            let output_path = output_dir.join(Self::chunk_filename(&base, range));
            chunk_doc
                .save_to_file(&output_path)
                .map_err(|e| AppError::File(format!("Failed to write {:?}: {:?}", output_path, e)))?;

            info!(
                "Created chunk {}: {:?} (pages {}-{})",
                range.seq, output_path, range.start, range.end
            );
            written.push(output_path);
        }

        Ok(written)
    }
}

/// Read the page count of a PDF file.
pub async fn page_count(input: &Path) -> Result<usize, AppError> {
    let input = input.to_path_buf();

    task::spawn_blocking(move || {
        if !input.exists() {
            return Err(AppError::from(InputError::NotFound(input.clone())));
        }

        let pdfium = Pdfium::default();
        let document = pdfium
            .load_pdf_from_file(&input, None)
            .map_err(|e| InputError::Unreadable {
                path: input.clone(),
                detail: format!("{:?}", e),
            })?;

        Ok(document.pages().len() as usize)
    })
    .await
    .map_err(|e| AppError::Unknown(format!("Page count task panicked: {}", e)))?
}
