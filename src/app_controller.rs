use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::chunking::{ChunkMode, PageChunker, StructuralChunker};
use crate::conversion::{self, CommandConverter, Converter};
use crate::file_utils::FileManager;
use crate::providers;
use crate::translation::{
    OrchestratorOptions, RunSummary, TerminologyDictionary, TranslationOrchestrator,
};

// @module: Application controller for the translation pipeline

// PDF filenames accepted by the pipeline command: letters, digits,
// dashes, underscores, and the .pdf extension
static PDF_FILENAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+\.pdf$").unwrap());

/// Main application controller driving the pipeline workflows
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Check that a pipeline PDF filename is acceptable.
    pub fn validate_pdf_filename(filename: &str) -> bool {
        PDF_FILENAME.is_match(filename)
    }

    /// Split a PDF into page-bounded chunk files.
    pub async fn run_chunk_pdf(&self, input: &Path, output_dir: Option<PathBuf>) -> Result<()> {
        let chunker = PageChunker::new(self.config.chunking.pages_per_chunk)?;

        // Default to a 'chunks' folder next to the input PDF
        let output_dir = output_dir.unwrap_or_else(|| {
            input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("chunks")
        });

        let written = chunker.split_pdf(input, &output_dir).await?;
        info!(
            "Successfully created {} chunk(s) in {:?}",
            written.len(),
            output_dir
        );
        Ok(())
    }

    /// Split a Markdown file into structural chunks.
    pub async fn run_chunk_md(&self, input: &Path, output_dir: Option<PathBuf>) -> Result<()> {
        let mode = ChunkMode::from_config(&self.config.chunking);
        let chunker = StructuralChunker::new(mode)?;

        // Default to '<stem>_chunks' next to the input file
        let output_dir = output_dir.unwrap_or_else(|| {
            let stem = FileManager::file_stem(input);
            input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{}_chunks", stem))
        });

        let written = chunker.chunk_file(input, &output_dir)?;
        info!(
            "Successfully created {} chunk(s) in {:?}",
            written.len(),
            output_dir
        );
        Ok(())
    }

    /// Convert every PDF in a directory to Markdown.
    pub async fn run_convert(&self, dir: &Path) -> Result<()> {
        let converter = CommandConverter::from_config(&self.config.conversion);
        let (converted, skipped, failed) = conversion::convert_directory(&converter, dir).await?;

        info!(
            "Conversion complete: {} converted, {} skipped, {} failed",
            converted, skipped, failed
        );
        if failed > 0 {
            return Err(anyhow!("{} PDF file(s) failed to convert", failed));
        }
        Ok(())
    }

    /// Translate a Markdown file or a directory of Markdown chunks.
    pub async fn run_translate(&self, input: &Path) -> Result<()> {
        let orchestrator = self.build_orchestrator()?;

        if input.is_file() {
            let outcome = orchestrator.translate_file(input).await?;
            match outcome {
                crate::translation::ChunkOutcome::Failed { error } => {
                    Err(anyhow!("Translation failed: {}", error))
                }
                _ => Ok(()),
            }
        } else if input.is_dir() {
            let summary = self.translate_directory_with_bar(&orchestrator, input).await?;
            if summary.failed > 0 {
                return Err(anyhow!("{} chunk(s) failed to translate", summary.failed));
            }
            Ok(())
        } else {
            Err(anyhow!("Input path does not exist: {:?}", input))
        }
    }

    /// Run the complete pipeline: chunk, convert, translate.
    pub async fn run_pipeline(&self, pdf: &Path, skip_chunking: bool) -> Result<()> {
        let filename = pdf
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if !Self::validate_pdf_filename(&filename) {
            return Err(anyhow!(
                "Invalid PDF filename: '{}'. Filenames may contain only letters, numbers, dashes, \
                 underscores, and the .pdf extension",
                filename
            ));
        }
        if !FileManager::file_exists(pdf) {
            return Err(anyhow!("PDF file not found: {:?}", pdf));
        }

        // A missing credential must surface before any per-item work
        let orchestrator = self.build_orchestrator()?;

        let project_dir = pdf.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
        let converter = CommandConverter::from_config(&self.config.conversion);

        let chunks_dir = if skip_chunking {
            info!("Skipping PDF chunking (processing entire PDF)");
            let output = converter.convert(pdf).await?;
            let md_path = pdf.with_extension("md");
            FileManager::write_to_file(&md_path, &output.markdown)?;
            info!(
                "Converted {:?} -> {:?} ({} pages)",
                pdf, md_path, output.page_count
            );

            let outcome = orchestrator.translate_file(&md_path).await?;
            if let crate::translation::ChunkOutcome::Failed { error } = outcome {
                return Err(anyhow!("Translation failed: {}", error));
            }
            project_dir
        } else {
            let chunks_dir = project_dir.join("chunks");

            // Step 1: split the PDF into page-bounded chunks
            self.run_chunk_pdf(pdf, Some(chunks_dir.clone()))
                .await
                .context("Pipeline failed at the PDF chunking step")?;

            // Step 2: convert chunk PDFs to Markdown; isolated failures do
            // not stop the chunks that did convert from being translated
            let (converted, _, conv_failed) =
                conversion::convert_directory(&converter, &chunks_dir).await?;
            if converted == 0 && conv_failed > 0 {
                return Err(anyhow!("Pipeline failed: no chunk could be converted"));
            }
            if conv_failed > 0 {
                warn!("{} chunk(s) failed to convert and will be missing", conv_failed);
            }

            // Step 3: translate the Markdown chunks
            let summary = self.translate_directory_with_bar(&orchestrator, &chunks_dir).await?;
            if summary.translated == 0 && summary.failed > 0 {
                return Err(anyhow!("Pipeline failed at the translation step"));
            }
            chunks_dir
        };

        info!("Pipeline completed successfully");
        info!(
            "Translated files are located in {:?} (look for files ending with _{}.md)",
            chunks_dir, self.config.target_language
        );
        Ok(())
    }

    /// Build the orchestrator for the configured provider.
    ///
    /// Performs the eager credential check so an unusable provider is
    /// reported before any chunk work begins.
    fn build_orchestrator(&self) -> Result<TranslationOrchestrator> {
        self.config.validate_provider_auth()?;
        let provider = providers::create_provider(&self.config.translation)?;

        let dictionary = match &self.config.dictionary_path {
            Some(path) => Some(
                TerminologyDictionary::load(Path::new(path))
                    .with_context(|| format!("Failed to load dictionary: {}", path))?,
            ),
            None => None,
        };
        if let Some(dictionary) = &dictionary {
            info!("Loaded terminology dictionary with {} term(s)", dictionary.len());
        }

        let options = OrchestratorOptions {
            source_language: self.config.source_language.clone(),
            target_language: self.config.target_language.clone(),
            prompt_template: self.config.translation.common.prompt_template.clone(),
            context_lines: self.config.chunking.context_lines,
            output_dir: self.config.output_dir.as_ref().map(PathBuf::from),
        };

        Ok(TranslationOrchestrator::new(provider, options)?.with_dictionary(dictionary))
    }

    /// Translate a directory with a progress bar attached.
    async fn translate_directory_with_bar(
        &self,
        orchestrator: &TranslationOrchestrator,
        dir: &Path,
    ) -> Result<RunSummary> {
        let total = orchestrator.discover_sources(dir)?.len();

        let progress_bar = ProgressBar::new(total as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let summary = orchestrator
            .translate_directory_with_progress(dir, |done, _| {
                progress_bar.set_position(done as u64);
            })
            .await?;

        progress_bar.finish_and_clear();
        Ok(summary)
    }
}
