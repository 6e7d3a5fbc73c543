/*!
 * Translation orchestration.
 *
 * Drives translation of a single chunk file or a directory of chunk files.
 * Each chunk moves through a small state machine
 * (`Pending -> Skipped | Translating -> Translated | Failed`); failures are
 * isolated per chunk and an explicit run summary is threaded back to the
 * caller instead of shared mutable counters.
 *
 * The filesystem is the coordination medium: a chunk whose output file
 * already exists is skipped, which is what makes interrupted directory
 * runs safely re-entrant. Outputs are published atomically so an
 * interrupted chunk never leaves a partial file behind.
 */

use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::chunking::{ChunkContext, ContextResolver};
use crate::errors::{AppError, ConfigError, InputError, TranslationError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::Provider;
use crate::translation::dictionary::TerminologyDictionary;
use crate::translation::request::TranslationRequest;

/// Lifecycle state of a chunk within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Not yet examined
    Pending,
    /// Output already exists, no provider call made
    Skipped,
    /// Provider call in flight
    Translating,
    /// Output published
    Translated,
    /// Provider or validation failure, batch continues
    Failed,
}

/// Outcome of processing one chunk.
#[derive(Debug)]
pub enum ChunkOutcome {
    /// The output already existed; no work was done
    Skipped {
        /// The pre-existing output path
        output: PathBuf,
    },
    /// The chunk was translated and its output published
    Translated {
        /// The published output path
        output: PathBuf,
        /// Time spent on the provider call and publish
        elapsed: Duration,
    },
    /// The chunk failed; previously completed chunks are untouched
    Failed {
        /// What went wrong
        error: AppError,
    },
}

impl ChunkOutcome {
    /// Final state reached by this outcome.
    pub fn state(&self) -> ChunkState {
        match self {
            ChunkOutcome::Skipped { .. } => ChunkState::Skipped,
            ChunkOutcome::Translated { .. } => ChunkState::Translated,
            ChunkOutcome::Failed { .. } => ChunkState::Failed,
        }
    }
}

/// Aggregated result of a directory run.
///
/// An explicit result object returned by the orchestrator; there is no
/// global mutable run state.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Chunks translated in this run
    pub translated: usize,
    /// Chunks skipped because their output already existed
    pub skipped: usize,
    /// Chunks that failed
    pub failed: usize,
    /// Identity and error of every failed chunk
    pub failures: Vec<(PathBuf, String)>,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// Total chunks examined.
    pub fn total(&self) -> usize {
        self.translated + self.skipped + self.failed
    }

    fn record(&mut self, input: &Path, outcome: &ChunkOutcome) {
        match outcome {
            ChunkOutcome::Skipped { output } => {
                self.skipped += 1;
                info!("Skipping {:?}, translation already exists at {:?}", input, output);
            }
            ChunkOutcome::Translated { output, elapsed } => {
                self.translated += 1;
                info!("Translated {:?} -> {:?} in {:.1}s", input, output, elapsed.as_secs_f64());
            }
            ChunkOutcome::Failed { error } => {
                self.failed += 1;
                self.failures.push((input.to_path_buf(), error.to_string()));
                error!("Failed to translate {:?}: {}", input, error);
            }
        }
    }

    /// Log a closing report for the run.
    pub fn log_report(&self) {
        info!(
            "Run complete: {} translated, {} skipped, {} failed ({:.1}s)",
            self.translated,
            self.skipped,
            self.failed,
            self.elapsed.as_secs_f64()
        );
        for (path, message) in &self.failures {
            warn!("  failed: {:?} - {}", path, message);
        }
    }
}

/// Options controlling a translation run.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Source language as configured (code or name)
    pub source_language: String,
    /// Target language as configured (code or name); also the output suffix
    pub target_language: String,
    /// Prompt template with language placeholders
    pub prompt_template: String,
    /// Lines of boundary context from adjacent chunks (0 disables)
    pub context_lines: usize,
    /// Output directory override; outputs land beside their sources if unset
    pub output_dir: Option<PathBuf>,
}

/// Drives translation of chunk files through the configured provider.
pub struct TranslationOrchestrator {
    provider: Box<dyn Provider>,
    options: OrchestratorOptions,
    dictionary: Option<TerminologyDictionary>,
    resolver: ContextResolver,
    /// Language pair as rendered into prompts
    source_display: String,
    target_display: String,
}

impl TranslationOrchestrator {
    /// Create a new orchestrator.
    ///
    /// The prompt template is validated here so a bad template fails before
    /// any chunk work starts.
    pub fn new(
        provider: Box<dyn Provider>,
        options: OrchestratorOptions,
    ) -> Result<Self, ConfigError> {
        TranslationRequest::validate_template(&options.prompt_template)?;

        // Prompts carry full language names when the identifier resolves;
        // the configured string is kept for file naming either way
        let source_display = language_utils::display_name(&options.source_language)
            .unwrap_or_else(|_| options.source_language.clone());
        let target_display = language_utils::display_name(&options.target_language)
            .unwrap_or_else(|_| options.target_language.clone());

        let resolver = ContextResolver::new(options.context_lines);

        Ok(Self {
            provider,
            options,
            dictionary: None,
            resolver,
            source_display,
            target_display,
        })
    }

    /// Attach a terminology dictionary.
    pub fn with_dictionary(mut self, dictionary: Option<TerminologyDictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Output path a given input translates to.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        FileManager::translated_output_path(
            input,
            self.options.output_dir.as_deref(),
            &self.options.target_language,
        )
    }

    /// Classify a chunk before doing any work.
    ///
    /// The existence test runs fresh every time it is called; two runs over
    /// disjoint subsets of a directory coordinate through it.
    pub fn classify(&self, input: &Path) -> ChunkState {
        if FileManager::is_translation_output(input, &self.options.target_language) {
            return ChunkState::Skipped;
        }
        if FileManager::file_exists(self.output_path_for(input)) {
            return ChunkState::Skipped;
        }
        ChunkState::Pending
    }

    /// Translate a single chunk file with the given boundary context.
    ///
    /// The provider is invoked exactly once; a failed call produces a
    /// `Failed` outcome rather than an error so batch processing continues.
    /// Only a fatal (authentication) provider failure is returned as an
    /// error, aborting the run.
    pub async fn translate_chunk(
        &self,
        input: &Path,
        context: &ChunkContext,
    ) -> Result<ChunkOutcome, AppError> {
        let output = self.output_path_for(input);
        if self.classify(input) == ChunkState::Skipped {
            return Ok(ChunkOutcome::Skipped { output });
        }

        let content = match FileManager::read_to_string(input) {
            Ok(content) => content,
            Err(e) => {
                return Ok(ChunkOutcome::Failed {
                    error: InputError::Unreadable {
                        path: input.to_path_buf(),
                        detail: e.to_string(),
                    }
                    .into(),
                });
            }
        };

        debug!("Translating {:?} ({} chars)", input, content.len());
        let start_time = Instant::now();

        let request = TranslationRequest::new(content, &self.source_display, &self.target_display)
            .with_template(&self.options.prompt_template)
            .with_context(context)
            .with_dictionary(self.dictionary.as_ref());

        let translated = match self.provider.translate(&request).await {
            Ok(translated) => translated,
            Err(e) if e.is_fatal() => {
                // Nothing can proceed without a usable credential
                return Err(AppError::Provider(e));
            }
            Err(e) => {
                return Ok(ChunkOutcome::Failed {
                    error: TranslationError::Provider(e).into(),
                });
            }
        };

        let translated = translated.trim();
        if translated.is_empty() {
            return Ok(ChunkOutcome::Failed {
                error: TranslationError::EmptyTranslation.into(),
            });
        }

        if let Err(e) = FileManager::publish_atomic(&output, translated) {
            return Ok(ChunkOutcome::Failed {
                error: AppError::File(e.to_string()),
            });
        }

        Ok(ChunkOutcome::Translated {
            output,
            elapsed: start_time.elapsed(),
        })
    }

    /// Translate a single standalone file (no neighbouring chunks).
    pub async fn translate_file(&self, input: &Path) -> Result<ChunkOutcome, AppError> {
        if !FileManager::file_exists(input) {
            return Err(InputError::NotFound(input.to_path_buf()).into());
        }
        self.translate_chunk(input, &ChunkContext::default()).await
    }

    /// Discover the ordered source chunk sequence of a directory.
    ///
    /// All Markdown files that are not themselves translation outputs, in
    /// lexical filename order, which coincides with sequence order thanks
    /// to zero-padded chunk numbering. Sources whose outputs already exist
    /// stay in the sequence: they are skipped per chunk, but their content
    /// still feeds boundary context, so a resumed run recomputes exactly
    /// the context an uninterrupted run would have used.
    pub fn discover_sources(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        if !FileManager::dir_exists(dir) {
            return Err(InputError::NotFound(dir.to_path_buf()).into());
        }

        let sources = FileManager::find_files(dir, "md")
            .map_err(|e| AppError::File(e.to_string()))?
            .into_iter()
            .filter(|path| !FileManager::is_translation_output(path, &self.options.target_language))
            .collect();

        Ok(sources)
    }

    /// Translate every pending chunk in a directory, sequentially.
    pub async fn translate_directory(&self, dir: &Path) -> Result<RunSummary, AppError> {
        self.translate_directory_with_progress(dir, |_, _| {}).await
    }

    /// Translate a directory, reporting progress after each chunk.
    pub async fn translate_directory_with_progress(
        &self,
        dir: &Path,
        progress: impl Fn(usize, usize),
    ) -> Result<RunSummary, AppError> {
        let start_time = Instant::now();
        let sources = self.discover_sources(dir)?;

        let mut summary = RunSummary::default();
        if sources.is_empty() {
            warn!("No Markdown chunks found in {:?}", dir);
            summary.elapsed = start_time.elapsed();
            return Ok(summary);
        }

        info!(
            "Translating {} chunk(s) in {:?} ({} -> {}) via {}",
            sources.len(),
            dir,
            self.source_display,
            self.target_display,
            self.provider.name()
        );

        // Context always comes from original source content, never from a
        // produced translation
        let contents: Vec<String> = sources
            .iter()
            .map(|path| FileManager::read_to_string(path).unwrap_or_default())
            .collect();
        let contexts = self.resolver.resolve_all(&contents);

        for (index, source) in sources.iter().enumerate() {
            let outcome = self.translate_chunk(source, &contexts[index]).await?;
            summary.record(source, &outcome);
            progress(index + 1, sources.len());
        }

        summary.elapsed = start_time.elapsed();
        summary.log_report();
        Ok(summary)
    }
}
