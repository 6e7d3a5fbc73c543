// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{ChunkModeKind, Config, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod chunking;
mod conversion;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Anthropic,
    OpenAI,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for ChunkModeKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliChunkMode {
    Heading,
    Chars,
    Tokens,
}

impl From<CliChunkMode> for ChunkModeKind {
    fn from(cli_mode: CliChunkMode) -> Self {
        match cli_mode {
            CliChunkMode::Heading => ChunkModeKind::Heading,
            CliChunkMode::Chars => ChunkModeKind::Chars,
            CliChunkMode::Tokens => ChunkModeKind::Tokens,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a PDF file into page-bounded chunk PDFs
    ChunkPdf {
        /// Path to the input PDF file
        input: PathBuf,

        /// Output directory for PDF chunks (default: 'chunks' next to the input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Number of pages per chunk
        #[arg(short, long)]
        pages_per_chunk: Option<usize>,
    },

    /// Split a Markdown file into structural chunks
    ChunkMd {
        /// Path to the input Markdown file
        input: PathBuf,

        /// Output directory (default: '<stem>_chunks' next to the input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Chunking mode
        #[arg(short, long, value_enum)]
        mode: Option<CliChunkMode>,

        /// Maximum heading level for heading mode (1-6)
        #[arg(long)]
        heading_level: Option<u8>,

        /// Maximum characters per chunk for chars mode
        #[arg(long)]
        max_chars: Option<usize>,

        /// Maximum tokens per chunk for tokens mode
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Overlap size in chars/tokens for size-based chunking
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Convert all PDF files in a directory to Markdown
    Convert {
        /// Directory containing PDF files to convert
        directory: PathBuf,

        /// Maximum line width for wrapping converted Markdown
        #[arg(long)]
        line_width: Option<usize>,

        /// Disable line wrapping
        #[arg(long)]
        no_wrap: bool,
    },

    /// Translate a Markdown file or a directory of Markdown chunks
    Translate {
        /// Input Markdown file or chunk directory
        input: PathBuf,

        /// Source language (e.g. 'Spanish', 'es')
        #[arg(short, long)]
        source_language: Option<String>,

        /// Target language (e.g. 'English', 'en')
        #[arg(short, long)]
        target_language: Option<String>,

        /// Translation provider to use
        #[arg(short, long, value_enum)]
        provider: Option<CliTranslationProvider>,

        /// Model name to use for translation
        #[arg(short, long)]
        model: Option<String>,

        /// Path to a terminology dictionary file
        #[arg(short, long)]
        dictionary: Option<String>,

        /// Number of context lines from adjacent chunks (0 disables)
        #[arg(short, long)]
        context_lines: Option<usize>,

        /// Output directory for translated files (default: beside sources)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Translation prompt template (must contain {source_language} and {target_language})
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Run the complete pipeline: chunk, convert, translate
    Pipeline {
        /// Path to the input PDF file
        pdf: PathBuf,

        /// Source language (e.g. 'Spanish', 'es')
        #[arg(short, long)]
        source_language: Option<String>,

        /// Target language (e.g. 'English', 'en')
        #[arg(short, long)]
        target_language: Option<String>,

        /// Number of pages per chunk for PDF splitting
        #[arg(short, long)]
        pages_per_chunk: Option<usize>,

        /// Translation provider to use
        #[arg(long, value_enum)]
        provider: Option<CliTranslationProvider>,

        /// Model name to use for translation
        #[arg(short, long)]
        model: Option<String>,

        /// Path to a terminology dictionary file
        #[arg(short, long)]
        dictionary: Option<String>,

        /// Number of context lines from adjacent chunks (0 disables)
        #[arg(short, long)]
        context_lines: Option<usize>,

        /// Skip PDF chunking and process the entire PDF directly
        #[arg(long)]
        skip_chunking: bool,
    },

    /// Generate shell completions for lexis
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lexis - Document Translation Pipeline
///
/// Splits large PDFs into page-bounded chunks, converts them to Markdown,
/// and translates the Markdown using AI providers while preserving
/// cross-chunk coherence.
#[derive(Parser, Debug)]
#[command(name = "lexis")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered document translation pipeline")]
#[command(long_about = "Lexis splits large documents into coherent chunks and translates them \
using AI providers (Anthropic, OpenAI), carrying boundary context across chunk \
boundaries so translations stay consistent.

EXAMPLES:
    lexis pipeline book/book.pdf -s Spanish -t English   # Full pipeline
    lexis chunk-pdf book.pdf -p 15                       # Split PDF only
    lexis chunk-md out/book.md -m chars --max-chars 4000 # Split Markdown
    lexis convert book/chunks                            # Convert chunk PDFs
    lexis translate book/chunks -s es -t en -c 5         # Translate chunks
    lexis completions bash > lexis.bash                  # Shell completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist,
    a default one will be created automatically.

SUPPORTED PROVIDERS:
    anthropic - Anthropic Claude API (requires API key)
    openai    - OpenAI API or any OpenAI-compatible endpoint (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, default_value = "conf.json", global = true)]
    config: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Icon for log level
    fn get_icon_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✗ ",
            Level::Warn => "⚠ ",
            Level::Info => " ",
            Level::Debug => "→ ",
            Level::Trace => "· ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let icon = Self::get_icon_for_level(record.level());

            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, icon, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Load the configuration file, creating a default one when missing.
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lexis", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Apply command overrides onto the loaded configuration, then validate
    // everything before any work starts
    match cli.command {
        Commands::ChunkPdf {
            input,
            output_dir,
            pages_per_chunk,
        } => {
            if let Some(pages) = pages_per_chunk {
                config.chunking.pages_per_chunk = pages;
            }
            config.validate().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            controller.run_chunk_pdf(&input, output_dir).await
        }

        Commands::ChunkMd {
            input,
            output_dir,
            mode,
            heading_level,
            max_chars,
            max_tokens,
            overlap,
        } => {
            if let Some(mode) = mode {
                config.chunking.mode = mode.into();
            }
            if let Some(level) = heading_level {
                config.chunking.max_heading_level = level;
            }
            if let Some(chars) = max_chars {
                config.chunking.max_chars = chars;
            }
            if let Some(tokens) = max_tokens {
                config.chunking.max_tokens = tokens;
            }
            if let Some(overlap) = overlap {
                config.chunking.overlap = overlap;
            }
            config.validate().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            controller.run_chunk_md(&input, output_dir).await
        }

        Commands::Convert {
            directory,
            line_width,
            no_wrap,
        } => {
            if let Some(width) = line_width {
                config.conversion.line_width = width;
            }
            if no_wrap {
                config.conversion.wrap_lines = false;
            }
            config.validate().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            controller.run_convert(&directory).await
        }

        Commands::Translate {
            input,
            source_language,
            target_language,
            provider,
            model,
            dictionary,
            context_lines,
            output_dir,
            prompt,
        } => {
            apply_translation_overrides(
                &mut config,
                source_language,
                target_language,
                provider,
                model,
                dictionary,
                context_lines,
            );
            if let Some(output_dir) = output_dir {
                config.output_dir = Some(output_dir);
            }
            if let Some(prompt) = prompt {
                config.translation.common.prompt_template = prompt;
            }
            config.validate().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            controller.run_translate(&input).await
        }

        Commands::Pipeline {
            pdf,
            source_language,
            target_language,
            pages_per_chunk,
            provider,
            model,
            dictionary,
            context_lines,
            skip_chunking,
        } => {
            apply_translation_overrides(
                &mut config,
                source_language,
                target_language,
                provider,
                model,
                dictionary,
                context_lines,
            );
            if let Some(pages) = pages_per_chunk {
                config.chunking.pages_per_chunk = pages;
            }
            config.validate().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            controller.run_pipeline(&pdf, skip_chunking).await
        }

        // Handled before config loading
        Commands::Completions { .. } => Ok(()),
    }
}

fn apply_translation_overrides(
    config: &mut Config,
    source_language: Option<String>,
    target_language: Option<String>,
    provider: Option<CliTranslationProvider>,
    model: Option<String>,
    dictionary: Option<String>,
    context_lines: Option<usize>,
) {
    if let Some(source) = source_language {
        config.source_language = source;
    }
    if let Some(target) = target_language {
        config.target_language = target;
    }
    if let Some(provider) = provider {
        config.translation.provider = provider.into();
    }
    if let Some(model) = model {
        // Find the active provider config and update the model
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.model = model;
        }
    }
    if let Some(dictionary) = dictionary {
        config.dictionary_path = Some(dictionary);
    }
    if let Some(context) = context_lines {
        config.chunking.context_lines = context;
    }
}
