/*!
 * # Lexis - Document Translation Pipeline
 *
 * A Rust library for translating large documents with an AI backend while
 * preserving cross-chunk coherence.
 *
 * ## Features
 *
 * - Split large PDFs into page-bounded chunk files
 * - Split Markdown by heading hierarchy, character budget, or token budget
 * - Boundary context resolution across chunk boundaries
 * - Translate chunks using pluggable AI providers:
 *   - Anthropic API
 *   - OpenAI API (and OpenAI-compatible servers)
 * - Terminology dictionaries injected into translation prompts
 * - Resumable directory processing with deterministic output naming
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `chunking`: Document splitting and boundary context:
 *   - `chunking::page`: Page-range PDF chunking
 *   - `chunking::structural`: Heading- and size-based Markdown chunking
 *   - `chunking::context`: Boundary context resolution
 * - `conversion`: External PDF-to-Markdown converter integration
 * - `translation`: Translation orchestration:
 *   - `translation::dictionary`: Terminology dictionaries
 *   - `translation::request`: Provider-agnostic request composition
 *   - `translation::orchestrator`: Per-chunk state machine and directory runs
 * - `providers`: Client implementations for LLM providers
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language identifier utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod chunking;
pub mod conversion;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use chunking::{
    ChunkContext, ChunkMode, ContextResolver, MarkdownChunk, PageChunker, PageRange,
    StructuralChunker,
};
pub use errors::{
    AppError, ConfigError, ConversionError, InputError, ProviderError, TranslationError,
};
pub use translation::{
    RunSummary, TerminologyDictionary, TranslationOrchestrator, TranslationRequest,
};
