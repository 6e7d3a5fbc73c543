/*!
 * Error types for the lexis application.
 *
 * This module contains custom error types for different parts of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors caused by invalid configuration
///
/// These are detected and reported before any per-item work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Pages-per-chunk must be a positive number
    #[error("pages per chunk must be at least 1")]
    ZeroPagesPerChunk,

    /// Overlap must stay strictly below the chunk budget
    #[error("overlap ({overlap}) must be smaller than the chunk budget ({budget})")]
    OverlapExceedsBudget {
        /// Configured overlap, in the mode's own units
        overlap: usize,
        /// Configured chunk budget, in the mode's own units
        budget: usize,
    },

    /// Heading levels outside 1-6 are not valid Markdown
    #[error("heading level must be between 1 and 6, got {0}")]
    InvalidHeadingLevel(u8),

    /// The prompt template must carry both language placeholders
    #[error("prompt template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),

    /// A language identifier that is neither an ISO code nor a known name
    #[error("unrecognized language: {0}")]
    InvalidLanguage(String),

    /// An endpoint that cannot be parsed as a URL
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// A dictionary entry with a term but no target renderings
    #[error("dictionary entry '{0}' has no target renderings")]
    EmptyDictionaryEntry(String),

    /// Missing credential for a provider that requires one
    #[error("no API key configured for provider {0}")]
    MissingApiKey(String),
}

/// Errors for a single source that cannot be used
///
/// Fatal for that source, but never for a multi-source batch.
#[derive(Error, Debug)]
pub enum InputError {
    /// The source file does not exist
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    /// The source file exists but could not be read or parsed
    #[error("failed to read {path}: {detail}")]
    Unreadable {
        /// Path of the offending source
        path: PathBuf,
        /// Underlying failure description
        detail: String,
    },

    /// The source document contains no pages
    #[error("source document has no pages")]
    EmptyDocument,
}

/// Errors from the external PDF-to-Markdown converter
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The converter command could not be run or exited non-zero
    #[error("converter command '{command}' failed: {detail}")]
    CommandFailed {
        /// The configured converter command
        command: String,
        /// stderr or spawn failure description
        detail: String,
    },

    /// The converter exceeded the configured deadline
    #[error("converter command '{command}' timed out after {secs}s")]
    Timeout {
        /// The configured converter command
        command: String,
        /// The configured deadline in seconds
        secs: u64,
    },

    /// The converter exited successfully but produced no Markdown
    #[error("converter produced no output for {0}")]
    EmptyOutput(PathBuf),
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether this error invalidates the whole run rather than one chunk.
    ///
    /// Authentication failures cannot be recovered by moving on to the next
    /// chunk; every other provider failure is isolated per chunk.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProviderError::AuthenticationError(_))
    }
}

/// Errors that can occur during translation of a single chunk
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered but the translation was empty
    #[error("provider returned an empty translation")]
    EmptyTranslation,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a single input source
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Error from the external converter
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
