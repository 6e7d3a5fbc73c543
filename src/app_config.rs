use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language (ISO code or English name)
    pub source_language: String,

    /// Target language (ISO code or English name)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Chunking config
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// External converter config
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Optional path to a terminology dictionary file
    #[serde(default)]
    pub dictionary_path: Option<String>,

    /// Optional output directory override for translated files
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Anthropic
    #[default]
    Anthropic,
    // @provider: OpenAI (also covers OpenAI-compatible local servers)
    OpenAI,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Anthropic => "anthropic".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }

    // @returns: Environment variable consulted when no key is configured
    pub fn api_key_env_var(&self) -> &str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "chatgpt" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max tokens per completion
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                max_output_tokens: default_max_output_tokens(),
                timeout_secs: default_anthropic_timeout_secs(),
            },
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                max_output_tokens: default_max_output_tokens(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            prompt_template: default_prompt_template(),
            temperature: default_temperature(),
        }
    }
}

/// Chunking mode for Markdown documents
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkModeKind {
    /// Split at heading boundaries
    #[default]
    Heading,
    /// Split at a character budget with overlap
    Chars,
    /// Split at an approximate token budget with overlap
    Tokens,
}

/// Configuration for document chunking
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Number of pages per PDF chunk
    #[serde(default = "default_pages_per_chunk")]
    pub pages_per_chunk: usize,

    /// Markdown chunking mode
    #[serde(default)]
    pub mode: ChunkModeKind,

    /// Maximum heading level to split on (1-6), heading mode only
    #[serde(default = "default_max_heading_level")]
    pub max_heading_level: u8,

    /// Maximum characters per chunk, chars mode only
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Approximate maximum tokens per chunk, tokens mode only
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Overlap between adjacent size-based chunks, in the mode's own units
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Number of context lines drawn from adjacent chunks for translation.
    /// Zero disables boundary context.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            pages_per_chunk: default_pages_per_chunk(),
            mode: ChunkModeKind::default(),
            max_heading_level: default_max_heading_level(),
            max_chars: default_max_chars(),
            max_tokens: default_max_tokens(),
            overlap: default_overlap(),
            context_lines: default_context_lines(),
        }
    }
}

/// Configuration for the external PDF-to-Markdown converter
///
/// The converter is consumed as a black box: the configured command is
/// invoked with the PDF path appended as its final argument and must write
/// Markdown to stdout.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConversionConfig {
    /// Converter command name
    #[serde(default = "default_converter_command")]
    pub command: String,

    /// Extra arguments passed before the PDF path
    #[serde(default)]
    pub args: Vec<String>,

    /// Maximum line width for wrapping converted Markdown
    #[serde(default = "default_line_width")]
    pub line_width: usize,

    /// Whether to wrap long lines in converted Markdown
    #[serde(default = "default_true")]
    pub wrap_lines: bool,

    /// Converter timeout in seconds
    #[serde(default = "default_converter_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            command: default_converter_command(),
            args: Vec::new(),
            line_width: default_line_width(),
            wrap_lines: true,
            timeout_secs: default_converter_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_anthropic_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_prompt_template() -> String {
    "You are a professional translator. Translate the following Markdown text from {source_language} to {target_language}. \
     Preserve all Markdown formatting, structure, and syntax. Only translate the text content, not the Markdown syntax itself. \
     Respond with the translated text only, without explanations or notes."
        .to_string()
}

fn default_pages_per_chunk() -> usize {
    10
}

fn default_max_heading_level() -> u8 {
    2
}

fn default_max_chars() -> usize {
    5000
}

fn default_max_tokens() -> usize {
    1000
}

fn default_overlap() -> usize {
    200
}

fn default_context_lines() -> usize {
    5
}

fn default_converter_command() -> String {
    "docling".to_string()
}

fn default_line_width() -> usize {
    120
}

fn default_converter_timeout_secs() -> u64 {
    600
}

impl Config {
    /// Validate the configuration for consistency and required values.
    ///
    /// This covers every structural check that must fail before any work
    /// starts. Credential presence is checked separately by
    /// [`Config::validate_provider_auth`] so chunk-only commands do not
    /// demand an API key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate languages
        crate::language_utils::resolve(&self.source_language)
            .map_err(|_| ConfigError::InvalidLanguage(self.source_language.clone()))?;
        crate::language_utils::resolve(&self.target_language)
            .map_err(|_| ConfigError::InvalidLanguage(self.target_language.clone()))?;

        // Validate chunking parameters
        if self.chunking.pages_per_chunk == 0 {
            return Err(ConfigError::ZeroPagesPerChunk);
        }
        if !(1..=6).contains(&self.chunking.max_heading_level) {
            return Err(ConfigError::InvalidHeadingLevel(self.chunking.max_heading_level));
        }
        match self.chunking.mode {
            ChunkModeKind::Chars if self.chunking.overlap >= self.chunking.max_chars => {
                return Err(ConfigError::OverlapExceedsBudget {
                    overlap: self.chunking.overlap,
                    budget: self.chunking.max_chars,
                });
            }
            ChunkModeKind::Tokens if self.chunking.overlap >= self.chunking.max_tokens => {
                return Err(ConfigError::OverlapExceedsBudget {
                    overlap: self.chunking.overlap,
                    budget: self.chunking.max_tokens,
                });
            }
            _ => {}
        }

        // Validate prompt template placeholders
        let template = &self.translation.common.prompt_template;
        if !template.contains("{source_language}") {
            return Err(ConfigError::MissingPlaceholder("{source_language}"));
        }
        if !template.contains("{target_language}") {
            return Err(ConfigError::MissingPlaceholder("{target_language}"));
        }

        // Validate the active provider endpoint if one is configured
        let endpoint = self.translation.get_endpoint();
        if !endpoint.is_empty() && Url::parse(&endpoint).is_err() {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }

        Ok(())
    }

    /// Validate that a credential is available for the active provider.
    ///
    /// Called eagerly before any per-item translation work so a missing key
    /// never produces a partial batch.
    pub fn validate_provider_auth(&self) -> Result<(), ConfigError> {
        if self.translation.get_api_key().is_empty() {
            return Err(ConfigError::MissingApiKey(
                self.translation.provider.display_name().to_string(),
            ));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "es".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            chunking: ChunkingConfig::default(),
            conversion: ConversionConfig::default(),
            dictionary_path: None,
            output_dir: None,
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_model(),
            TranslationProvider::OpenAI => default_openai_model(),
        }
    }

    /// Get the API key for the active provider.
    ///
    /// Falls back to the provider's environment variable when the config
    /// file carries no key.
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        std::env::var(self.provider.api_key_env_var()).unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
            TranslationProvider::OpenAI => default_openai_endpoint(),
        }
    }

    /// Get the max output tokens for the active provider
    pub fn get_max_output_tokens(&self) -> u32 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.max_output_tokens > 0 {
                return provider_config.max_output_tokens;
            }
        }

        default_max_output_tokens()
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_timeout_secs(),
            TranslationProvider::OpenAI => default_timeout_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::Anthropic));
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::OpenAI));

        config
    }
}
