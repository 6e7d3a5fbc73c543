/*!
 * Provider-agnostic translation request composition.
 *
 * A request is the unit actually sent for translation: the chunk's main
 * text, the optional boundary context (explicitly marked as reference
 * material), the optional terminology section, and the language pair.
 * Requests are built on demand right before a chunk is translated and are
 * never persisted.
 */

use crate::chunking::ChunkContext;
use crate::errors::ConfigError;
use crate::translation::TerminologyDictionary;

/// Placeholder for the source language in prompt templates.
pub const SOURCE_PLACEHOLDER: &str = "{source_language}";
/// Placeholder for the target language in prompt templates.
pub const TARGET_PLACEHOLDER: &str = "{target_language}";

/// A single translation request.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// The chunk content to translate
    pub text: String,

    /// Trailing lines of the preceding chunk, reference only
    pub context_before: Option<String>,

    /// Leading lines of the following chunk, reference only
    pub context_after: Option<String>,

    /// Rendered terminology section
    pub dictionary: Option<String>,

    /// Source language display name
    pub source_language: String,

    /// Target language display name
    pub target_language: String,

    /// Instruction template with language placeholders
    pub prompt_template: String,
}

impl TranslationRequest {
    /// Create a request with the default prompt template and no context.
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            context_before: None,
            context_after: None,
            dictionary: None,
            source_language: source_language.into(),
            target_language: target_language.into(),
            prompt_template: crate::app_config::TranslationCommonConfig::default().prompt_template,
        }
    }

    /// Attach boundary context.
    pub fn with_context(mut self, context: &ChunkContext) -> Self {
        self.context_before = context.before.clone();
        self.context_after = context.after.clone();
        self
    }

    /// Attach a terminology dictionary, if it has any entries.
    pub fn with_dictionary(mut self, dictionary: Option<&TerminologyDictionary>) -> Self {
        self.dictionary = dictionary
            .filter(|d| !d.is_empty())
            .map(|d| d.prompt_text());
        self
    }

    /// Use a custom prompt template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Validate that a template carries both language placeholders.
    pub fn validate_template(template: &str) -> Result<(), ConfigError> {
        if !template.contains(SOURCE_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(SOURCE_PLACEHOLDER));
        }
        if !template.contains(TARGET_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(TARGET_PLACEHOLDER));
        }
        Ok(())
    }

    /// Render the instruction prompt with the language pair filled in.
    pub fn system_prompt(&self) -> String {
        self.prompt_template
            .replace(SOURCE_PLACEHOLDER, &self.source_language)
            .replace(TARGET_PLACEHOLDER, &self.target_language)
    }

    /// Compose the user-facing payload: reference context, terminology,
    /// and the main text, in that order.
    pub fn user_prompt(&self) -> String {
        let mut prompt = String::new();

        if self.context_before.is_some() || self.context_after.is_some() {
            prompt.push_str("## Reference Context (do not translate)\n");
            prompt.push_str(
                "The following excerpts from adjacent sections are provided only for continuity. \
                 Do not include them in your translation.\n",
            );
            if let Some(before) = &self.context_before {
                prompt.push_str("\nText immediately before:\n```\n");
                prompt.push_str(before);
                prompt.push_str("\n```\n");
            }
            if let Some(after) = &self.context_after {
                prompt.push_str("\nText immediately after:\n```\n");
                prompt.push_str(after);
                prompt.push_str("\n```\n");
            }
            prompt.push('\n');
        }

        if let Some(dictionary) = &self.dictionary {
            prompt.push_str(dictionary);
            prompt.push_str("\n\n");
        }

        prompt.push_str("## Text to Translate\n\n");
        prompt.push_str(&self.text);
        prompt
    }
}
