/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for LLM providers:
 * - Anthropic: Anthropic API integration
 * - OpenAI: OpenAI API integration (also covers OpenAI-compatible servers)
 * - Mock: deterministic in-process provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;
use crate::translation::TranslationRequest;

/// Common capability contract for all translation providers
///
/// Providers are interchangeable: each one shapes the provider-agnostic
/// request into its own wire format. A provider that has no use for a
/// request field (context, dictionary) ignores it rather than erroring.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a request, returning the translated text
    ///
    /// # Arguments
    /// * `request` - The provider-agnostic translation request
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is usable
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Provider display name for logs and run summaries
    fn name(&self) -> &str;
}

pub mod anthropic;
pub mod mock;
pub mod openai;

/// Build the configured provider client.
///
/// Fails with an authentication error when no credential is available,
/// before any per-chunk work begins.
pub fn create_provider(config: &TranslationConfig) -> Result<Box<dyn Provider>, ProviderError> {
    let api_key = config.get_api_key();
    if api_key.is_empty() {
        return Err(ProviderError::AuthenticationError(format!(
            "no API key configured for {} (set it in the config file or the {} environment variable)",
            config.provider.display_name(),
            config.provider.api_key_env_var()
        )));
    }

    let client: Box<dyn Provider> = match config.provider {
        TranslationProvider::Anthropic => Box::new(anthropic::Anthropic::new(
            api_key,
            config.get_endpoint(),
            config.get_model(),
            config.get_max_output_tokens(),
            config.common.temperature,
            config.get_timeout_secs(),
        )),
        TranslationProvider::OpenAI => Box::new(openai::OpenAI::new(
            api_key,
            config.get_endpoint(),
            config.get_model(),
            config.common.temperature,
            config.get_timeout_secs(),
        )),
    };

    Ok(client)
}
