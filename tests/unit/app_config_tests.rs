/*!
 * Tests for application configuration loading and validation
 */

use lexis::app_config::{ChunkModeKind, Config, TranslationProvider};
use lexis::errors::ConfigError;

/// Test that the default configuration passes validation
#[test]
fn test_validate_withDefaultConfig_shouldSucceed() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

/// Test that zero pages per chunk is rejected
#[test]
fn test_validate_withZeroPagesPerChunk_shouldFail() {
    let mut config = Config::default();
    config.chunking.pages_per_chunk = 0;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroPagesPerChunk)
    ));
}

/// Test that an out-of-range heading level is rejected
#[test]
fn test_validate_withInvalidHeadingLevel_shouldFail() {
    let mut config = Config::default();
    config.chunking.max_heading_level = 7;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidHeadingLevel(7))
    ));
}

/// Test that overlap >= budget fails for the active size mode
#[test]
fn test_validate_withOverlapAtBudget_shouldFailForCharsMode() {
    let mut config = Config::default();
    config.chunking.mode = ChunkModeKind::Chars;
    config.chunking.max_chars = 100;
    config.chunking.overlap = 100;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::OverlapExceedsBudget { overlap: 100, budget: 100 })
    ));
}

/// Test that the overlap check uses the token budget in token mode
#[test]
fn test_validate_withOverlapAtBudget_shouldFailForTokensMode() {
    let mut config = Config::default();
    config.chunking.mode = ChunkModeKind::Tokens;
    config.chunking.max_tokens = 50;
    config.chunking.overlap = 80;

    assert!(config.validate().is_err());
}

/// Test that a large overlap is fine while heading mode is active
#[test]
fn test_validate_withHeadingMode_shouldIgnoreOverlap() {
    let mut config = Config::default();
    config.chunking.mode = ChunkModeKind::Heading;
    config.chunking.overlap = 999_999;

    assert!(config.validate().is_ok());
}

/// Test that an unknown language identifier is rejected
#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "definitely-not-a-language".to_string();

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLanguage(_))
    ));
}

/// Test that full language names are accepted alongside ISO codes
#[test]
fn test_validate_withLanguageNames_shouldSucceed() {
    let mut config = Config::default();
    config.source_language = "Spanish".to_string();
    config.target_language = "English".to_string();

    assert!(config.validate().is_ok());
}

/// Test that a prompt template without placeholders is rejected
#[test]
fn test_validate_withTemplateMissingPlaceholders_shouldFail() {
    let mut config = Config::default();
    config.translation.common.prompt_template = "Just translate it.".to_string();

    assert!(matches!(
        config.validate(),
        Err(ConfigError::MissingPlaceholder(_))
    ));
}

/// Test that a provider key in the config satisfies the auth check
#[test]
fn test_validateProviderAuth_withConfiguredKey_shouldSucceed() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    for provider in &mut config.translation.available_providers {
        provider.api_key = "test-key".to_string();
    }

    assert!(config.validate_provider_auth().is_ok());
}

/// Test that a missing credential is detected eagerly
#[test]
fn test_validateProviderAuth_withoutKey_shouldFail() {
    // Make sure the environment fallback cannot satisfy the check
    unsafe {
        std::env::remove_var("ANTHROPIC_API_KEY");
    }

    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;

    assert!(matches!(
        config.validate_provider_auth(),
        Err(ConfigError::MissingApiKey(_))
    ));
}

/// Test that the config round-trips through JSON
#[test]
fn test_config_serdeRoundTrip_shouldPreserveValues() {
    let mut config = Config::default();
    config.source_language = "de".to_string();
    config.chunking.pages_per_chunk = 15;
    config.chunking.mode = ChunkModeKind::Tokens;
    config.dictionary_path = Some("terms.txt".to_string());

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.source_language, "de");
    assert_eq!(parsed.chunking.pages_per_chunk, 15);
    assert_eq!(parsed.chunking.mode, ChunkModeKind::Tokens);
    assert_eq!(parsed.dictionary_path.as_deref(), Some("terms.txt"));
}

/// Test that a minimal config JSON gets defaults filled in
#[test]
fn test_config_withMinimalJson_shouldApplyDefaults() {
    let json = r#"{
        "source_language": "es",
        "target_language": "en",
        "translation": {}
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.chunking.pages_per_chunk, 10);
    assert_eq!(config.chunking.max_heading_level, 2);
    assert_eq!(config.chunking.max_chars, 5000);
    assert_eq!(config.chunking.max_tokens, 1000);
    assert_eq!(config.chunking.overlap, 200);
    assert_eq!(config.chunking.context_lines, 5);
    assert_eq!(config.translation.provider, TranslationProvider::Anthropic);
}

/// Test provider parsing accepts familiar aliases
#[test]
fn test_translationProvider_fromStr_shouldAcceptAliases() {
    assert_eq!(
        "claude".parse::<TranslationProvider>().unwrap(),
        TranslationProvider::Anthropic
    );
    assert_eq!(
        "chatgpt".parse::<TranslationProvider>().unwrap(),
        TranslationProvider::OpenAI
    );
    assert!("rule-based-9000".parse::<TranslationProvider>().is_err());
}
