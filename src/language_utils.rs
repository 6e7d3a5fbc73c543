use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the translation pipeline
///
/// Users may specify languages either as ISO 639-1/639-3 codes ("es", "spa")
/// or as English names ("Spanish"). This module resolves both forms and
/// renders the display name used when composing prompts.
/// Resolve a user-supplied language identifier to a Language.
pub fn resolve(input: &str) -> Result<Language> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Empty language identifier"));
    }

    let lowered = trimmed.to_lowercase();
    if lowered.len() == 2 {
        if let Some(lang) = Language::from_639_1(&lowered) {
            return Ok(lang);
        }
    } else if lowered.len() == 3 {
        if let Some(lang) = Language::from_639_3(&lowered) {
            return Ok(lang);
        }
    }

    // Fall back to matching the English language name ("Spanish", "german")
    if let Some(lang) = Language::from_name(trimmed) {
        return Ok(lang);
    }
    // from_name is case-sensitive; retry with a capitalized form
    let capitalized = capitalize(&lowered);
    if let Some(lang) = Language::from_name(&capitalized) {
        return Ok(lang);
    }

    Err(anyhow!("Unrecognized language: {}", input))
}

/// Get the English display name for a language identifier ("es" -> "Spanish").
pub fn display_name(input: &str) -> Result<String> {
    Ok(resolve(input)?.to_name().to_string())
}

/// Check if two language identifiers refer to the same language.
pub fn languages_match(a: &str, b: &str) -> bool {
    match (resolve(a), resolve(b)) {
        (Ok(lang_a), Ok(lang_b)) => lang_a == lang_b,
        _ => false,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
