/*!
 * Terminology dictionary for translation consistency.
 *
 * Parses a line-oriented term file into an ordered term-to-renderings
 * mapping and renders it as deterministic prompt text. The dictionary is
 * built once per run and immutable thereafter; it is never a hard
 * dependency of the pipeline.
 */

use log::warn;
use std::collections::HashMap;
use std::path::Path;

use crate::errors::{AppError, ConfigError, InputError};
use crate::file_utils::FileManager;

/// One dictionary entry: a source term and its acceptable renderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// Case-sensitive source term
    pub term: String,
    /// Acceptable target renderings, in file order
    pub renderings: Vec<String>,
}

/// Ordered mapping from source terms to acceptable target renderings.
#[derive(Debug, Clone, Default)]
pub struct TerminologyDictionary {
    entries: Vec<DictionaryEntry>,
    index: HashMap<String, usize>,
}

impl TerminologyDictionary {
    /// Parse dictionary content.
    ///
    /// Format: one `term: rendering1, rendering2, ...` per line; lines
    /// starting with `#` are comments and blank lines are ignored. A later
    /// duplicate term overwrites the earlier entry with a warning. An entry
    /// without any rendering is rejected.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut dictionary = Self::default();

        for (line_number, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((term_part, renderings_part)) = line.split_once(':') else {
                warn!(
                    "Ignoring malformed dictionary line {}: '{}'",
                    line_number + 1,
                    line
                );
                continue;
            };

            let term = term_part.trim();
            if term.is_empty() {
                warn!(
                    "Ignoring dictionary line {} with empty term",
                    line_number + 1
                );
                continue;
            }

            let renderings: Vec<String> = renderings_part
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();

            if renderings.is_empty() {
                return Err(ConfigError::EmptyDictionaryEntry(term.to_string()));
            }

            dictionary.insert(term.to_string(), renderings);
        }

        Ok(dictionary)
    }

    /// Load and parse a dictionary file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !FileManager::file_exists(path) {
            return Err(InputError::NotFound(path.to_path_buf()).into());
        }
        let content = FileManager::read_to_string(path).map_err(|e| InputError::Unreadable {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        Ok(Self::parse(&content)?)
    }

    fn insert(&mut self, term: String, renderings: Vec<String>) {
        if let Some(&position) = self.index.get(&term) {
            warn!("Duplicate dictionary term '{}' overwrites earlier entry", term);
            self.entries[position].renderings = renderings;
        } else {
            self.index.insert(term.clone(), self.entries.len());
            self.entries.push(DictionaryEntry { term, renderings });
        }
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary holds no terms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the renderings for a term.
    pub fn get(&self, term: &str) -> Option<&[String]> {
        self.index
            .get(term)
            .map(|&position| self.entries[position].renderings.as_slice())
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Render the dictionary as prompt-injectable text, listing each term
    /// and its alternatives in file order.
    pub fn prompt_text(&self) -> String {
        let mut text = String::from("## Terminology\nUse the following term translations:\n```\n");
        for entry in &self.entries {
            text.push_str(&entry.term);
            text.push_str(" -> ");
            text.push_str(&entry.renderings.join(", "));
            text.push('\n');
        }
        text.push_str("```");
        text
    }
}
