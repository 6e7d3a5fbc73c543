/*!
 * Structural Markdown chunking.
 *
 * Splits a Markdown document into ordered chunks by one of three mutually
 * exclusive modes: heading hierarchy, character budget, or approximate
 * token budget. Size-based modes cut at paragraph boundaries when one is
 * found inside the lookback window and share a configurable overlap span
 * between adjacent chunks.
 */

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::app_config::{ChunkModeKind, ChunkingConfig};
use crate::errors::{AppError, ConfigError, InputError};
use crate::file_utils::FileManager;

/// Approximate character-to-token ratio used by token mode.
pub const CHARS_PER_TOKEN: usize = 4;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Chunking mode with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkMode {
    /// New chunk at every heading of level <= `max_level`
    Heading {
        /// Maximum heading level to split on (1-6)
        max_level: u8,
    },
    /// Accumulate up to `max_chars` characters per chunk
    Chars {
        /// Character budget per chunk
        max_chars: usize,
        /// Characters shared between adjacent chunks
        overlap: usize,
    },
    /// Accumulate up to roughly `max_tokens` tokens per chunk
    Tokens {
        /// Approximate token budget per chunk
        max_tokens: usize,
        /// Tokens shared between adjacent chunks
        overlap: usize,
    },
}

impl Default for ChunkMode {
    fn default() -> Self {
        ChunkMode::Heading { max_level: 2 }
    }
}

impl ChunkMode {
    /// Build a chunk mode from the application chunking configuration.
    pub fn from_config(config: &ChunkingConfig) -> Self {
        match config.mode {
            ChunkModeKind::Heading => ChunkMode::Heading {
                max_level: config.max_heading_level,
            },
            ChunkModeKind::Chars => ChunkMode::Chars {
                max_chars: config.max_chars,
                overlap: config.overlap,
            },
            ChunkModeKind::Tokens => ChunkMode::Tokens {
                max_tokens: config.max_tokens,
                overlap: config.overlap,
            },
        }
    }
}

/// One ordered unit of a chunked Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownChunk {
    /// 1-based, gapless sequence index
    pub seq: usize,
    /// Section title for heading-mode chunks
    pub title: Option<String>,
    /// Chunk content, including any overlap prefix in size-based modes
    pub content: String,
}

impl MarkdownChunk {
    /// Derive the chunk file name.
    ///
    /// Zero-padded numbering makes lexical order coincide with sequence
    /// order.
    pub fn filename(&self) -> String {
        match &self.title {
            Some(title) => format!("{:03}-{}.md", self.seq, slugify(title)),
            None => format!("{:03}-chunk.md", self.seq),
        }
    }
}

/// Splits Markdown content into ordered chunks.
#[derive(Debug, Clone, Copy)]
pub struct StructuralChunker {
    mode: ChunkMode,
}

impl StructuralChunker {
    /// Create a new chunker, rejecting invalid parameters up front.
    pub fn new(mode: ChunkMode) -> Result<Self, ConfigError> {
        match mode {
            ChunkMode::Heading { max_level } if !(1..=6).contains(&max_level) => {
                Err(ConfigError::InvalidHeadingLevel(max_level))
            }
            ChunkMode::Chars { max_chars, overlap } if overlap >= max_chars => {
                Err(ConfigError::OverlapExceedsBudget {
                    overlap,
                    budget: max_chars,
                })
            }
            ChunkMode::Tokens { max_tokens, overlap } if overlap >= max_tokens => {
                Err(ConfigError::OverlapExceedsBudget {
                    overlap,
                    budget: max_tokens,
                })
            }
            _ => Ok(Self { mode }),
        }
    }

    /// Split content into ordered chunks according to the configured mode.
    pub fn chunk(&self, content: &str) -> Vec<MarkdownChunk> {
        match self.mode {
            ChunkMode::Heading { max_level } => chunk_by_heading(content, max_level),
            ChunkMode::Chars { max_chars, overlap } => {
                size_chunks(chunk_by_size(content, max_chars, overlap))
            }
            ChunkMode::Tokens { max_tokens, overlap } => size_chunks(chunk_by_size(
                content,
                max_tokens * CHARS_PER_TOKEN,
                overlap * CHARS_PER_TOKEN,
            )),
        }
    }

    /// Chunk a Markdown file and save the chunks under `output_dir`.
    pub fn chunk_file(&self, input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        if !FileManager::file_exists(input) {
            return Err(InputError::NotFound(input.to_path_buf()).into());
        }
        let content =
            FileManager::read_to_string(input).map_err(|e| InputError::Unreadable {
                path: input.to_path_buf(),
                detail: e.to_string(),
            })?;

        let chunks = self.chunk(&content);
        info!("Split {:?} into {} chunk(s)", input, chunks.len());
        self.save_chunks(&chunks, output_dir)
    }

    /// Save chunks to individual files, returning the written paths in order.
    pub fn save_chunks(
        &self,
        chunks: &[MarkdownChunk],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, AppError> {
        FileManager::ensure_dir(output_dir).map_err(AppError::from)?;

        let mut written = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let path = output_dir.join(chunk.filename());
            let body = match &chunk.title {
                // Make the section title visible when the content itself
                // does not start with a heading (the preface chunk)
                Some(title) if !chunk.content.starts_with('#') => {
                    format!("# {}\n\n{}", title, chunk.content)
                }
                _ => chunk.content.clone(),
            };
            FileManager::write_to_file(&path, &body).map_err(AppError::from)?;
            info!("Created: {:?}", path);
            written.push(path);
        }

        Ok(written)
    }
}

/// Parse a heading line of level <= `max_level`, returning its title.
fn heading_of(line: &str, max_level: u8) -> Option<&str> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > max_level as usize {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    Some(title)
}

fn chunk_by_heading(content: &str, max_level: u8) -> Vec<MarkdownChunk> {
    let mut sections: Vec<(String, String)> = Vec::new();
    let mut current_title: Option<String> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    let flush = |title: Option<String>, lines: &[&str], sections: &mut Vec<(String, String)>| {
        if lines.is_empty() {
            return;
        }
        let text = lines.join("\n");
        match title {
            Some(t) => sections.push((t, text)),
            // Content before the first qualifying heading forms an initial
            // chunk only when it has substance
            None if !text.trim().is_empty() => {
                sections.push(("Introduction".to_string(), text));
            }
            None => {}
        }
    };

    for line in content.lines() {
        if let Some(title) = heading_of(line, max_level) {
            flush(current_title.take(), &current_lines, &mut sections);
            current_title = Some(title.to_string());
            current_lines = vec![line];
        } else {
            current_lines.push(line);
        }
    }
    flush(current_title.take(), &current_lines, &mut sections);

    sections
        .into_iter()
        .enumerate()
        .map(|(i, (title, content))| MarkdownChunk {
            seq: i + 1,
            title: Some(title),
            content,
        })
        .collect()
}

/// Split content by character budget with paragraph-aware cuts and overlap.
///
/// The cut point backs up to the nearest blank line inside a lookback
/// window of one fifth of the budget; without one, the cut is the hard
/// character limit. The next chunk starts `overlap` characters before the
/// cut, snapped forward onto a word boundary when the overlap span
/// contains whitespace. All positions are clamped to UTF-8 character
/// boundaries.
fn chunk_by_size(content: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let len = content.len();
    let lookback = (max_chars / 5).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = floor_char_boundary(content, (start + max_chars).min(len));

        if end < len {
            let search_start = floor_char_boundary(content, end.saturating_sub(lookback)).max(start);
            if let Some(pos) = content[search_start..end].rfind("\n\n") {
                end = search_start + pos + 2;
            }
        }

        chunks.push(content[start..end].to_string());
        if end >= len {
            break;
        }

        let mut next = floor_char_boundary(content, end.saturating_sub(overlap));
        if next <= start {
            // Overlap never reaches back past the current chunk's start
            next = end;
        } else if let Some((pos, ch)) = content[next..end]
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
        {
            let candidate = next + pos + ch.len_utf8();
            if candidate < end {
                next = candidate;
            }
        }
        start = next;
    }

    chunks
}

fn size_chunks(parts: Vec<String>) -> Vec<MarkdownChunk> {
    parts
        .into_iter()
        .enumerate()
        .map(|(i, content)| MarkdownChunk {
            seq: i + 1,
            title: None,
            content,
        })
        .collect()
}

/// Largest index <= `index` that lies on a character boundary.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut idx = index;
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Sanitize a section title for use in a file name.
fn slugify(title: &str) -> String {
    let cleaned = NON_WORD.replace_all(title, "");
    let dashed = DASH_RUN.replace_all(cleaned.trim(), "-");
    let slug: String = dashed.chars().take(50).collect();
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}
