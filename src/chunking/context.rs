/*!
 * Boundary context resolution.
 *
 * Given an ordered chunk sequence, computes the context window attached to
 * each chunk for translation: the trailing lines of the preceding chunk
 * and the leading lines of the following chunk. Context is always drawn
 * from untranslated source content, the resolver never mutates the chunk
 * sequence, and recomputation over the same inputs yields identical
 * context, which is what makes interrupted directory runs resumable.
 */

/// Context window attached to one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkContext {
    /// Trailing lines of the immediately preceding chunk's original content
    pub before: Option<String>,
    /// Leading lines of the immediately following chunk's original content
    pub after: Option<String>,
}

impl ChunkContext {
    /// Whether any context side is present.
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// Resolves boundary context over an ordered chunk sequence.
#[derive(Debug, Clone, Copy)]
pub struct ContextResolver {
    context_lines: usize,
}

impl ContextResolver {
    /// Create a resolver taking `context_lines` lines from each neighbour.
    /// Zero disables context entirely.
    pub fn new(context_lines: usize) -> Self {
        Self { context_lines }
    }

    /// Whether boundary context is enabled.
    pub fn is_enabled(&self) -> bool {
        self.context_lines > 0
    }

    /// Resolve the context window for the chunk at `index`.
    ///
    /// Boundary chunks receive only the side that exists.
    pub fn resolve<S: AsRef<str>>(&self, chunks: &[S], index: usize) -> ChunkContext {
        if self.context_lines == 0 {
            return ChunkContext::default();
        }

        let before = index
            .checked_sub(1)
            .and_then(|i| chunks.get(i))
            .map(|chunk| tail_lines(chunk.as_ref(), self.context_lines));

        let after = chunks
            .get(index + 1)
            .map(|chunk| head_lines(chunk.as_ref(), self.context_lines));

        ChunkContext { before, after }
    }

    /// Resolve context windows for every chunk in the sequence.
    pub fn resolve_all<S: AsRef<str>>(&self, chunks: &[S]) -> Vec<ChunkContext> {
        (0..chunks.len()).map(|i| self.resolve(chunks, i)).collect()
    }
}

/// Last `count` lines of `text`, joined with newlines.
fn tail_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}

/// First `count` lines of `text`, joined with newlines.
fn head_lines(text: &str, count: usize) -> String {
    text.lines().take(count).collect::<Vec<&str>>().join("\n")
}
