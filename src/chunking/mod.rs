/*!
 * Document chunking.
 *
 * This module splits source documents into ordered, bounded units:
 * - `page`: page-range splitting of PDF files
 * - `structural`: heading- or size-based splitting of Markdown documents
 * - `context`: boundary context resolution across an ordered chunk sequence
 */

pub mod context;
pub mod page;
pub mod structural;

pub use context::{ChunkContext, ContextResolver};
pub use page::{PageChunker, PageRange};
pub use structural::{ChunkMode, MarkdownChunk, StructuralChunker};
