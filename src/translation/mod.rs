/*!
 * Translation services.
 *
 * This module drives context-aware translation of chunked documents:
 * - `dictionary`: terminology dictionary parsing and prompt rendering
 * - `request`: provider-agnostic request composition
 * - `orchestrator`: per-chunk state machine and directory processing
 */

pub mod dictionary;
pub mod orchestrator;
pub mod request;

pub use dictionary::TerminologyDictionary;
pub use orchestrator::{ChunkOutcome, ChunkState, OrchestratorOptions, RunSummary, TranslationOrchestrator};
pub use request::TranslationRequest;
