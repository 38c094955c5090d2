//! localrag-pipeline
//!
//! Query orchestration: ingest, chunk and embed documents once, then answer
//! questions from the best-matching passages. Vector search degrades to
//! keyword search when no query embedding is available, and generated answers
//! degrade to a templated summary when the answer provider fails.
pub mod pipeline;
pub mod prompt;

pub use pipeline::{EmbedOptions, IndexMode, InitReport, RagPipeline};
pub use prompt::{build_context, build_prompt, format_fallback_answer, NO_INFORMATION_FALLBACK, NO_RESULTS_ANSWER};
