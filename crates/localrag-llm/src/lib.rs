//! localrag-llm
//!
//! Answer generation over the OpenAI-compatible `/chat/completions` endpoint.
pub mod openai;

pub use openai::OpenAiChat;
