//! Optional generative-answer enrichment.
//!
//! Provides the `AnswerGenerator` trait, the prompt-context assembly, and
//! the Ollama provider. Disabled by default; the deterministic template
//! synthesizer is always the fallback.

pub mod client;
pub mod context;
pub mod factory;
pub mod providers;

// Re-export commonly used types
pub use client::{AnswerGenerator, GenerateRequest};
pub use factory::create_generator;
pub use providers::OllamaGenerator;
