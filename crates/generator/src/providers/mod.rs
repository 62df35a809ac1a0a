//! Generator provider implementations.

pub mod ollama;

pub use ollama::OllamaGenerator;
