//! Generator provider factory.
//!
//! Creates the configured generator, or none at all: generation is an
//! opt-in enrichment and the pipeline works identically without it.

use std::sync::Arc;

use agrihelp_core::config::GeneratorConfig;
use agrihelp_core::{AppError, AppResult};

use crate::client::AnswerGenerator;
use crate::providers::OllamaGenerator;

/// Create a generator from configuration.
///
/// Returns `None` when generation is disabled; errors only on an unknown
/// provider name, which is a configuration mistake rather than a runtime
/// fault.
pub fn create_generator(config: &GeneratorConfig) -> AppResult<Option<Arc<dyn AnswerGenerator>>> {
    if !config.enabled {
        return Ok(None);
    }

    match config.provider.to_lowercase().as_str() {
        "ollama" => {
            let generator = OllamaGenerator::new(&config.endpoint, &config.model);
            tracing::info!(
                "Generator: ollama at {} (model {})",
                config.endpoint,
                config.model
            );
            Ok(Some(Arc::new(generator)))
        }
        other => Err(AppError::Config(format!(
            "Unknown generator provider: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, provider: &str) -> GeneratorConfig {
        GeneratorConfig {
            enabled,
            provider: provider.to_string(),
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_ms: 15_000,
        }
    }

    #[test]
    fn test_disabled_returns_none() {
        let generator = create_generator(&config(false, "ollama")).unwrap();
        assert!(generator.is_none());
    }

    #[test]
    fn test_create_ollama() {
        let generator = create_generator(&config(true, "ollama")).unwrap().unwrap();
        assert_eq!(generator.provider_name(), "ollama");
    }

    #[test]
    fn test_unknown_provider() {
        let result = create_generator(&config(true, "gpt9"));
        assert!(result.is_err());
    }
}
