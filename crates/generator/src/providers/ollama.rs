//! Ollama generator provider.
//!
//! Integrates with Ollama, a local LLM runtime, over its HTTP API.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use serde::{Deserialize, Serialize};

use agrihelp_core::{AppError, AppResult};

use crate::client::{AnswerGenerator, GenerateRequest};
use crate::context;

/// Sampling temperature for advisory answers; low keeps them factual.
const TEMPERATURE: f32 = 0.3;

/// Token budget per answer.
const MAX_TOKENS: u32 = 512;

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    system: String,
    options: OllamaOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Ollama-backed answer generator.
pub struct OllamaGenerator {
    /// Base URL for the Ollama API
    base_url: String,

    /// Model identifier
    model: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// Create a generator against a custom endpoint.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_ollama_request(&self, request: &GenerateRequest) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: request.query.clone(),
            system: context::system_prompt(request),
            options: OllamaOptions {
                temperature: TEMPERATURE,
                num_predict: MAX_TOKENS,
            },
            stream: false,
        }
    }
}

#[async_trait::async_trait]
impl AnswerGenerator for OllamaGenerator {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> AppResult<String> {
        tracing::debug!("Sending generation request to Ollama");

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| AppError::Generator(format!("Failed to reach Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generator(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generator(format!("Failed to parse Ollama response: {}", e)))?;

        tracing::debug!("Received generated answer from Ollama");

        Ok(ollama_response.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_creation() {
        let generator = OllamaGenerator::new("http://localhost:11434", "llama3.2");
        assert_eq!(generator.provider_name(), "ollama");
        assert_eq!(generator.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_request_conversion() {
        let generator = OllamaGenerator::new("http://localhost:11434", "llama3.2");
        let request = GenerateRequest::new("How to grow rice?", "te").with_region("Telangana");

        let ollama_req = generator.to_ollama_request(&request);
        assert_eq!(ollama_req.model, "llama3.2");
        assert_eq!(ollama_req.prompt, "How to grow rice?");
        assert!(ollama_req.system.contains("Respond in Telugu"));
        assert!(ollama_req.system.contains("Region: Telangana"));
        assert!(!ollama_req.stream);
    }
}
