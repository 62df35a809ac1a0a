//! Generator abstraction and request types.
//!
//! A generator is an optional enrichment: on a cache miss the pipeline may
//! ask it for a model-written answer before falling back to deterministic
//! template synthesis. Every failure path degrades; no request ever fails
//! because a generator is down.

use serde::{Deserialize, Serialize};

use agrihelp_core::AppResult;

/// A generation request carrying the query and its farming context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The farmer's question
    pub query: String,

    /// Response language code ("en", "hi", "te", ..., "mixed")
    pub language: String,

    /// Indian state or region, if the caller shared it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Season override; current Indian season is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    /// Approximate latitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Approximate longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl GenerateRequest {
    /// Create a request with required fields.
    pub fn new(query: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: language.into(),
            region: None,
            season: None,
            lat: None,
            lon: None,
        }
    }

    /// Set the caller's region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the season.
    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    /// Set the approximate location.
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }
}

/// Trait for generative-answer providers.
#[async_trait::async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Get the provider name (e.g., "ollama").
    fn provider_name(&self) -> &str;

    /// Cheap reachability probe; used by the health endpoint.
    async fn is_available(&self) -> bool;

    /// Produce an answer for the request.
    ///
    /// Returns the generated text; an empty or whitespace-only result is
    /// treated by callers the same as a failure.
    async fn generate(&self, request: &GenerateRequest) -> AppResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerateRequest::new("How to grow rice?", "en")
            .with_region("Telangana")
            .with_season("kharif")
            .with_location(17.38, 78.48);

        assert_eq!(request.query, "How to grow rice?");
        assert_eq!(request.region.as_deref(), Some("Telangana"));
        assert_eq!(request.season.as_deref(), Some("kharif"));
        assert_eq!(request.lat, Some(17.38));
    }
}
