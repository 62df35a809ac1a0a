//! Query answering pipeline.
//!
//! Orchestrates one request through validation, cache check, knowledge
//! fetch, synthesis, and write-through. The pipeline holds no mutable
//! state of its own; everything durable lives behind the `Store` trait.
//!
//! Degradation policy: a failed or timed-out cache lookup is a miss, a
//! failed knowledge fetch found nothing, a failed cache write is a no-op,
//! and a failed generation falls through to template synthesis. Only
//! validation failures and genuinely unexpected faults surface as errors.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use agrihelp_core::{AppError, AppResult};
use agrihelp_generator::{AnswerGenerator, GenerateRequest};
use agrihelp_store::{CachedAnswer, KnowledgeSnippet, NewAnswer, Store};

use crate::category::{self, Category};
use crate::lang;
use crate::synth;

/// Snippets requested from the knowledge store per query.
pub const KNOWLEDGE_FETCH_LIMIT: u32 = 5;

/// User-safe answer returned alongside an "error" source tag when the
/// pipeline hits an unexpected fault.
pub const ERROR_ANSWER: &str = "Sorry, we could not process your question right now. \
Please try again in a little while, or contact your nearest Krishi Vigyan Kendra \
for immediate help.";

/// One question from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question text
    pub query: String,

    /// Language code; "auto" runs detection on the query
    #[serde(default = "default_language")]
    pub language: String,

    /// Indian state or region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Season override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    /// Approximate latitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    /// Approximate longitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

fn default_language() -> String {
    "en".to_string()
}

impl AskRequest {
    /// Create a request with the default language.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: default_language(),
            region: None,
            season: None,
            lat: None,
            lon: None,
        }
    }

    /// Set the language code.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Where a served answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Previously computed and cached
    Cache,
    /// Computed for this request
    Local,
    /// Apologetic fallback after an unexpected fault
    Error,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Cache => "cache",
            AnswerSource::Local => "local",
            AnswerSource::Error => "error",
        }
    }
}

/// The pipeline's answer to one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineAnswer {
    pub answer: String,
    pub source: AnswerSource,
    pub category: Category,
    pub language: String,
}

/// Query answering pipeline.
pub struct Pipeline {
    store: Arc<dyn Store>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    op_timeout: Duration,
    generator_timeout: Duration,
}

impl Pipeline {
    /// Create a pipeline over a store, with generation disabled.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            generator: None,
            op_timeout: Duration::from_millis(2_000),
            generator_timeout: Duration::from_millis(15_000),
        }
    }

    /// Attach a generative-answer provider.
    pub fn with_generator(
        mut self,
        generator: Arc<dyn AnswerGenerator>,
        generator_timeout: Duration,
    ) -> Self {
        self.generator = Some(generator);
        self.generator_timeout = generator_timeout;
        self
    }

    /// Bound each storage and knowledge operation.
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    /// The store this pipeline runs against.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Answer one question.
    ///
    /// Flow: validate → normalize → detect category → cache lookup →
    /// on hit, record the hit and serve the cached answer; on miss, fetch
    /// snippets, synthesize (or generate), write through, and serve.
    pub async fn answer(&self, request: &AskRequest) -> AppResult<PipelineAnswer> {
        // Validating
        let trimmed = request.query.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation("Query cannot be empty".to_string()));
        }

        let language = lang::resolve_language(&request.language, &request.query);
        let normalized = lang::normalize_query(&request.query);
        let detected = category::detect(&normalized);

        tracing::debug!(
            category = detected.as_str(),
            language = language.as_str(),
            "Processing query"
        );

        // CacheCheck
        if let Some(hit) = self.lookup_cached(&normalized, &language).await {
            self.record_hit(&hit).await;

            let category = Category::parse(&hit.category).unwrap_or(detected);
            tracing::info!(category = category.as_str(), "Cache hit");

            return Ok(PipelineAnswer {
                answer: hit.answer,
                source: AnswerSource::Cache,
                category,
                language,
            });
        }

        // CacheMiss → KnowledgeFetch
        let snippets = self.fetch_snippets(detected, &language).await;

        // Synthesize, preferring a generated answer when a provider is up
        let answer = match self.try_generate(request, trimmed, &language).await {
            Some(generated) => generated,
            None => synth::synthesize(detected, trimmed, &snippets)?,
        };

        // CacheWrite (best-effort; the caller gets the answer regardless)
        self.write_through(NewAnswer {
            query: trimmed.to_string(),
            query_lower: normalized,
            language: language.clone(),
            answer: answer.clone(),
            category: detected.as_str().to_string(),
        })
        .await;

        tracing::info!(category = detected.as_str(), "Answer generated");

        Ok(PipelineAnswer {
            answer,
            source: AnswerSource::Local,
            category: detected,
            language,
        })
    }

    /// Cache lookup; failure or timeout degrades to a miss.
    async fn lookup_cached(&self, normalized: &str, language: &str) -> Option<CachedAnswer> {
        match timeout(self.op_timeout, self.store.cache_lookup(normalized, language)).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                tracing::warn!("Cache lookup failed, treating as miss: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!("Cache lookup timed out, treating as miss");
                None
            }
        }
    }

    /// Best-effort hit counting.
    async fn record_hit(&self, hit: &CachedAnswer) {
        match timeout(self.op_timeout, self.store.cache_record_hit(hit.id)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Failed to record cache hit: {}", e),
            Err(_) => tracing::warn!("Recording cache hit timed out"),
        }
    }

    /// Knowledge fetch; failure or timeout degrades to "found nothing".
    async fn fetch_snippets(&self, category: Category, language: &str) -> Vec<KnowledgeSnippet> {
        match timeout(
            self.op_timeout,
            self.store
                .knowledge_lookup(category.as_str(), language, KNOWLEDGE_FETCH_LIMIT),
        )
        .await
        {
            Ok(Ok(snippets)) => snippets,
            Ok(Err(e)) => {
                tracing::warn!("Knowledge lookup failed, continuing without snippets: {}", e);
                Vec::new()
            }
            Err(_) => {
                tracing::warn!("Knowledge lookup timed out, continuing without snippets");
                Vec::new()
            }
        }
    }

    /// Optional generation step; any failure falls through to synthesis.
    async fn try_generate(
        &self,
        request: &AskRequest,
        query: &str,
        language: &str,
    ) -> Option<String> {
        let generator = self.generator.as_ref()?;

        let mut gen_request = GenerateRequest::new(query, language);
        gen_request.region = request.region.clone();
        gen_request.season = request.season.clone();
        gen_request.lat = request.lat;
        gen_request.lon = request.lon;

        match timeout(self.generator_timeout, generator.generate(&gen_request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
            Ok(Ok(_)) => {
                tracing::debug!("Generator returned empty answer, using templates");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!("Generation failed, using templates: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!("Generation timed out, using templates");
                None
            }
        }
    }

    /// Best-effort write-through to the cache.
    async fn write_through(&self, answer: NewAnswer) {
        match timeout(self.op_timeout, self.store.cache_insert(&answer)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::warn!("Cache write failed, answer served uncached: {}", e),
            Err(_) => tracing::warn!("Cache write timed out, answer served uncached"),
        }
    }
}
