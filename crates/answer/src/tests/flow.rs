//! End-to-end pipeline tests over real in-memory storage.

use std::sync::Arc;
use std::time::Duration;

use agrihelp_core::{AppError, AppResult};
use agrihelp_generator::{AnswerGenerator, GenerateRequest};
use agrihelp_store::{
    AppFeedback, CachedAnswer, CacheStats, FeedbackKind, KnowledgeSnippet, NewAnswer, NewSnippet,
    NullStore, SqliteStore, Store,
};

use crate::category::Category;
use crate::pipeline::{AnswerSource, AskRequest, Pipeline};
use crate::templates;

fn sqlite_pipeline() -> (Pipeline, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    (Pipeline::new(store.clone()), store)
}

#[tokio::test]
async fn test_miss_then_hit_counts() {
    let (pipeline, store) = sqlite_pipeline();
    let request = AskRequest::new("How to grow rice?");

    let first = pipeline.answer(&request).await.unwrap();
    assert_eq!(first.source, AnswerSource::Local);
    assert_eq!(first.category, Category::Crops);

    let second = pipeline.answer(&request).await.unwrap();
    assert_eq!(second.source, AnswerSource::Cache);
    assert_eq!(second.answer, first.answer);

    let cached = store
        .cache_lookup("how to grow rice?", "en")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.hit_count, 2);
}

#[tokio::test]
async fn test_normalization_shares_one_entry() {
    let (pipeline, store) = sqlite_pipeline();

    let variants = ["How to grow RICE?", "  how to grow rice?  ", "how to grow rice?"];
    let mut answers = Vec::new();
    for variant in variants {
        let result = pipeline.answer(&AskRequest::new(variant)).await.unwrap();
        answers.push(result.answer);
    }

    // All three map to the same cache key and share one cached answer
    assert_eq!(answers[0], answers[1]);
    assert_eq!(answers[1], answers[2]);

    let stats = store.cache_stats().await.unwrap();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.total_hits, 3);
}

#[tokio::test]
async fn test_empty_query_rejected() {
    let (pipeline, store) = sqlite_pipeline();

    for query in ["", "   "] {
        let err = pipeline.answer(&AskRequest::new(query)).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Query cannot be empty");
    }

    // Validation failures never reach the cache
    let stats = store.cache_stats().await.unwrap();
    assert_eq!(stats.entries, 0);
}

#[tokio::test]
async fn test_precedence_flows_through() {
    let (pipeline, _) = sqlite_pipeline();

    let result = pipeline
        .answer(&AskRequest::new("paddy worm infection"))
        .await
        .unwrap();
    assert_eq!(result.category, Category::Crops);
}

#[tokio::test]
async fn test_snippets_enrich_answer() {
    let (pipeline, store) = sqlite_pipeline();

    for i in 0..4 {
        store
            .knowledge_insert(&NewSnippet {
                category: "crops".to_string(),
                title: format!("Rice note {}", i),
                content: "Transplant in June with 20x15 cm spacing.".to_string(),
                keywords: vec!["rice".to_string()],
                language: "en".to_string(),
            })
            .await
            .unwrap();
    }

    let result = pipeline
        .answer(&AskRequest::new("How to grow rice?"))
        .await
        .unwrap();

    assert!(result.answer.starts_with(templates::intro(Category::Crops)));
    assert!(result.answer.contains("1. Rice note 0"));
    assert!(result.answer.contains("3. Rice note 2"));
    assert!(!result.answer.contains("4. Rice note 3"));
}

#[tokio::test]
async fn test_auto_language_detection_keys_cache() {
    let (pipeline, store) = sqlite_pipeline();

    let request = AskRequest::new("धान कब बोएं").with_language("auto");
    let result = pipeline.answer(&request).await.unwrap();

    assert_eq!(result.language, "hi");
    assert!(store
        .cache_lookup("धान कब बोएं", "hi")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_null_store_never_caches() {
    let pipeline = Pipeline::new(Arc::new(NullStore::new()));
    let request = AskRequest::new("How to grow rice?");

    let first = pipeline.answer(&request).await.unwrap();
    let second = pipeline.answer(&request).await.unwrap();

    assert_eq!(first.source, AnswerSource::Local);
    assert_eq!(second.source, AnswerSource::Local);
    assert_eq!(first.answer, second.answer);
}

/// Store whose every operation fails, simulating storage unavailability.
struct FailingStore;

#[async_trait::async_trait]
impl Store for FailingStore {
    fn backend_name(&self) -> &str {
        "failing"
    }

    fn is_persistent(&self) -> bool {
        true
    }

    async fn cache_lookup(&self, _: &str, _: &str) -> AppResult<Option<CachedAnswer>> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn cache_record_hit(&self, _: i64) -> AppResult<()> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn cache_insert(&self, _: &NewAnswer) -> AppResult<CachedAnswer> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn cache_stats(&self) -> AppResult<CacheStats> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn knowledge_lookup(&self, _: &str, _: &str, _: u32) -> AppResult<Vec<KnowledgeSnippet>> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn knowledge_insert(&self, _: &NewSnippet) -> AppResult<()> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn knowledge_count(&self) -> AppResult<u64> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn save_feedback(&self, _: &str, _: &str, _: FeedbackKind) -> AppResult<()> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn save_app_feedback(&self, _: &str, _: Option<u8>, _: Option<&str>) -> AppResult<()> {
        Err(AppError::Store("storage unreachable".to_string()))
    }

    async fn recent_app_feedback(&self, _: u32) -> AppResult<Vec<AppFeedback>> {
        Err(AppError::Store("storage unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_storage_failure_degrades_to_template_answer() {
    let pipeline = Pipeline::new(Arc::new(FailingStore));

    let result = pipeline
        .answer(&AskRequest::new("aphid attack on mustard"))
        .await
        .unwrap();

    // The request still succeeds, on the no-snippet fallback template
    assert_eq!(result.source, AnswerSource::Local);
    assert_eq!(result.category, Category::Pests);
    assert_eq!(
        result.answer,
        templates::fallback_answer(Category::Pests, "aphid attack on mustard").unwrap()
    );
}

/// Generator returning a fixed answer.
struct StubGenerator(&'static str);

#[async_trait::async_trait]
impl AnswerGenerator for StubGenerator {
    fn provider_name(&self) -> &str {
        "stub"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn generate(&self, _: &GenerateRequest) -> AppResult<String> {
        Ok(self.0.to_string())
    }
}

/// Generator that always fails.
struct DownGenerator;

#[async_trait::async_trait]
impl AnswerGenerator for DownGenerator {
    fn provider_name(&self) -> &str {
        "down"
    }

    async fn is_available(&self) -> bool {
        false
    }

    async fn generate(&self, _: &GenerateRequest) -> AppResult<String> {
        Err(AppError::Generator("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_generated_answer_is_cached() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let pipeline = Pipeline::new(store.clone()).with_generator(
        Arc::new(StubGenerator("Sow DSR paddy after 70 mm of rain.")),
        Duration::from_secs(5),
    );

    let request = AskRequest::new("When to sow paddy?");
    let first = pipeline.answer(&request).await.unwrap();
    assert_eq!(first.source, AnswerSource::Local);
    assert_eq!(first.answer, "Sow DSR paddy after 70 mm of rain.");

    let second = pipeline.answer(&request).await.unwrap();
    assert_eq!(second.source, AnswerSource::Cache);
    assert_eq!(second.answer, first.answer);
}

#[tokio::test]
async fn test_down_generator_falls_back_to_templates() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let pipeline = Pipeline::new(store)
        .with_generator(Arc::new(DownGenerator), Duration::from_secs(5));

    let result = pipeline
        .answer(&AskRequest::new("When to sow paddy?"))
        .await
        .unwrap();

    assert_eq!(result.source, AnswerSource::Local);
    assert_eq!(
        result.answer,
        templates::fallback_answer(Category::Crops, "When to sow paddy?").unwrap()
    );
}

#[tokio::test]
async fn test_empty_generation_falls_back() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let pipeline = Pipeline::new(store)
        .with_generator(Arc::new(StubGenerator("   ")), Duration::from_secs(5));

    let result = pipeline
        .answer(&AskRequest::new("When to sow paddy?"))
        .await
        .unwrap();

    assert_eq!(
        result.answer,
        templates::fallback_answer(Category::Crops, "When to sow paddy?").unwrap()
    );
}
