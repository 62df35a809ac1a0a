//! Storage abstraction over the query cache, knowledge snippets, and feedback.

use agrihelp_core::AppResult;

use crate::types::{
    AppFeedback, CachedAnswer, CacheStats, FeedbackKind, KnowledgeSnippet, NewAnswer, NewSnippet,
};

/// Trait for storage backends.
///
/// The pipeline exclusively owns creation and mutation of cached answers,
/// only reads knowledge snippets, and only creates feedback records. All
/// mutation happens through single atomic operations (increment-by-id,
/// upsert-by-key); callers never perform read-modify-write themselves.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Get the backend name (e.g., "sqlite", "none").
    fn backend_name(&self) -> &str;

    /// Whether writes actually persist anywhere.
    fn is_persistent(&self) -> bool;

    /// Look up a cached answer by (normalized query, language).
    ///
    /// Must not mutate state; recording a hit is a separate call.
    async fn cache_lookup(
        &self,
        query_lower: &str,
        language: &str,
    ) -> AppResult<Option<CachedAnswer>>;

    /// Atomically increment the hit counter and refresh the updated
    /// timestamp for the record identified by `id`.
    async fn cache_record_hit(&self, id: i64) -> AppResult<()>;

    /// Insert a new cached answer with hit counter 1.
    ///
    /// If a record for (`query_lower`, `language`) already exists, the
    /// conflict is resolved as a hit increment on the existing record and
    /// that record is returned; the uniqueness invariant always holds.
    async fn cache_insert(&self, answer: &NewAnswer) -> AppResult<CachedAnswer>;

    /// Aggregate statistics over the query cache.
    async fn cache_stats(&self) -> AppResult<CacheStats>;

    /// Retrieve up to `limit` snippets matching a category and language.
    ///
    /// Order is storage-defined, not semantically significant.
    async fn knowledge_lookup(
        &self,
        category: &str,
        language: &str,
        limit: u32,
    ) -> AppResult<Vec<KnowledgeSnippet>>;

    /// Seed one knowledge snippet.
    async fn knowledge_insert(&self, snippet: &NewSnippet) -> AppResult<()>;

    /// Number of seeded knowledge snippets.
    async fn knowledge_count(&self) -> AppResult<u64>;

    /// Record a user judgment on a served answer.
    async fn save_feedback(&self, query: &str, answer: &str, kind: FeedbackKind) -> AppResult<()>;

    /// Record general app feedback.
    async fn save_app_feedback(
        &self,
        message: &str,
        rating: Option<u8>,
        page: Option<&str>,
    ) -> AppResult<()>;

    /// Fetch recent app feedback, newest first.
    async fn recent_app_feedback(&self, limit: u32) -> AppResult<Vec<AppFeedback>>;
}
