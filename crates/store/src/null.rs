//! No-op storage backend.
//!
//! Selected when no real backend is available or configured. Lookups always
//! miss, writes vanish, and the rest of the pipeline is unaware that caching
//! is disabled.

use chrono::Utc;

use agrihelp_core::AppResult;

use crate::store::Store;
use crate::types::{
    AppFeedback, CachedAnswer, CacheStats, FeedbackKind, KnowledgeSnippet, NewAnswer, NewSnippet,
};

/// Storage backend that persists nothing.
#[derive(Debug, Default)]
pub struct NullStore;

impl NullStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Store for NullStore {
    fn backend_name(&self) -> &str {
        "none"
    }

    fn is_persistent(&self) -> bool {
        false
    }

    async fn cache_lookup(
        &self,
        _query_lower: &str,
        _language: &str,
    ) -> AppResult<Option<CachedAnswer>> {
        Ok(None)
    }

    async fn cache_record_hit(&self, _id: i64) -> AppResult<()> {
        Ok(())
    }

    async fn cache_insert(&self, answer: &NewAnswer) -> AppResult<CachedAnswer> {
        // Hand back a record shaped like a real insert so callers don't care
        // which backend they're talking to.
        let now = Utc::now();
        Ok(CachedAnswer {
            id: 0,
            query: answer.query.clone(),
            query_lower: answer.query_lower.clone(),
            language: answer.language.clone(),
            answer: answer.answer.clone(),
            category: answer.category.clone(),
            hit_count: 1,
            created_at: now,
            updated_at: now,
        })
    }

    async fn cache_stats(&self) -> AppResult<CacheStats> {
        Ok(CacheStats {
            entries: 0,
            total_hits: 0,
            top_entries: Vec::new(),
        })
    }

    async fn knowledge_lookup(
        &self,
        _category: &str,
        _language: &str,
        _limit: u32,
    ) -> AppResult<Vec<KnowledgeSnippet>> {
        Ok(Vec::new())
    }

    async fn knowledge_insert(&self, _snippet: &NewSnippet) -> AppResult<()> {
        Ok(())
    }

    async fn knowledge_count(&self) -> AppResult<u64> {
        Ok(0)
    }

    async fn save_feedback(
        &self,
        _query: &str,
        _answer: &str,
        _kind: FeedbackKind,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn save_app_feedback(
        &self,
        _message: &str,
        _rating: Option<u8>,
        _page: Option<&str>,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn recent_app_feedback(&self, _limit: u32) -> AppResult<Vec<AppFeedback>> {
        Ok(Vec::new())
    }
}
