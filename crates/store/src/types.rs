//! Storage record definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrihelp_core::{AppError, AppResult};

/// One previously answered query.
///
/// The pair (`query_lower`, `language`) is unique: at most one cached answer
/// exists per distinct normalized query per language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAnswer {
    /// Row identifier
    pub id: i64,

    /// Original query text as submitted
    pub query: String,

    /// Normalized (lowercased, trimmed) query text
    pub query_lower: String,

    /// Language code (e.g., "en", "hi", "te", "mixed")
    pub language: String,

    /// Generated answer text
    pub answer: String,

    /// Detected topic category
    pub category: String,

    /// Number of times this answer was served (>= 1)
    pub hit_count: u32,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last served or updated
    pub updated_at: DateTime<Utc>,
}

/// A cache entry about to be written on a cache miss.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub query: String,
    pub query_lower: String,
    pub language: String,
    pub answer: String,
    pub category: String,
}

/// A static reference document used to enrich generated answers.
///
/// Snippets are provisioned out-of-band (seed data) and read-only from the
/// pipeline's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSnippet {
    /// Row identifier
    pub id: i64,

    /// Topic category this snippet belongs to
    pub category: String,

    /// Snippet title
    pub title: String,

    /// Body text
    pub content: String,

    /// Search keywords
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Language code
    pub language: String,

    /// When the snippet was seeded
    pub created_at: DateTime<Utc>,
}

/// A knowledge snippet about to be seeded.
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub category: String,
    pub title: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub language: String,
}

/// User judgment on a served answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Negative,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Positive => "positive",
            FeedbackKind::Negative => "negative",
        }
    }

    /// Parse a caller-supplied feedback value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "positive" => Ok(FeedbackKind::Positive),
            "negative" => Ok(FeedbackKind::Negative),
            other => Err(AppError::Validation(format!(
                "Feedback must be 'positive' or 'negative', got '{}'",
                other
            ))),
        }
    }
}

/// General app feedback record (star rating plus free text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppFeedback {
    /// Row identifier
    pub id: i64,

    /// Star rating in 1..=5, if given
    pub rating: Option<u8>,

    /// Free-text message
    pub message: String,

    /// Page tag the feedback was submitted from
    pub page: Option<String>,

    /// When the feedback was recorded
    pub created_at: DateTime<Utc>,
}

/// Aggregate statistics over the query cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of distinct cached answers
    pub entries: u64,

    /// Sum of hit counters across all entries
    pub total_hits: u64,

    /// Most-served entries, highest hit count first
    pub top_entries: Vec<TopEntry>,
}

/// One row of the most-served listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopEntry {
    pub query: String,
    pub language: String,
    pub hit_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_kind_roundtrip() {
        assert_eq!(
            FeedbackKind::parse("positive").unwrap(),
            FeedbackKind::Positive
        );
        assert_eq!(
            FeedbackKind::parse("negative").unwrap(),
            FeedbackKind::Negative
        );
        assert_eq!(FeedbackKind::Positive.as_str(), "positive");
    }

    #[test]
    fn test_feedback_kind_rejects_unknown() {
        let err = FeedbackKind::parse("meh").unwrap_err();
        assert!(err.is_validation());
    }
}
