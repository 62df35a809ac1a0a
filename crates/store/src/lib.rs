//! Storage layer for the AgriHelp service.
//!
//! Provides the `Store` trait over the query cache, knowledge snippets, and
//! feedback tables, with SQLite and no-op backends selected at startup.

pub mod factory;
pub mod null;
pub mod seed;
pub mod sqlite;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use factory::create_store;
pub use null::NullStore;
pub use sqlite::SqliteStore;
pub use store::Store;
pub use types::{
    AppFeedback, CachedAnswer, CacheStats, FeedbackKind, KnowledgeSnippet, NewAnswer, NewSnippet,
    TopEntry,
};
