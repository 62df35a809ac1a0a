//! SQLite-backed storage.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;

use agrihelp_core::{AppError, AppResult};

use crate::store::Store;
use crate::types::{
    AppFeedback, CachedAnswer, CacheStats, FeedbackKind, KnowledgeSnippet, NewAnswer, NewSnippet,
    TopEntry,
};

/// SQLite storage backend.
///
/// rusqlite connections are synchronous, so the connection sits behind an
/// async mutex; every operation is a single short statement and the lock is
/// never held across an await point.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and ensure the schema.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Store(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Store(format!("Failed to open SQLite database: {}", e)))?;

        init_schema(&conn)?;

        tracing::debug!("Opened SQLite store at {:?}", db_path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database. Used by tests and the `ask` CLI command
    /// when no database is configured.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Store(format!("Failed to open in-memory database: {}", e)))?;

        init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Create tables and indexes.
fn init_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS query_cache (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            query TEXT NOT NULL,
            query_lower TEXT NOT NULL,
            language TEXT NOT NULL DEFAULT 'en',
            answer TEXT NOT NULL,
            category TEXT NOT NULL,
            hit_count INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (query_lower, language)
        );

        CREATE TABLE IF NOT EXISTS knowledge (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            keywords TEXT NOT NULL DEFAULT '[]',
            language TEXT NOT NULL DEFAULT 'en',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_knowledge_category
            ON knowledge(category, language);

        CREATE TABLE IF NOT EXISTS user_feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            query TEXT NOT NULL,
            answer TEXT NOT NULL,
            feedback TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS app_feedback (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rating INTEGER,
            message TEXT NOT NULL,
            page TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .map_err(|e| AppError::Store(format!("Failed to create tables: {}", e)))?;

    Ok(())
}

/// Parse an RFC 3339 timestamp column.
fn parse_timestamp(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Map a query_cache row in column order
/// (id, query, query_lower, language, answer, category, hit_count, created_at, updated_at).
fn row_to_cached_answer(row: &Row<'_>) -> rusqlite::Result<CachedAnswer> {
    Ok(CachedAnswer {
        id: row.get(0)?,
        query: row.get(1)?,
        query_lower: row.get(2)?,
        language: row.get(3)?,
        answer: row.get(4)?,
        category: row.get(5)?,
        hit_count: row.get::<_, i64>(6)? as u32,
        created_at: parse_timestamp(&row.get::<_, String>(7)?)?,
        updated_at: parse_timestamp(&row.get::<_, String>(8)?)?,
    })
}

const CACHED_ANSWER_COLUMNS: &str =
    "id, query, query_lower, language, answer, category, hit_count, created_at, updated_at";

#[async_trait::async_trait]
impl Store for SqliteStore {
    fn backend_name(&self) -> &str {
        "sqlite"
    }

    fn is_persistent(&self) -> bool {
        true
    }

    async fn cache_lookup(
        &self,
        query_lower: &str,
        language: &str,
    ) -> AppResult<Option<CachedAnswer>> {
        let conn = self.conn.lock().await;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM query_cache WHERE query_lower = ?1 AND language = ?2",
                    CACHED_ANSWER_COLUMNS
                ),
                params![query_lower, language],
                row_to_cached_answer,
            )
            .optional()
            .map_err(|e| AppError::Store(format!("Cache lookup failed: {}", e)))?;

        Ok(row)
    }

    async fn cache_record_hit(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().await;

        let updated = conn
            .execute(
                "UPDATE query_cache SET hit_count = hit_count + 1, updated_at = ?1 WHERE id = ?2",
                params![Utc::now().to_rfc3339(), id],
            )
            .map_err(|e| AppError::Store(format!("Failed to record cache hit: {}", e)))?;

        if updated == 0 {
            return Err(AppError::Store(format!("No cache entry with id {}", id)));
        }

        Ok(())
    }

    async fn cache_insert(&self, answer: &NewAnswer) -> AppResult<CachedAnswer> {
        let conn = self.conn.lock().await;
        let now = Utc::now().to_rfc3339();

        // Two concurrent misses for the same key race here; the conflict
        // clause turns the loser's insert into a hit increment on the row
        // the winner created. The stored answer is never overwritten.
        conn.execute(
            r#"
            INSERT INTO query_cache
                (query, query_lower, language, answer, category, hit_count, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            ON CONFLICT (query_lower, language) DO UPDATE SET
                hit_count = hit_count + 1,
                updated_at = excluded.updated_at
            "#,
            params![
                answer.query,
                answer.query_lower,
                answer.language,
                answer.answer,
                answer.category,
                now,
            ],
        )
        .map_err(|e| AppError::Store(format!("Failed to insert cache entry: {}", e)))?;

        conn.query_row(
            &format!(
                "SELECT {} FROM query_cache WHERE query_lower = ?1 AND language = ?2",
                CACHED_ANSWER_COLUMNS
            ),
            params![answer.query_lower, answer.language],
            row_to_cached_answer,
        )
        .map_err(|e| AppError::Store(format!("Failed to read back cache entry: {}", e)))
    }

    async fn cache_stats(&self) -> AppResult<CacheStats> {
        let conn = self.conn.lock().await;

        let (entries, total_hits): (u64, u64) = conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(hit_count), 0) FROM query_cache",
                [],
                |row| Ok((row.get::<_, i64>(0)? as u64, row.get::<_, i64>(1)? as u64)),
            )
            .map_err(|e| AppError::Store(format!("Failed to compute cache stats: {}", e)))?;

        let mut stmt = conn
            .prepare(
                "SELECT query, language, hit_count FROM query_cache
                 ORDER BY hit_count DESC, updated_at DESC LIMIT 5",
            )
            .map_err(|e| AppError::Store(format!("Failed to prepare stats query: {}", e)))?;

        let top_entries = stmt
            .query_map([], |row| {
                Ok(TopEntry {
                    query: row.get(0)?,
                    language: row.get(1)?,
                    hit_count: row.get::<_, i64>(2)? as u32,
                })
            })
            .map_err(|e| AppError::Store(format!("Failed to list top entries: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(CacheStats {
            entries,
            total_hits,
            top_entries,
        })
    }

    async fn knowledge_lookup(
        &self,
        category: &str,
        language: &str,
        limit: u32,
    ) -> AppResult<Vec<KnowledgeSnippet>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(
                "SELECT id, category, title, content, keywords, language, created_at
                 FROM knowledge WHERE category = ?1 AND language = ?2 LIMIT ?3",
            )
            .map_err(|e| AppError::Knowledge(format!("Failed to prepare lookup: {}", e)))?;

        let snippets = stmt
            .query_map(params![category, language, limit], |row| {
                let keywords_json: String = row.get(4)?;
                let keywords: Vec<String> =
                    serde_json::from_str(&keywords_json).unwrap_or_default();

                Ok(KnowledgeSnippet {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    title: row.get(2)?,
                    content: row.get(3)?,
                    keywords,
                    language: row.get(5)?,
                    created_at: parse_timestamp(&row.get::<_, String>(6)?)?,
                })
            })
            .map_err(|e| AppError::Knowledge(format!("Failed to query snippets: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(snippets)
    }

    async fn knowledge_insert(&self, snippet: &NewSnippet) -> AppResult<()> {
        let conn = self.conn.lock().await;

        let keywords_json = serde_json::to_string(&snippet.keywords)
            .map_err(|e| AppError::Knowledge(format!("Failed to serialize keywords: {}", e)))?;

        conn.execute(
            "INSERT INTO knowledge (category, title, content, keywords, language, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                snippet.category,
                snippet.title,
                snippet.content,
                keywords_json,
                snippet.language,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| AppError::Knowledge(format!("Failed to insert snippet: {}", e)))?;

        Ok(())
    }

    async fn knowledge_count(&self) -> AppResult<u64> {
        let conn = self.conn.lock().await;

        conn.query_row("SELECT COUNT(*) FROM knowledge", [], |row| {
            row.get::<_, i64>(0).map(|v| v as u64)
        })
        .map_err(|e| AppError::Knowledge(format!("Failed to count snippets: {}", e)))
    }

    async fn save_feedback(&self, query: &str, answer: &str, kind: FeedbackKind) -> AppResult<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO user_feedback (query, answer, feedback, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![query, answer, kind.as_str(), Utc::now().to_rfc3339()],
        )
        .map_err(|e| AppError::Store(format!("Failed to save feedback: {}", e)))?;

        Ok(())
    }

    async fn save_app_feedback(
        &self,
        message: &str,
        rating: Option<u8>,
        page: Option<&str>,
    ) -> AppResult<()> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO app_feedback (rating, message, page, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                rating.map(|r| r as i64),
                message,
                page,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| AppError::Store(format!("Failed to save app feedback: {}", e)))?;

        Ok(())
    }

    async fn recent_app_feedback(&self, limit: u32) -> AppResult<Vec<AppFeedback>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(
                "SELECT id, rating, message, page, created_at FROM app_feedback
                 ORDER BY id DESC LIMIT ?1",
            )
            .map_err(|e| AppError::Store(format!("Failed to prepare feedback query: {}", e)))?;

        let items = stmt
            .query_map(params![limit], |row| {
                Ok(AppFeedback {
                    id: row.get(0)?,
                    rating: row.get::<_, Option<i64>>(1)?.map(|r| r as u8),
                    message: row.get(2)?,
                    page: row.get(3)?,
                    created_at: parse_timestamp(&row.get::<_, String>(4)?)?,
                })
            })
            .map_err(|e| AppError::Store(format!("Failed to query app feedback: {}", e)))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(items)
    }
}
