//! Storage backend factory.
//!
//! Probes the configured backend at startup and selects one of several
//! interchangeable store implementations behind the `Store` trait. When
//! nothing is available the null store is selected, so the pipeline runs
//! with caching disabled instead of failing.

use std::sync::Arc;

use agrihelp_core::AppConfig;

use crate::null::NullStore;
use crate::sqlite::SqliteStore;
use crate::store::Store;

/// Create a storage backend from configuration.
///
/// Selection order:
/// 1. `sqlite`: open the configured database file; schema is created on
///    first open.
/// 2. `none`: explicit no-op store.
///
/// A backend that fails to initialize degrades to the null store with a
/// warning rather than aborting startup.
pub fn create_store(config: &AppConfig) -> Arc<dyn Store> {
    match config.database.backend.as_str() {
        "sqlite" => match SqliteStore::open(&config.database.path) {
            Ok(store) => {
                tracing::info!("Storage: SQLite at {:?}", config.database.path);
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    "Storage: SQLite unavailable ({}); caching and feedback disabled",
                    e
                );
                Arc::new(NullStore::new())
            }
        },
        "none" => {
            tracing::info!("Storage: no backend configured; caching and feedback disabled");
            Arc::new(NullStore::new())
        }
        other => {
            tracing::warn!(
                "Storage: unknown backend '{}'; caching and feedback disabled",
                other
            );
            Arc::new(NullStore::new())
        }
    }
}
