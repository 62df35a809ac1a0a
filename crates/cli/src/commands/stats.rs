//! Stats command handler.
//!
//! Displays query cache and knowledge statistics.

use clap::Args;

use agrihelp_core::{config::AppConfig, AppError, AppResult};
use agrihelp_store::{create_store, Store};

/// Show query cache statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    /// Execute the stats command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let store = create_store(config);
        let stats = store.cache_stats().await?;
        let snippets = store.knowledge_count().await?;

        if self.json {
            let output = serde_json::json!({
                "backend": store.backend_name(),
                "cachedAnswers": stats.entries,
                "totalHits": stats.total_hits,
                "knowledgeSnippets": snippets,
                "topEntries": stats.top_entries,
            });

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("Backend:            {}", store.backend_name());
            println!("Cached answers:     {}", stats.entries);
            println!("Total hits:         {}", stats.total_hits);
            println!("Knowledge snippets: {}", snippets);

            if !stats.top_entries.is_empty() {
                println!("\nMost asked:");
                for entry in &stats.top_entries {
                    println!(
                        "  {:>4}x [{}] {}",
                        entry.hit_count, entry.language, entry.query
                    );
                }
            }
        }

        Ok(())
    }
}
