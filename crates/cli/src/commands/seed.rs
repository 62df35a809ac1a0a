//! Seed command handler.
//!
//! Provisions the knowledge table with the built-in snippet corpus.

use clap::Args;

use agrihelp_core::{config::AppConfig, AppError, AppResult};
use agrihelp_store::{create_store, seed, Store};

/// Seed the knowledge table with the built-in snippet corpus
#[derive(Args, Debug)]
pub struct SeedCommand {
    /// Seed even if snippets already exist
    #[arg(short, long)]
    pub force: bool,
}

impl SeedCommand {
    /// Execute the seed command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing seed command");

        let store = create_store(config);

        if !store.is_persistent() {
            return Err(AppError::Config(
                "No persistent storage backend configured; nothing to seed".to_string(),
            ));
        }

        let written = seed::apply(store.as_ref(), self.force).await?;

        if written == 0 {
            println!("Knowledge table already seeded; use --force to reseed");
        } else {
            println!("Seeded {} knowledge snippets", written);
        }

        Ok(())
    }
}
