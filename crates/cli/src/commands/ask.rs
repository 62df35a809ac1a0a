//! Ask command handler.
//!
//! Answers a single question from the terminal through the same pipeline
//! the HTTP surface uses.

use clap::Args;
use std::time::Duration;

use agrihelp_answer::{AskRequest, Pipeline};
use agrihelp_core::{config::AppConfig, AppError, AppResult};
use agrihelp_generator::create_generator;
use agrihelp_store::create_store;

/// Answer a single question from the terminal
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: Option<String>,

    /// Language code ("auto" detects from the query)
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Indian state or region for context
    #[arg(long)]
    pub region: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let query = self
            .query
            .clone()
            .ok_or_else(|| AppError::Validation("No question provided".to_string()))?;

        let store = create_store(config);
        let generator = create_generator(&config.generator)?;

        let mut pipeline = Pipeline::new(store)
            .with_op_timeout(Duration::from_millis(config.server.op_timeout_ms));

        if let Some(generator) = generator {
            pipeline = pipeline
                .with_generator(generator, Duration::from_millis(config.generator.timeout_ms));
        }

        let mut request = AskRequest::new(query).with_language(&self.language);
        request.region = self.region.clone();

        let result = pipeline.answer(&request).await?;

        if self.json {
            let output = serde_json::json!({
                "answer": result.answer,
                "source": result.source.as_str(),
                "category": result.category.as_str(),
                "language": result.language,
            });

            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", result.answer);
            tracing::debug!(
                "Source: {}, category: {}",
                result.source.as_str(),
                result.category
            );
        }

        Ok(())
    }
}
