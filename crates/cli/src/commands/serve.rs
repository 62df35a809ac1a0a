//! Serve command handler.
//!
//! Builds the store, pipeline and optional generator, then runs the HTTP
//! server until shutdown.

use clap::Args;
use std::time::Duration;

use agrihelp_answer::Pipeline;
use agrihelp_core::{config::AppConfig, AppResult};
use agrihelp_generator::create_generator;
use agrihelp_server::AppState;
use agrihelp_store::create_store;

/// Run the HTTP API server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Bind host override
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port override
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let mut config = config.clone();
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let store = create_store(&config);
        let generator = create_generator(&config.generator)?;

        let mut pipeline = Pipeline::new(store.clone())
            .with_op_timeout(Duration::from_millis(config.server.op_timeout_ms));

        if let Some(ref generator) = generator {
            pipeline = pipeline.with_generator(
                generator.clone(),
                Duration::from_millis(config.generator.timeout_ms),
            );
        }

        let state = AppState::new(pipeline, store, generator);

        agrihelp_server::run(&config, state).await
    }
}
