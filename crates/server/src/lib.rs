//! HTTP server for the AgriHelp service.
//!
//! Wires the query answering pipeline and the storage layer into an axum
//! router with request tracing and permissive CORS (the browser front end
//! lives on another origin).

pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use agrihelp_answer::Pipeline;
use agrihelp_core::{AppConfig, AppError, AppResult};
use agrihelp_generator::AnswerGenerator;
use agrihelp_store::Store;

/// Application state shared across handlers.
pub struct AppState {
    /// The query answering pipeline
    pub pipeline: Pipeline,

    /// Storage backend, reached directly by the feedback and health routes
    pub store: Arc<dyn Store>,

    /// Generator handle for the health probe
    pub generator: Option<Arc<dyn AnswerGenerator>>,

    /// Process start, for uptime reporting
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        pipeline: Pipeline,
        store: Arc<dyn Store>,
        generator: Option<Arc<dyn AnswerGenerator>>,
    ) -> Self {
        Self {
            pipeline,
            store,
            generator,
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server until shutdown.
pub async fn run(config: &AppConfig, state: AppState) -> AppResult<()> {
    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::ask_routes())
        .merge(routes::feedback_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
