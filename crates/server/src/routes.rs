//! API routes for the AgriHelp HTTP surface.
//!
//! Error contract: the caller always receives a well-formed JSON body.
//! Validation problems map to 400 with an `error` field; unexpected faults
//! map to 500 with an `error` field plus an apologetic answer and an
//! "error" source tag. Fault detail stays in the server log.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use agrihelp_answer::{AskRequest, ERROR_ANSWER};
use agrihelp_generator::AnswerGenerator;
use agrihelp_store::{AppFeedback, FeedbackKind, Store};

use crate::AppState;

type SharedState = Arc<AppState>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    let message: String = message.into();
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

// ============================================================================
// Ask
// ============================================================================

pub fn ask_routes() -> Router<SharedState> {
    Router::new().route("/ask", post(ask))
}

/// Answer shape for `/ask`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub source: String,
    pub category: String,
}

async fn ask(
    State(state): State<SharedState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    match state.pipeline.answer(&request).await {
        Ok(result) => Ok(Json(AskResponse {
            answer: result.answer,
            source: result.source.as_str().to_string(),
            category: result.category.as_str().to_string(),
        })),
        Err(e) if e.is_validation() => Err(bad_request(e.to_string())),
        Err(e) => {
            error!("Ask pipeline failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to process query",
                    "answer": ERROR_ANSWER,
                    "source": "error",
                })),
            ))
        }
    }
}

// ============================================================================
// Feedback
// ============================================================================

pub fn feedback_routes() -> Router<SharedState> {
    Router::new()
        .route("/feedback", post(submit_feedback))
        .route("/app-feedback", post(submit_app_feedback).get(list_app_feedback))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub query: String,
    pub answer: String,
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: &'static str,
    pub message: &'static str,
}

async fn submit_feedback(
    State(state): State<SharedState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let kind = FeedbackKind::parse(&request.feedback).map_err(|e| bad_request(e.to_string()))?;

    if let Err(e) = state
        .store
        .save_feedback(&request.query, &request.answer, kind)
        .await
    {
        error!("Failed to save feedback: {}", e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to record feedback" })),
        ));
    }

    Ok(Json(AckResponse {
        status: "success",
        message: "Feedback recorded",
    }))
}

/// Minimum length of an app-feedback message after trimming.
const MIN_FEEDBACK_MESSAGE_CHARS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct AppFeedbackRequest {
    pub message: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub page: Option<String>,
}

async fn submit_app_feedback(
    State(state): State<SharedState>,
    Json(request): Json<AppFeedbackRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let message = request.message.trim();
    if message.chars().count() < MIN_FEEDBACK_MESSAGE_CHARS {
        return Err(bad_request(format!(
            "Message must be at least {} characters",
            MIN_FEEDBACK_MESSAGE_CHARS
        )));
    }

    if let Some(rating) = request.rating {
        if !(1..=5).contains(&rating) {
            return Err(bad_request("Rating must be between 1 and 5"));
        }
    }

    if let Err(e) = state
        .store
        .save_app_feedback(message, request.rating, request.page.as_deref())
        .await
    {
        error!("Failed to save app feedback: {}", e);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to record feedback" })),
        ));
    }

    Ok(Json(AckResponse {
        status: "success",
        message: "App feedback recorded",
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackListResponse {
    pub items: Vec<AppFeedback>,
}

async fn list_app_feedback(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<FeedbackListResponse>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    match state.store.recent_app_feedback(limit).await {
        Ok(items) => Ok(Json(FeedbackListResponse { items })),
        Err(e) => {
            error!("Failed to list app feedback: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch feedback" })),
            ))
        }
    }
}

// ============================================================================
// Health
// ============================================================================

pub fn health_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "AgriHelp API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<SharedState>) -> Json<Value> {
    let generator_available = match &state.generator {
        Some(generator) => generator.is_available().await,
        None => false,
    };

    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "storage_backend": state.store.backend_name(),
        "storage_persistent": state.store.is_persistent(),
        "generator_available": generator_available,
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
