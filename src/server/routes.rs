use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::pipeline::CurationPipeline;
use crate::domain::model::{CurationResult, GiftRequest};
use crate::utils::error::CurateError;

pub type AppState = Arc<CurationPipeline>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/curate", post(curate))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct CurateBody {
    #[serde(default)]
    demographic: Option<String>,
    #[serde(default)]
    occasion: Option<String>,
    #[serde(default)]
    budget: Option<String>,
}

async fn curate(
    State(pipeline): State<AppState>,
    body: Result<Json<CurateBody>, JsonRejection>,
) -> Result<Json<CurationResult>, (StatusCode, Json<Value>)> {
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!("Rejected /curate body: {}", rejection.body_text());
        to_error(CurateError::ValidationError {
            message: "request body is not a valid curate request".to_string(),
        })
    })?;

    let request = GiftRequest::new(
        body.demographic.as_deref().unwrap_or_default(),
        body.occasion.as_deref().unwrap_or_default(),
        body.budget.as_deref().unwrap_or_default(),
    )
    .map_err(|e| {
        tracing::warn!("Rejected /curate request: {}", e);
        to_error(e)
    })?;

    pipeline.curate(&request).await.map(Json).map_err(to_error)
}

/// Maps pipeline failures to the public error shape. Internal detail stays in the logs.
fn to_error(e: CurateError) -> (StatusCode, Json<Value>) {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "error": e.user_friendly_message() })))
}
