use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use http::StatusCode;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

/// Liveness endpoint, healthy only while the store is reachable.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match bookstore_dal::ping(state.pool()).await {
        Ok(()) => (StatusCode::OK, Json(json!({"message": "healthy"}))),
        Err(e) => {
            warn!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                // misspelled status is what existing clients expect
                Json(json!({"message": "unhealty", "error": e.to_string()})),
            )
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
