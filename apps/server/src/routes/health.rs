//! `GET /health`: liveness plus a store round-trip.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::Health;
use tracing::warn;

use crate::AppState;

/// 200 with the item count, or 503 when the store cannot be queried.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.db.items().count().await {
        Ok(count) => (
            StatusCode::OK,
            Json(Health {
                status: "ok".to_string(),
                items: Some(count),
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Health {
                    status: "unavailable".to_string(),
                    items: None,
                }),
            )
        }
    }
}
