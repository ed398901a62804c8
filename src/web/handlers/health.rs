//! Health check handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{ApiResponse, StoreHealthResponse};
use crate::web::error::ApiError;

/// GET /health - Liveness check.
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /api/health/store - Check that the database answers.
pub async fn store_health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<StoreHealthResponse>>, ApiError> {
    let version = async {
        state.db.ping().await?;
        state.db.schema_version().await
    }
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Store health check failed");
        ApiError::unavailable("Database tidak dapat dihubungi")
    })?;

    Ok(Json(ApiResponse::new(StoreHealthResponse {
        status: "ok",
        schema_version: version,
    })))
}
