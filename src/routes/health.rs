//! Health check endpoints for liveness and readiness checks.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

/// Readiness check detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

#[derive(Debug, Serialize)]
pub struct HealthPayload {
    pub data: HealthStatus,
}

/// Liveness check — always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness check — checks database connectivity.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthPayload>> {
    let (status, database) = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => ("ok", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            ("degraded", format!("error: {e}"))
        }
    };

    ApiResponse::success(
        "Health check",
        HealthPayload {
            data: HealthStatus {
                status: status.to_string(),
                database,
            },
        },
    )
}
