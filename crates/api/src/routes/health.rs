//! Health check endpoint handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

impl HealthResponse {
    fn from_ping(latency_ms: Option<u64>) -> Self {
        let connected = latency_ms.is_some();
        HealthResponse {
            status: if connected { "healthy" } else { "unhealthy" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: DatabaseHealth {
                connected,
                latency_ms,
            },
        }
    }
}

/// GET /api/health
///
/// 200 with database latency, or 503 when the database does not answer.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let latency_ms = match persistence::db::ping(&state.pool).await {
        Ok(elapsed) => Some(elapsed.as_millis() as u64),
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            None
        }
    };

    let response = HealthResponse::from_ping(latency_ms);
    let status = if response.database.connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
