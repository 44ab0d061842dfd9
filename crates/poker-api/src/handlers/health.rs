//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

fn status(state: &AppState) -> &'static str {
    if state.realtime.is_shutting_down() {
        "shutting_down"
    } else {
        "ok"
    }
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: status(&state).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let (status, rooms, members) = match state.realtime.stats().await {
        Ok(stats) => (status(&state), stats.rooms, stats.members),
        Err(e) => {
            tracing::warn!(error = %e, "Coordinator did not report stats");
            ("degraded", 0, 0)
        }
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        connections: state.realtime.connection_count(),
        rooms,
        members,
        metrics: state.realtime.metrics(),
    }))
}
