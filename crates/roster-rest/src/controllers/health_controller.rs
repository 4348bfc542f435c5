//! Liveness, readiness and the static health probe.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Routes mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/live", get(live))
}

/// Answers as long as the process is up; touches no backend.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "roster",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Runs the backend health report.
///
/// 503 only when the record store is unhealthy; a degraded cache still serves.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.users.health().await;
    let code = if report.status.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (code, Json(report))
}

pub async fn live() -> StatusCode {
    StatusCode::OK
}
