//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

/// Probe response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Result of probing one dependency
#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub latency_ms: u64,
}

/// GET /health - process is up
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        checks: Vec::new(),
    })
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /ready - 503 while the user store cannot be read
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = check_user_store(&state).await;
    let status = store.status;

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: vec![store],
    };

    (status.status_code(), Json(response))
}

async fn check_user_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state.user_directory.list().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheck {
            name: "user_store",
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => HealthCheck {
            name: "user_store",
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
            latency_ms,
        },
    }
}
