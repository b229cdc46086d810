//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    pub version: String,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: BTreeMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /health`: 200 while the process is running
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// `GET /ready`: 503 when the configured database does not answer
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let mut dependencies = BTreeMap::new();
    let mut ready = true;

    if let Some(pool) = state.db() {
        let status = match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => DependencyStatus {
                healthy: true,
                message: Some("Connected".to_string()),
            },
            Err(e) => {
                tracing::error!("Database readiness check failed: {}", e);
                ready = false;
                DependencyStatus {
                    healthy: false,
                    message: Some("Connection failed".to_string()),
                }
            }
        };
        dependencies.insert("database".to_string(), status);
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    (status, Json(response))
}
