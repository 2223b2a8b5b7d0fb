use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ReadinessResponse {
    #[schema(example = "ready")]
    pub status: &'static str,
    #[schema(example = "connected")]
    pub database: &'static str,
    pub version: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "healthCheck",
    summary = "Basic health check",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        environment: state.config.environment.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    operation_id = "readinessCheck",
    summary = "Readiness check including database connectivity",
    responses((status = 200, description = "Readiness state", body = ReadinessResponse)),
)]
#[instrument(skip(state))]
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    match state.db.ping().await {
        Ok(()) => Json(ReadinessResponse {
            status: "ready",
            database: "connected",
            version: VERSION,
        }),
        Err(e) => {
            tracing::error!("Database readiness check failed: {}", e);
            Json(ReadinessResponse {
                status: "not ready",
                database: "disconnected",
                version: VERSION,
            })
        }
    }
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    operation_id = "livenessCheck",
    summary = "Liveness probe",
    responses((status = 200, description = "Process is alive", body = HealthResponse)),
)]
pub async fn liveness_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive",
        version: VERSION,
        environment: state.config.environment.clone(),
    })
}
