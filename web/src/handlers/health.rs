//! Health check endpoints.
//!
//! Liveness never touches dependencies; readiness asks a
//! [`ReadinessProbe`] (usually the application state) whether the database
//! answers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::future::Future;

/// Something that can report whether its dependencies are reachable.
pub trait ReadinessProbe: Send + Sync {
    /// Returns `true` if the database answers.
    fn database_ready(&self) -> impl Future<Output = bool> + Send;
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
}

/// Liveness endpoint.
///
/// ```text
/// GET /health
/// {"status":"ok","version":"0.1.0"}
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Database connectivity
    pub database: bool,
}

/// Readiness endpoint.
///
/// Returns 503 when the database does not answer.
pub async fn readiness_check<P: ReadinessProbe>(
    State(probe): State<P>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = probe.database_ready().await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready: database,
            database,
        }),
    )
}
