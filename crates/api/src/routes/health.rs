//! Health check endpoints.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health and /healthz: returns service name, status, version.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "order-processor",
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
