use axum::response::Json;
use serde::Serialize;

/// Fixed health check message
pub const HEALTH_MESSAGE: &str = "Hello from voice-relay! The test is successful.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

/// Health check handler
/// Returns the same fixed payload for every method and every call
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE,
    })
}
