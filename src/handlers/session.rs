//! Voice agent session creation
//!
//! `POST /api/create-voice-session` with `{"sdp": "<offer>"}`. The offer is sent
//! to the configured voice agent and the upstream session object is returned
//! unchanged. Errors use the JSON `{"error": ...}` shape.

use std::sync::Arc;

use axum::{
    extract::{State, rejection::JsonRejection},
    response::{Json, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::core::sdp::SdpOffer;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

use super::relay_upstream;

/// Body shared by the structured SDP endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SdpRequest {
    #[serde(default)]
    pub sdp: Option<String>,
}

pub async fn create_voice_session(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SdpRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let offer = SdpOffer::parse(request.sdp.unwrap_or_default())?;

    let agent_id = state
        .config
        .get_openai_agent_id()
        .map_err(AppError::Configuration)?;
    state
        .config
        .get_openai_api_key()
        .map_err(AppError::Configuration)?;

    info!(
        "Creating voice agent session ({} byte offer)",
        offer.as_str().len()
    );
    let session = state.openai.create_agent_session(&agent_id, &offer).await?;

    Ok(relay_upstream(session, "application/json"))
}
