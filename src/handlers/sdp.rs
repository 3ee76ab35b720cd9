//! SDP relays with plain-text errors
//!
//! - `POST /api/realtime-sdp`: JSON `{"sdp"}` body, relayed to the voice agent
//!   session endpoint; the upstream session JSON is returned unchanged.
//! - `POST /api/realtime-offer`: raw SDP body, relayed to the realtime endpoint;
//!   the SDP answer is returned unchanged as `application/sdp`.
//!
//! Failures answer in plain text; upstream failures carry the upstream status
//! and body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    response::{Json, Response},
};
use tracing::info;

use crate::core::sdp::{SdpError, SdpOffer};
use crate::errors::{AppError, PlainTextError};
use crate::state::AppState;

use super::relay_upstream;
use super::session::SdpRequest;

const SDP_REQUIRED_IN_JSON: &str = "SDP offer is required in the JSON body";
const AGENT_ID_NOT_SET: &str = "OPENAI_AGENT_ID environment variable is not set";
const API_KEY_NOT_SET: &str = "OPENAI_API_KEY environment variable is not set";

pub async fn realtime_sdp(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SdpRequest>, JsonRejection>,
) -> Result<Response, PlainTextError> {
    let sdp = body
        .ok()
        .and_then(|Json(request)| request.sdp)
        .unwrap_or_default();
    let offer = SdpOffer::parse(sdp).map_err(|e| match e {
        SdpError::Missing => AppError::Validation(SDP_REQUIRED_IN_JSON.to_string()),
        other => other.into(),
    })?;

    let agent_id = state
        .config
        .get_openai_agent_id()
        .map_err(|_| AppError::Configuration(AGENT_ID_NOT_SET.to_string()))?;
    require_api_key(&state)?;

    info!(
        "Relaying SDP offer to voice agent ({} bytes)",
        offer.as_str().len()
    );
    let session = state.openai.create_agent_session(&agent_id, &offer).await?;

    Ok(relay_upstream(session, "application/json"))
}

pub async fn realtime_offer(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, PlainTextError> {
    let sdp = String::from_utf8(body.to_vec())
        .map_err(|_| AppError::Validation("SDP offer must be UTF-8 text".to_string()))?;
    let offer = SdpOffer::parse(sdp)?;

    require_api_key(&state)?;

    info!(
        "Relaying SDP offer to realtime endpoint ({} bytes)",
        offer.as_str().len()
    );
    let answer = state.openai.exchange_sdp(&offer).await?;

    Ok(relay_upstream(answer, "application/sdp"))
}

fn require_api_key(state: &AppState) -> Result<(), AppError> {
    state
        .config
        .get_openai_api_key()
        .map(|_| ())
        .map_err(|_| AppError::Configuration(API_KEY_NOT_SET.to_string()))
}
