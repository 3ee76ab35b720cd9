//! Ephemeral realtime credentials
//!
//! `GET /api/session-token` creates a realtime session upstream and returns its
//! short-lived client secret as `{"token": "..."}`. Nothing is cached.

use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Serialize;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTokenResponse {
    pub token: String,
}

pub async fn session_token(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<SessionTokenResponse>> {
    state
        .config
        .get_openai_api_key()
        .map_err(AppError::Configuration)?;

    let secret = state.openai.create_ephemeral_session().await?;
    info!("Issued ephemeral realtime token");

    Ok(Json(SessionTokenResponse {
        token: secret.value,
    }))
}
