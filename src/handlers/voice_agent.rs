//! Voice pipeline endpoint
//!
//! `POST /api/voice-agent` with `{"audio_data": "<base64>", "format": "wav"}`.
//! The audio is transcribed, answered by the chat model and spoken back:
//!
//! ```json
//! {
//!   "transcribed_text": "What's the weather like?",
//!   "response_text": "I can't check live weather, but ...",
//!   "audio_data": "<base64 mp3>",
//!   "audio_format": "mp3"
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::audio::AudioPayload;
use crate::core::pipeline::VoicePipelineOutput;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceAgentRequest {
    /// Base64 encoded audio
    #[serde(default)]
    pub audio_data: Option<String>,
    /// Container of `audio_data`, defaults to wav
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceAgentResponse {
    pub transcribed_text: String,
    pub response_text: String,
    pub audio_data: String,
    pub audio_format: String,
}

impl From<VoicePipelineOutput> for VoiceAgentResponse {
    fn from(output: VoicePipelineOutput) -> Self {
        Self {
            transcribed_text: output.transcribed_text,
            response_text: output.response_text,
            audio_data: output.audio_data,
            audio_format: output.audio_format.to_string(),
        }
    }
}

pub async fn voice_agent(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VoiceAgentRequest>, JsonRejection>,
) -> AppResult<Json<VoiceAgentResponse>> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let audio = AudioPayload::from_base64(
        request.audio_data.as_deref().unwrap_or_default(),
        request.format.as_deref(),
    )?;

    state
        .config
        .get_openai_api_key()
        .map_err(AppError::Configuration)?;

    info!("Processing {} audio ({} bytes)", audio.format(), audio.len());

    let output = state
        .voice_pipeline
        .run(&audio)
        .await
        .map_err(|e| AppError::from_pipeline(e, state.config.is_development()))?;

    Ok(Json(output.into()))
}
