//! OpenAI client used by every relay endpoint.
//!
//! Wraps [`UpstreamClient`] with the fixed request shapes of the voice agent,
//! realtime, transcription, chat and speech endpoints. The pipeline stage
//! traits are implemented here so [`VoicePipeline`](crate::core::pipeline::VoicePipeline)
//! can run directly against the hosted API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::{
    ASSISTANT_INSTRUCTIONS, CHAT_COMPLETIONS_PATH, CHAT_MAX_TOKENS, CHAT_MODEL, CHAT_TEMPERATURE,
    REALTIME_MODEL, REALTIME_PATH, REALTIME_SESSION_VOICE, REALTIME_SESSIONS_PATH, SPEECH_FORMAT,
    SPEECH_MODEL, SPEECH_PATH, SPEECH_VOICE, TRANSCRIPTION_MODEL, TRANSCRIPTIONS_PATH,
    VOICE_AGENTS_BETA_HEADER, agent_sessions_path,
};
use super::messages::{
    AgentSessionRequest, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ClientSecret,
    RealtimeSessionRequest, RealtimeSessionResponse, SpeechRequest, TranscriptionResponse,
};
use crate::config::ServerConfig;
use crate::core::audio::AudioPayload;
use crate::core::pipeline::{ChatCompletion, SpeechToText, TextToSpeech};
use crate::core::sdp::SdpOffer;
use crate::core::upstream::{UpstreamClient, UpstreamError, UpstreamResponse, UpstreamResult};

/// Client for the hosted OpenAI API
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    upstream: UpstreamClient,
}

impl OpenAIClient {
    /// Build a client from server configuration
    pub fn new(config: &ServerConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            Duration::from_secs(config.upstream_timeout_seconds),
        )?;
        Ok(Self::with_upstream(upstream))
    }

    pub fn with_upstream(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Open a voice agent session for an SDP offer
    ///
    /// The response body is the upstream session object (SDP answer and ICE
    /// servers) as raw JSON.
    pub async fn create_agent_session(
        &self,
        agent_id: &str,
        offer: &SdpOffer,
    ) -> UpstreamResult<UpstreamResponse> {
        let body = AgentSessionRequest {
            offer: offer.as_str(),
        };
        self.upstream
            .post_json(
                &agent_sessions_path(agent_id),
                &body,
                &[VOICE_AGENTS_BETA_HEADER],
            )
            .await
    }

    /// Exchange an SDP offer for an SDP answer on the realtime endpoint
    pub async fn exchange_sdp(&self, offer: &SdpOffer) -> UpstreamResult<UpstreamResponse> {
        let path = format!("{REALTIME_PATH}?model={REALTIME_MODEL}");
        self.upstream.post_sdp(&path, offer.as_str()).await
    }

    /// Create a realtime session and return its short-lived client secret
    pub async fn create_ephemeral_session(&self) -> UpstreamResult<ClientSecret> {
        let body = RealtimeSessionRequest {
            model: REALTIME_MODEL,
            voice: REALTIME_SESSION_VOICE,
        };
        let response = self
            .upstream
            .post_json(REALTIME_SESSIONS_PATH, &body, &[])
            .await?;

        let session: RealtimeSessionResponse = decode(&response.body)?;
        session
            .client_secret
            .ok_or(UpstreamError::MissingField("client_secret"))
    }
}

fn decode<T: DeserializeOwned>(raw: &[u8]) -> UpstreamResult<T> {
    serde_json::from_slice(raw)
        .map_err(|e| UpstreamError::Decode(format!("Failed to parse response: {e}")))
}

#[async_trait]
impl SpeechToText for OpenAIClient {
    async fn transcribe(&self, audio: &AudioPayload) -> UpstreamResult<String> {
        debug!(
            "Transcribing {} bytes of {} audio",
            audio.len(),
            audio.format()
        );

        let file_part = Part::bytes(audio.data().to_vec())
            .file_name(audio.file_name())
            .mime_str(&audio.mime_type())
            .map_err(|e| UpstreamError::InvalidRequest(format!("Invalid MIME type: {e}")))?;

        let form = Form::new()
            .part("file", file_part)
            .text("model", TRANSCRIPTION_MODEL);

        let response = self
            .upstream
            .post_multipart(TRANSCRIPTIONS_PATH, form)
            .await?;
        let transcription: TranscriptionResponse = decode(&response.body)?;
        Ok(transcription.text)
    }
}

#[async_trait]
impl ChatCompletion for OpenAIClient {
    async fn complete(&self, user_text: &str) -> UpstreamResult<Option<String>> {
        let request = ChatCompletionRequest {
            model: CHAT_MODEL,
            messages: vec![
                ChatMessage::system(ASSISTANT_INSTRUCTIONS),
                ChatMessage::user(user_text),
            ],
            max_tokens: CHAT_MAX_TOKENS,
            temperature: CHAT_TEMPERATURE,
        };

        let response = self
            .upstream
            .post_json(CHAT_COMPLETIONS_PATH, &request, &[])
            .await?;
        let completion: ChatCompletionResponse = decode(&response.body)?;
        Ok(completion.first_content())
    }
}

#[async_trait]
impl TextToSpeech for OpenAIClient {
    fn output_format(&self) -> &'static str {
        SPEECH_FORMAT.as_str()
    }

    async fn synthesize(&self, text: &str) -> UpstreamResult<Vec<u8>> {
        let request = SpeechRequest {
            model: SPEECH_MODEL,
            input: text,
            voice: SPEECH_VOICE,
            response_format: SPEECH_FORMAT,
        };

        let response = self
            .upstream
            .post_json(SPEECH_PATH, &request, &[])
            .await?;
        Ok(response.body.to_vec())
    }
}
