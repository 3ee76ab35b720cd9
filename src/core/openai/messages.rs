//! Request and response bodies exchanged with the upstream API.
//!
//! Only the fields the relay reads or writes are modelled; everything else in an
//! upstream response is ignored (or passed through as raw bytes by the caller).

use serde::{Deserialize, Serialize};

use super::config::{AudioOutputFormat, OpenAIVoice};

// =============================================================================
// Transcription
// =============================================================================

/// Transcription response (json format).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

// =============================================================================
// Chat completion
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

// =============================================================================
// Speech
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub voice: OpenAIVoice,
    pub response_format: AudioOutputFormat,
}

// =============================================================================
// Realtime sessions
// =============================================================================

/// Body of the ephemeral session request
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeSessionRequest<'a> {
    pub model: &'a str,
    pub voice: OpenAIVoice,
}

/// The parts of the session object the relay reads
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeSessionResponse {
    #[serde(default)]
    pub client_secret: Option<ClientSecret>,
}

/// Short-lived credential issued for a single realtime session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientSecret {
    pub value: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Body of the voice agent session request
#[derive(Debug, Clone, Serialize)]
pub struct AgentSessionRequest<'a> {
    pub offer: &'a str,
}
