//! Fixed upstream parameters.
//!
//! Every model, voice and sampling setting used by the relay is pinned here.
//! Clients cannot override them.

use serde::{Deserialize, Serialize};

// =============================================================================
// Endpoint paths (relative to the configured API root)
// =============================================================================

pub const TRANSCRIPTIONS_PATH: &str = "/audio/transcriptions";
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
pub const SPEECH_PATH: &str = "/audio/speech";
pub const REALTIME_PATH: &str = "/realtime";
pub const REALTIME_SESSIONS_PATH: &str = "/realtime/sessions";

/// Path of the voice agent session endpoint for `agent_id`
pub fn agent_sessions_path(agent_id: &str) -> String {
    format!("/agents/{agent_id}/sessions")
}

/// Beta opt-in header required by the voice agent session endpoint
pub const VOICE_AGENTS_BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "voice-agents=v1");

// =============================================================================
// Voice pipeline
// =============================================================================

/// Speech-to-text model
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Chat completion model
pub const CHAT_MODEL: &str = "gpt-4o-mini";

/// System instruction sent ahead of every transcript
pub const ASSISTANT_INSTRUCTIONS: &str = "You are Mia, a helpful voice assistant. Keep responses natural, conversational, and concise since this will be spoken aloud.";

/// Upper bound on generated tokens
pub const CHAT_MAX_TOKENS: u32 = 150;

/// Sampling temperature
pub const CHAT_TEMPERATURE: f64 = 0.8;

/// Text-to-speech model
pub const SPEECH_MODEL: &str = "tts-1";

/// Voice used for synthesized replies
pub const SPEECH_VOICE: OpenAIVoice = OpenAIVoice::Alloy;

/// Container of synthesized replies
pub const SPEECH_FORMAT: AudioOutputFormat = AudioOutputFormat::Mp3;

// =============================================================================
// Realtime sessions
// =============================================================================

/// Model negotiated for realtime sessions
pub const REALTIME_MODEL: &str = "gpt-4o-realtime-preview-2024-12-17";

/// Voice requested for ephemeral realtime sessions
pub const REALTIME_SESSION_VOICE: OpenAIVoice = OpenAIVoice::Verse;

// =============================================================================
// Voices
// =============================================================================

/// Voices accepted by the speech and realtime endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAIVoice {
    #[default]
    Alloy,
    Ash,
    Ballad,
    Coral,
    Echo,
    Sage,
    Shimmer,
    Verse,
}

impl OpenAIVoice {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Ash => "ash",
            Self::Ballad => "ballad",
            Self::Coral => "coral",
            Self::Echo => "echo",
            Self::Sage => "sage",
            Self::Shimmer => "shimmer",
            Self::Verse => "verse",
        }
    }
}

impl std::fmt::Display for OpenAIVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audio Output Format
// =============================================================================

/// Containers the speech endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioOutputFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    Pcm,
}

impl AudioOutputFormat {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::Pcm => "pcm",
        }
    }
}

impl std::fmt::Display for AudioOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
