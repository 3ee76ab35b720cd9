use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::openai::OpenAIClient;
use crate::core::pipeline::VoicePipeline;
use crate::core::upstream::UpstreamResult;

/// Voice pipeline running every stage against the hosted API
pub type OpenAIVoicePipeline = VoicePipeline<OpenAIClient, OpenAIClient, OpenAIClient>;

/// Application state that can be shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Client used by the session, SDP and token endpoints
    pub openai: OpenAIClient,
    pub voice_pipeline: OpenAIVoicePipeline,
}

impl AppState {
    pub fn new(config: ServerConfig) -> UpstreamResult<Arc<Self>> {
        let openai = OpenAIClient::new(&config)?;
        let voice_pipeline = VoicePipeline::new(openai.clone(), openai.clone(), openai.clone());

        if !openai.upstream().has_credential() {
            tracing::warn!("OPENAI_API_KEY is not set; upstream endpoints will answer 500");
        }

        Ok(Arc::new(Self {
            config,
            openai,
            voice_pipeline,
        }))
    }
}
