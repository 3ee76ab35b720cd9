pub mod audio;
pub mod openai;
pub mod pipeline;
pub mod sdp;
pub mod upstream;

// Re-export commonly used types for convenience
pub use audio::{AudioError, AudioPayload};
pub use openai::OpenAIClient;
pub use pipeline::{
    ChatCompletion, PipelineError, SpeechToText, TextToSpeech, VoicePipeline, VoicePipelineOutput,
};
pub use sdp::{SdpError, SdpOffer};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamResult};
