//! Speech-to-text -> chat -> text-to-speech orchestration.
//!
//! [`VoicePipeline`] runs three stages strictly in sequence, each feeding the
//! next. The first failure aborts the run; nothing is retried and no partial
//! result is returned.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use super::audio::{AudioPayload, encode_base64};
use super::upstream::{UpstreamError, UpstreamResult};

// =============================================================================
// Stage traits
// =============================================================================

/// Stage 1: turn recorded audio into text
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &AudioPayload) -> UpstreamResult<String>;
}

/// Stage 2: answer a user utterance
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Returns `None` when the model produced no text
    async fn complete(&self, user_text: &str) -> UpstreamResult<Option<String>>;
}

/// Stage 3: speak a reply
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Format identifier of the audio returned by [`TextToSpeech::synthesize`]
    fn output_format(&self) -> &'static str;

    async fn synthesize(&self, text: &str) -> UpstreamResult<Vec<u8>>;
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The transcript was empty after trimming
    #[error("No speech detected")]
    NoSpeechDetected,

    #[error("No response from chat model")]
    EmptyResponse,

    #[error("Transcription failed: {0}")]
    Transcription(#[source] UpstreamError),

    #[error("Chat completion failed: {0}")]
    Completion(#[source] UpstreamError),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[source] UpstreamError),
}

// =============================================================================
// Pipeline
// =============================================================================

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePipelineOutput {
    pub transcribed_text: String,
    pub response_text: String,
    /// Synthesized audio, base64 encoded
    pub audio_data: String,
    pub audio_format: &'static str,
}

#[derive(Debug, Clone)]
pub struct VoicePipeline<S, C, T> {
    stt: S,
    chat: C,
    tts: T,
}

impl<S, C, T> VoicePipeline<S, C, T>
where
    S: SpeechToText,
    C: ChatCompletion,
    T: TextToSpeech,
{
    pub fn new(stt: S, chat: C, tts: T) -> Self {
        Self { stt, chat, tts }
    }

    pub async fn run(&self, audio: &AudioPayload) -> Result<VoicePipelineOutput, PipelineError> {
        let transcript = self
            .stt
            .transcribe(audio)
            .await
            .map_err(PipelineError::Transcription)?;

        let transcribed_text = transcript.trim();
        if transcribed_text.is_empty() {
            return Err(PipelineError::NoSpeechDetected);
        }
        info!("Transcribed {} characters", transcribed_text.chars().count());

        let response_text = self
            .chat
            .complete(transcribed_text)
            .await
            .map_err(PipelineError::Completion)?
            .filter(|text| !text.is_empty())
            .ok_or(PipelineError::EmptyResponse)?;
        debug!("Chat response: {} characters", response_text.chars().count());

        let audio_bytes = self
            .tts
            .synthesize(&response_text)
            .await
            .map_err(PipelineError::Synthesis)?;
        debug!("Synthesized {} bytes", audio_bytes.len());

        Ok(VoicePipelineOutput {
            transcribed_text: transcribed_text.to_string(),
            response_text,
            audio_data: encode_base64(&audio_bytes),
            audio_format: self.tts.output_format(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use base64::{Engine, engine::general_purpose::STANDARD};
    use reqwest::StatusCode;

    #[derive(Clone, Default)]
    struct Calls(Arc<AtomicUsize>);

    impl Calls {
        fn hit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct StubStt {
        transcript: Result<String, StatusCode>,
        calls: Calls,
    }

    #[async_trait]
    impl SpeechToText for StubStt {
        async fn transcribe(&self, _audio: &AudioPayload) -> UpstreamResult<String> {
            self.calls.hit();
            self.transcript.clone().map_err(|status| UpstreamError::Status {
                status,
                body: "stt failed".to_string(),
            })
        }
    }

    struct StubChat {
        reply: Option<String>,
        calls: Calls,
        seen: Arc<std::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ChatCompletion for StubChat {
        async fn complete(&self, user_text: &str) -> UpstreamResult<Option<String>> {
            self.calls.hit();
            self.seen.lock().unwrap().push(user_text.to_string());
            Ok(self.reply.clone())
        }
    }

    struct StubTts {
        audio: Vec<u8>,
        calls: Calls,
    }

    #[async_trait]
    impl TextToSpeech for StubTts {
        fn output_format(&self) -> &'static str {
            "mp3"
        }

        async fn synthesize(&self, _text: &str) -> UpstreamResult<Vec<u8>> {
            self.calls.hit();
            Ok(self.audio.clone())
        }
    }

    struct Harness {
        pipeline: VoicePipeline<StubStt, StubChat, StubTts>,
        stt_calls: Calls,
        chat_calls: Calls,
        tts_calls: Calls,
        chat_inputs: Arc<std::sync::Mutex<Vec<String>>>,
    }

    fn harness(transcript: Result<&str, StatusCode>, reply: Option<&str>) -> Harness {
        let stt_calls = Calls::default();
        let chat_calls = Calls::default();
        let tts_calls = Calls::default();
        let chat_inputs = Arc::new(std::sync::Mutex::new(Vec::new()));

        let pipeline = VoicePipeline::new(
            StubStt {
                transcript: transcript.map(str::to_string),
                calls: stt_calls.clone(),
            },
            StubChat {
                reply: reply.map(str::to_string),
                calls: chat_calls.clone(),
                seen: chat_inputs.clone(),
            },
            StubTts {
                audio: vec![0xff, 0xfb, 0x90, 0x00, 0x01],
                calls: tts_calls.clone(),
            },
        );

        Harness {
            pipeline,
            stt_calls,
            chat_calls,
            tts_calls,
            chat_inputs,
        }
    }

    fn audio() -> AudioPayload {
        AudioPayload::new(b"RIFF....WAVE".to_vec(), "wav").unwrap()
    }

    #[tokio::test]
    async fn test_successful_run() {
        let h = harness(Ok("  Hello there \n"), Some("Hi! How can I help?"));
        let output = h.pipeline.run(&audio()).await.unwrap();

        assert_eq!(output.transcribed_text, "Hello there");
        assert_eq!(output.response_text, "Hi! How can I help?");
        assert_eq!(output.audio_format, "mp3");
        assert_eq!(
            STANDARD.decode(&output.audio_data).unwrap(),
            vec![0xff, 0xfb, 0x90, 0x00, 0x01]
        );

        // The chat stage sees the trimmed transcript
        assert_eq!(*h.chat_inputs.lock().unwrap(), vec!["Hello there"]);
        assert_eq!(h.stt_calls.count(), 1);
        assert_eq!(h.chat_calls.count(), 1);
        assert_eq!(h.tts_calls.count(), 1);
    }

    #[tokio::test]
    async fn test_blank_transcript_stops_before_chat() {
        for transcript in ["", "   ", "\n\t "] {
            let h = harness(Ok(transcript), Some("unused"));
            let err = h.pipeline.run(&audio()).await.unwrap_err();

            assert!(matches!(err, PipelineError::NoSpeechDetected));
            assert_eq!(h.stt_calls.count(), 1);
            assert_eq!(h.chat_calls.count(), 0);
            assert_eq!(h.tts_calls.count(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_chat_reply_stops_before_synthesis() {
        for reply in [None, Some("")] {
            let h = harness(Ok("hello"), reply);
            let err = h.pipeline.run(&audio()).await.unwrap_err();

            assert!(matches!(err, PipelineError::EmptyResponse));
            assert_eq!(err.to_string(), "No response from chat model");
            assert_eq!(h.tts_calls.count(), 0);
        }
    }

    #[tokio::test]
    async fn test_transcription_failure_aborts() {
        let h = harness(Err(StatusCode::BAD_REQUEST), Some("unused"));
        let err = h.pipeline.run(&audio()).await.unwrap_err();

        match err {
            PipelineError::Transcription(UpstreamError::Status { status, .. }) => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
            }
            other => panic!("Expected transcription failure, got {other:?}"),
        }
        assert_eq!(h.chat_calls.count(), 0);
        assert_eq!(h.tts_calls.count(), 0);
    }
}
