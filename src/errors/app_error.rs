use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::audio::AudioError;
use crate::core::pipeline::PipelineError;
use crate::core::sdp::SdpError;
use crate::core::upstream::UpstreamError;

/// Application error type
///
/// Renders as a JSON `{"error": ...}` body. Wrap it in [`PlainTextError`] for
/// endpoints that answer in plain text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Wrong HTTP verb for the endpoint
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Required input missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Transcript was empty
    #[error("No speech detected")]
    NoSpeechDetected,

    /// Required secret absent at request time
    #[error("{0}")]
    Configuration(String),

    /// Upstream answered with a non-success status
    #[error("OpenAI API Error: {body}")]
    Upstream { status: StatusCode, body: String },

    /// Unexpected failure talking to the upstream
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Voice pipeline failed; `details` is only set in development mode
    #[error("Voice processing failed")]
    PipelineFailed { details: Option<String> },
}

impl AppError {
    /// Map a pipeline failure, exposing its message only when `expose_details` is set
    pub fn from_pipeline(err: PipelineError, expose_details: bool) -> Self {
        match err {
            PipelineError::NoSpeechDetected => AppError::NoSpeechDetected,
            other => {
                tracing::error!("Voice agent error: {}", other);
                AppError::PipelineFailed {
                    details: expose_details.then(|| other.to_string()),
                }
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) | AppError::NoSpeechDetected => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => *status,
            AppError::Configuration(_)
            | AppError::Gateway(_)
            | AppError::PipelineFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the error at the appropriate level
    pub fn log(&self) {
        match self {
            AppError::MethodNotAllowed => tracing::debug!("{}", self),
            AppError::Validation(msg) => tracing::warn!("Bad request: {}", msg),
            AppError::NoSpeechDetected => tracing::warn!("No speech detected in audio"),
            AppError::Configuration(msg) => tracing::error!("Configuration error: {}", msg),
            AppError::Upstream { status, body } => {
                tracing::error!("OpenAI API Error ({}): {}", status, body)
            }
            AppError::Gateway(msg) => tracing::error!("Gateway error: {}", msg),
            // Already logged with the underlying cause in `from_pipeline`
            AppError::PipelineFailed { .. } => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = match &self {
            AppError::PipelineFailed {
                details: Some(details),
            } => json!({ "error": self.to_string(), "details": details }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Plain-text rendering of [`AppError`]
///
/// Upstream failures are answered with the upstream body verbatim.
#[derive(Debug)]
pub struct PlainTextError(pub AppError);

impl From<AppError> for PlainTextError {
    fn from(err: AppError) -> Self {
        PlainTextError(err)
    }
}

impl From<UpstreamError> for PlainTextError {
    fn from(err: UpstreamError) -> Self {
        PlainTextError(err.into())
    }
}

impl From<SdpError> for PlainTextError {
    fn from(err: SdpError) -> Self {
        PlainTextError(err.into())
    }
}

impl IntoResponse for PlainTextError {
    fn into_response(self) -> Response {
        let PlainTextError(err) = self;
        err.log();

        let status = err.status_code();
        let body = match err {
            AppError::Upstream { body, .. } => body,
            other => other.to_string(),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => AppError::Upstream { status, body },
            UpstreamError::MissingCredential => {
                AppError::Configuration("OPENAI_API_KEY is not set".to_string())
            }
            other => AppError::Gateway(other.to_string()),
        }
    }
}

impl From<AudioError> for AppError {
    fn from(err: AudioError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<SdpError> for AppError {
    fn from(err: SdpError) -> Self {
        AppError::Validation(err.to_string())
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
