//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check endpoint
//! - `session` - Voice agent session creation (JSON errors)
//! - `sdp` - SDP relays answering in plain text
//! - `token` - Ephemeral realtime credential issuance
//! - `voice_agent` - Speech-to-text -> chat -> text-to-speech pipeline

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::Response,
};

use crate::core::upstream::UpstreamResponse;
use crate::errors::{AppError, PlainTextError};

pub mod api;
pub mod sdp;
pub mod session;
pub mod token;
pub mod voice_agent;

/// Fallback for unsupported methods on JSON endpoints
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Fallback for unsupported methods on plain-text endpoints
pub async fn method_not_allowed_text() -> PlainTextError {
    PlainTextError(AppError::MethodNotAllowed)
}

/// Answer for non-preflight OPTIONS requests
pub async fn options_ok() -> StatusCode {
    StatusCode::OK
}

/// Relay an upstream success response byte-for-byte with the given content type
pub(crate) fn relay_upstream(upstream: UpstreamResponse, content_type: &'static str) -> Response {
    Response::builder()
        .status(upstream.status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(upstream.body))
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build relay response: {}", e);
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
}
