//! Shared helpers for router-level integration tests.
//!
//! The full application is driven in-process with `tower::ServiceExt::oneshot`
//! while a `wiremock` server stands in for the upstream API.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use bytes::Bytes;
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use voice_relay::{ServerConfig, create_app, state::AppState};

pub const API_KEY: &str = "sk-test-key";
pub const AGENT_ID: &str = "agent_test";
pub const SDP_OFFER: &str = "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\nm=audio 9 UDP/TLS/RTP/SAVPF 111\r\n";

/// Configuration pointing at `base_url` with every secret set and rate limiting off
pub fn test_config(base_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        app_env: "production".to_string(),
        openai_api_key: Some(API_KEY.to_string()),
        openai_agent_id: Some(AGENT_ID.to_string()),
        openai_base_url: base_url.to_string(),
        upstream_timeout_seconds: 5,
        cors_allowed_origins: Some("*".to_string()),
        rate_limit_requests_per_second: 100_000,
        rate_limit_burst_size: 10,
    }
}

pub fn app_with(config: ServerConfig) -> Router {
    let state: Arc<AppState> = AppState::new(config).expect("app state");
    create_app(state)
}

pub fn app(base_url: &str) -> Router {
    app_with(test_config(base_url))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("utf-8 body")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("router response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("response body")
        .to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn text_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
