//! Voice pipeline endpoint tests against a stub upstream.

mod common;

use axum::http::{Method, StatusCode};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;
use wiremock::matchers::{any, body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app, app_with, empty_request, json_request, send, test_config};

const SYNTHESIZED_MP3: &[u8] = &[0xff, 0xfb, 0x90, 0x64, 0x00, 0x0f, 0xf0, 0x00];

async fn mount_transcription(server: &MockServer, text: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": text})))
        .expect(calls)
        .mount(server)
        .await;
}

async fn mount_chat(server: &MockServer, response: ResponseTemplate, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

async fn mount_speech(server: &MockServer, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SYNTHESIZED_MP3.to_vec()))
        .expect(calls)
        .mount(server)
        .await;
}

fn chat_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
    }))
}

fn voice_request(audio: &[u8], format: Option<&str>) -> serde_json::Value {
    let mut body = json!({"audio_data": STANDARD.encode(audio)});
    if let Some(format) = format {
        body["format"] = json!(format);
    }
    body
}

#[tokio::test]
async fn test_voice_agent_full_pipeline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(body_string_contains("filename=\"audio.wav\""))
        .and(body_string_contains("whisper-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"text": "  What's up?  "})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"content\":\"What's up?\""))
        .respond_with(chat_reply("Not much, just here to help!"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .and(body_json(json!({
            "model": "tts-1",
            "input": "Not much, just here to help!",
            "voice": "alloy",
            "response_format": "mp3"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(SYNTHESIZED_MP3.to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = send(
        app(&mock_server.uri()),
        json_request(
            Method::POST,
            "/api/voice-agent",
            voice_request(b"RIFF$\x00\x00\x00WAVEfmt ", None),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let fields = body.as_object().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(body["transcribed_text"], "What's up?");
    assert_eq!(body["response_text"], "Not much, just here to help!");
    assert_eq!(body["audio_format"], "mp3");

    // Synthesized bytes survive the base64 transport unchanged
    let audio = STANDARD
        .decode(body["audio_data"].as_str().unwrap())
        .unwrap();
    assert_eq!(audio, SYNTHESIZED_MP3);
}

#[tokio::test]
async fn test_voice_agent_uses_declared_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(body_string_contains("filename=\"audio.webm\""))
        .and(body_string_contains("audio/webm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hello"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_chat(&mock_server, chat_reply("hi"), 1).await;
    mount_speech(&mock_server, 1).await;

    let response = send(
        app(&mock_server.uri()),
        json_request(
            Method::POST,
            "/api/voice-agent",
            voice_request(b"webm-bytes", Some("webm")),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    // Output format is fixed regardless of the input container
    assert_eq!(response.json()["audio_format"], "mp3");
}

#[tokio::test]
async fn test_voice_agent_accepts_unpadded_and_wrapped_audio() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(body_string_contains("RIFFA"))
        .and(body_string_contains("filename=\"audio.x-m4a\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "hello"})))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_chat(&mock_server, chat_reply("hi"), 2).await;
    mount_speech(&mock_server, 2).await;
    let app = app(&mock_server.uri());

    // Canonical form is "UklGRkE="
    for audio_data in ["UklGRkE", "UklG\r\nRkE=\n"] {
        let response = send(
            app.clone(),
            json_request(
                Method::POST,
                "/api/voice-agent",
                json!({"audio_data": audio_data, "format": "x-m4a"}),
            ),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK, "body: {}", response.text());
        assert_eq!(response.json()["transcribed_text"], "hello");
    }
}

#[tokio::test]
async fn test_voice_agent_missing_audio_makes_no_calls() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let app = app(&mock_server.uri());

    for body in [
        json!({}),
        json!({"audio_data": ""}),
        json!({"audio_data": null, "format": "wav"}),
    ] {
        let response = send(
            app.clone(),
            json_request(Method::POST, "/api/voice-agent", body),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json(), json!({"error": "Audio data required"}));
    }

    let response = send(
        app.clone(),
        json_request(
            Method::POST,
            "/api/voice-agent",
            json!({"audio_data": "%%% not base64 %%%"}),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.json()["error"]
            .as_str()
            .unwrap()
            .starts_with("Audio data is not valid base64")
    );

    let response = send(
        app,
        json_request(
            Method::POST,
            "/api/voice-agent",
            voice_request(b"abc", Some("../../etc/passwd")),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_voice_agent_no_speech_skips_chat_and_speech() {
    let mock_server = MockServer::start().await;
    mount_transcription(&mock_server, "   \n ", 1).await;
    mount_chat(&mock_server, chat_reply("unused"), 0).await;
    mount_speech(&mock_server, 0).await;

    let response = send(
        app(&mock_server.uri()),
        json_request(Method::POST, "/api/voice-agent", voice_request(b"silence", None)),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({"error": "No speech detected"}));
}

#[tokio::test]
async fn test_voice_agent_stage_failure_hides_details_in_production() {
    let mock_server = MockServer::start().await;
    mount_transcription(&mock_server, "hello", 1).await;
    mount_chat(
        &mock_server,
        ResponseTemplate::new(503).set_body_string("overloaded"),
        1,
    )
    .await;
    mount_speech(&mock_server, 0).await;

    let response = send(
        app(&mock_server.uri()),
        json_request(Method::POST, "/api/voice-agent", voice_request(b"audio", None)),
    )
    .await;

    // Pipeline failures are reported generically, not with the upstream status
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Voice processing failed"}));
}

#[tokio::test]
async fn test_voice_agent_stage_failure_details_in_development() {
    let mock_server = MockServer::start().await;
    mount_transcription(&mock_server, "hello", 1).await;
    mount_chat(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({"choices": []})),
        1,
    )
    .await;
    mount_speech(&mock_server, 0).await;

    let mut config = test_config(&mock_server.uri());
    config.app_env = "development".to_string();
    let response = send(
        app_with(config),
        json_request(Method::POST, "/api/voice-agent", voice_request(b"audio", None)),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({
            "error": "Voice processing failed",
            "details": "No response from chat model"
        })
    );
}

#[tokio::test]
async fn test_voice_agent_missing_api_key() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri());
    config.openai_api_key = None;
    let response = send(
        app_with(config),
        json_request(Method::POST, "/api/voice-agent", voice_request(b"audio", None)),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "OPENAI_API_KEY is not set"}));
}

#[tokio::test]
async fn test_voice_agent_options() {
    let mock_server = MockServer::start().await;
    let response = send(
        app(&mock_server.uri()),
        empty_request(Method::OPTIONS, "/api/voice-agent"),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());

    // Same answer when no CORS policy is configured
    let mut config = test_config(&mock_server.uri());
    config.cors_allowed_origins = None;
    let response = send(
        app_with(config),
        empty_request(Method::OPTIONS, "/api/voice-agent"),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
}
