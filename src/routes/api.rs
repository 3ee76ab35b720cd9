use axum::{
    Router,
    routing::{any, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    api, method_not_allowed, method_not_allowed_text, options_ok, sdp, session, token,
    voice_agent,
};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router, mounted under `/api`
///
/// Unsupported methods fall through to a 405 before any extractor runs, so no
/// upstream call is made for them.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/test", any(api::health_check))
        .route(
            "/create-voice-session",
            post(session::create_voice_session).fallback(method_not_allowed),
        )
        // Plain-text endpoints
        .route(
            "/realtime-sdp",
            post(sdp::realtime_sdp)
                .options(options_ok)
                .fallback(method_not_allowed_text),
        )
        .route(
            "/realtime-offer",
            post(sdp::realtime_offer).fallback(method_not_allowed_text),
        )
        .route(
            "/session-token",
            get(token::session_token).fallback(method_not_allowed),
        )
        .route(
            "/voice-agent",
            post(voice_agent::voice_agent)
                .options(options_ok)
                .fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
}
