pub mod api;

use std::sync::Arc;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
    },
    routing::get,
};
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::handlers::api::health_check;
use crate::state::AppState;

/// Rates at or above this value disable rate limiting
pub const RATE_LIMIT_DISABLED_THRESHOLD: u32 = 100_000;

/// Build the complete application: health check, `/api` routes and global layers
///
/// Layer order (outer to inner): security headers -> rate limit -> CORS -> routes
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors_layer = build_cors_layer(&state.config);

    // Per-IP rate limiting (disabled when rate >= 100000 for load testing)
    let rps = state.config.rate_limit_requests_per_second;
    let burst = state.config.rate_limit_burst_size;
    let governor_layer = if rps < RATE_LIMIT_DISABLED_THRESHOLD {
        // The builder takes the replenish interval of a single request
        let replenish_nanos = 1_000_000_000 / u64::from(rps.max(1));
        let governor_config = GovernorConfigBuilder::default()
            .per_nanosecond(replenish_nanos)
            .burst_size(burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish();
        if governor_config.is_none() {
            warn!("Invalid rate limit settings ({rps} rps, burst {burst}); rate limiting disabled");
        }
        governor_config.map(GovernorLayer::new)
    } else {
        info!("Rate limiting disabled (rate >= {RATE_LIMIT_DISABLED_THRESHOLD}/s)");
        None
    };

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    Router::new()
        .route("/", get(health_check))
        .nest("/api", api::create_api_router())
        .with_state(state)
        .layer(tower::util::option_layer(cors_layer))
        .layer(tower::util::option_layer(governor_layer))
        .layer(security_headers)
}

/// CORS policy applied uniformly to every route
///
/// `*` allows any origin, a comma-separated list allows those origins, and an
/// unset value leaves the service same-origin only.
pub fn build_cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    let Some(origins) = config.cors_allowed_origins.as_deref() else {
        info!(
            "CORS not configured, defaulting to same-origin only. \
             Set CORS_ALLOWED_ORIGINS to enable cross-origin access."
        );
        return None;
    };

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if origins.trim() == "*" {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    Some(layer.allow_origin(origins))
}
