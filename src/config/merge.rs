use std::env;
use std::path::PathBuf;

use super::yaml::YamlConfig;
use super::{DEFAULT_OPENAI_BASE_URL, DEFAULT_UPSTREAM_TIMEOUT_SECONDS, ServerConfig, TlsConfig};

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// # Arguments
/// * `yaml_config` - Optional YAML configuration to use as overrides
///
/// # Returns
/// * `Result<ServerConfig, Box<dyn std::error::Error>>` - The merged configuration or an error
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| env::var($env_var).ok())
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            $yaml_value.or_else(|| env::var($env_var).ok())
        };
    }

    // Server configuration
    let host = get_value!(
        "HOST",
        yaml.server.as_ref().and_then(|s| s.host.clone()),
        "0.0.0.0"
    );

    let port = if let Some(yaml_port) = yaml.server.as_ref().and_then(|s| s.port) {
        yaml_port
    } else if let Ok(port_str) = env::var("PORT") {
        port_str
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT environment variable: {e}"))?
    } else {
        3001
    };

    let app_env = get_value!(
        "APP_ENV",
        yaml.server.as_ref().and_then(|s| s.environment.clone()),
        "production"
    );

    // TLS configuration: both paths or neither
    let tls_yaml = yaml.server.as_ref().and_then(|s| s.tls.as_ref());
    let cert_path = get_optional!(
        "TLS_CERT_PATH",
        tls_yaml.and_then(|t| t.cert_path.clone())
    );
    let key_path = get_optional!("TLS_KEY_PATH", tls_yaml.and_then(|t| t.key_path.clone()));
    let tls = match (cert_path, key_path) {
        (Some(cert_path), Some(key_path)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        }),
        (None, None) => None,
        (Some(_), None) => return Err("TLS_KEY_PATH is required when TLS_CERT_PATH is set".into()),
        (None, Some(_)) => return Err("TLS_CERT_PATH is required when TLS_KEY_PATH is set".into()),
    };

    // Upstream configuration
    let openai = yaml.openai.as_ref();
    let openai_api_key = get_optional!("OPENAI_API_KEY", openai.and_then(|o| o.api_key.clone()));
    let openai_agent_id =
        get_optional!("OPENAI_AGENT_ID", openai.and_then(|o| o.agent_id.clone()));
    let openai_base_url = get_value!(
        "OPENAI_BASE_URL",
        openai.and_then(|o| o.base_url.clone()),
        DEFAULT_OPENAI_BASE_URL
    )
    .trim_end_matches('/')
    .to_string();

    let upstream_timeout_seconds =
        if let Some(timeout) = openai.and_then(|o| o.timeout_seconds) {
            timeout
        } else if let Ok(timeout_str) = env::var("UPSTREAM_TIMEOUT_SECONDS") {
            timeout_str
                .parse::<u64>()
                .map_err(|e| format!("Invalid UPSTREAM_TIMEOUT_SECONDS: {e}"))?
        } else {
            DEFAULT_UPSTREAM_TIMEOUT_SECONDS
        };

    // Security configuration
    let security = yaml.security.as_ref();
    let cors_allowed_origins = Some(get_value!(
        "CORS_ALLOWED_ORIGINS",
        security.and_then(|s| s.cors_allowed_origins.clone()),
        "*"
    ))
    .filter(|origins| !origins.trim().is_empty());

    let rate_limit_requests_per_second = security
        .and_then(|s| s.rate_limit_requests_per_second)
        .or_else(|| {
            env::var("RATE_LIMIT_REQUESTS_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or(60);

    let rate_limit_burst_size = security
        .and_then(|s| s.rate_limit_burst_size)
        .or_else(|| {
            env::var("RATE_LIMIT_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or(10);

    Ok(ServerConfig {
        host,
        port,
        tls,
        app_env,
        openai_api_key,
        openai_agent_id,
        openai_base_url,
        upstream_timeout_seconds,
        cors_allowed_origins,
        rate_limit_requests_per_second,
        rate_limit_burst_size,
    })
}
