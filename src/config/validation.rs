use super::{ServerConfig, TlsConfig};

/// Validate a fully merged configuration
pub fn validate_config(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    validate_base_url(&config.openai_base_url)?;
    validate_timeout(config.upstream_timeout_seconds)?;
    validate_tls(&config.tls)?;
    validate_rate_limit(
        config.rate_limit_requests_per_second,
        config.rate_limit_burst_size,
    )?;
    Ok(())
}

/// Validate rate limiting settings
pub fn validate_rate_limit(
    requests_per_second: u32,
    burst_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if requests_per_second == 0 {
        return Err("RATE_LIMIT_REQUESTS_PER_SECOND must be greater than zero".into());
    }
    if burst_size == 0 {
        return Err("RATE_LIMIT_BURST_SIZE must be greater than zero".into());
    }
    Ok(())
}

/// Validate the upstream API root
///
/// Must be a non-empty http(s) URL.
pub fn validate_base_url(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if base_url.trim().is_empty() {
        return Err("OPENAI_BASE_URL must not be empty".into());
    }
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(format!("OPENAI_BASE_URL must use http or https, got: {base_url}").into());
    }
    Ok(())
}

/// Validate the outbound call timeout
pub fn validate_timeout(timeout_seconds: u64) -> Result<(), Box<dyn std::error::Error>> {
    if timeout_seconds == 0 {
        return Err("UPSTREAM_TIMEOUT_SECONDS must be greater than zero".into());
    }
    Ok(())
}

/// Validate TLS configuration
///
/// When TLS is configured, both the certificate and key files must exist.
pub fn validate_tls(tls: &Option<TlsConfig>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(tls) = tls {
        if !tls.cert_path.exists() {
            return Err(format!(
                "TLS_CERT_PATH file does not exist: {}",
                tls.cert_path.display()
            )
            .into());
        }
        if !tls.key_path.exists() {
            return Err(format!(
                "TLS_KEY_PATH file does not exist: {}",
                tls.key_path.display()
            )
            .into());
        }
    }
    Ok(())
}
