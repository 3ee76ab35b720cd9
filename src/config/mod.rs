//! Configuration module for the Voice Relay server
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! Handlers never read the process environment. The configuration is loaded once
//! at startup and injected through [`crate::state::AppState`].
//!
//! # Example
//! ```rust,no_run
//! use voice_relay::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// Default upstream API root
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-call timeout for outbound requests
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 120;

/// Deployment mode that exposes diagnostic details in error responses
pub const DEVELOPMENT_ENV: &str = "development";

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains everything needed to run the relay:
/// - Server settings (host, port, TLS, deployment mode)
/// - Upstream settings (API key, agent identifier, base URL, timeout)
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    /// Deployment mode (`APP_ENV`). `development` exposes error details to clients.
    pub app_env: String,

    // Upstream settings
    /// OpenAI API key used for every upstream call
    pub openai_api_key: Option<String>,
    /// Voice agent identifier used by the agent session endpoints
    pub openai_agent_id: Option<String>,
    /// Upstream API root, without trailing slash
    pub openai_base_url: String,
    /// Timeout applied to each outbound call
    pub upstream_timeout_seconds: u64,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: "*". An empty value disables cross-origin access.
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

/// Zeroize secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.openai_api_key {
            key.zeroize();
        }
        if let Some(ref mut agent_id) = self.openai_agent_id {
            agent_id.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable base
    ///
    /// Environment variables (and the .env file loaded in main.rs) provide the base
    /// configuration, and the YAML file overrides specific values.
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;

        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Whether error responses may carry diagnostic details
    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case(DEVELOPMENT_ENV)
    }

    /// Get the OpenAI API key
    ///
    /// # Returns
    /// * `Result<String, String>` - The API key, or the message reported to clients
    pub fn get_openai_api_key(&self) -> Result<String, String> {
        self.openai_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .cloned()
            .ok_or_else(|| "OPENAI_API_KEY is not set".to_string())
    }

    /// Get the voice agent identifier
    pub fn get_openai_agent_id(&self) -> Result<String, String> {
        self.openai_agent_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .cloned()
            .ok_or_else(|| "OPENAI_AGENT_ID is not set".to_string())
    }
}
