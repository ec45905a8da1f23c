//! # Configuration Management
//!
//! Configuration for the response core: the CORS policy, the service identity
//! headers and logging. Values are loaded from environment variables once and
//! handed to the writer as an explicit snapshot.

pub mod settings;

pub use settings::{
    AppConfig, CorsConfig, ObservabilityConfig, ServiceIdentity, DEFAULT_CORS_EXPOSE_HEADERS,
    DEFAULT_CORS_ORIGIN, UNKNOWN_COMMIT_ID,
};

use crate::Result;

/// Application configuration
pub type Config = AppConfig;

impl AppConfig {
    /// Create configuration from environment variables and validate it
    pub fn from_env() -> Result<Self> {
        let config = Self {
            cors: CorsConfig::from_env(),
            identity: ServiceIdentity::from_env(),
            observability: ObservabilityConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl CorsConfig {
    /// Create CorsConfig from environment variables
    pub fn from_env() -> Self {
        let enabled = env_flag("CC_WEBSERVER_HTTP_CORS_ENABLED", false);

        let allow_origin = std::env::var("CC_WEBSERVER_HTTP_CORS_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let expose_headers = std::env::var("CC_WEBSERVER_HTTP_CORS_EXPOSEHEADERS")
            .unwrap_or_else(|_| DEFAULT_CORS_EXPOSE_HEADERS.to_string());

        Self { enabled, allow_origin, expose_headers }
    }
}

impl ServiceIdentity {
    /// Crate version plus `CC_COMMIT_ID`, falling back to the build-time commit id
    pub fn from_env() -> Self {
        let current = Self::current();
        let commit_id = std::env::var("CC_COMMIT_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(current.commit_id);

        Self { version: current.version, commit_id }
    }
}

impl ObservabilityConfig {
    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let service_name = std::env::var("CC_SERVICE_NAME").unwrap_or(defaults.service_name);
        let log_level = std::env::var("CC_LOG_LEVEL").unwrap_or(defaults.log_level);
        let json_logging = env_flag("CC_JSON_LOGGING", defaults.json_logging);

        Self { service_name, log_level, json_logging }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name).map(|s| s.eq_ignore_ascii_case("true") || s == "1").unwrap_or(default)
}
