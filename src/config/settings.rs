//! # Configuration Settings
//!
//! Configuration snapshots consumed by the response writer. Values are read
//! once (at process start or per request from an injected snapshot) and never
//! mutated by the writer.

use crate::errors::{Error, Result};
use http::HeaderValue;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default `Access-Control-Allow-Origin` value
pub const DEFAULT_CORS_ORIGIN: &str = "*";

/// Default `Access-Control-Expose-Headers` value
pub const DEFAULT_CORS_EXPOSE_HEADERS: &str = "User-Task-ID";

/// Commit id reported when none was provided at build or start time
pub const UNKNOWN_COMMIT_ID: &str = "unknown";

/// Cross-origin header policy applied to every response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CorsConfig {
    /// Emit the CORS header set
    pub enabled: bool,

    /// `Access-Control-Allow-Origin` value
    #[validate(length(min = 1, message = "CORS origin cannot be empty"))]
    pub allow_origin: String,

    /// `Access-Control-Expose-Headers` value
    pub expose_headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allow_origin: DEFAULT_CORS_ORIGIN.to_string(),
            expose_headers: DEFAULT_CORS_EXPOSE_HEADERS.to_string(),
        }
    }
}

impl CorsConfig {
    /// CORS headers are not emitted
    pub fn disabled() -> Self {
        Self::default()
    }

    /// CORS headers are emitted with the given origin and exposed headers
    pub fn allow<O: Into<String>, E: Into<String>>(origin: O, expose_headers: E) -> Self {
        Self { enabled: true, allow_origin: origin.into(), expose_headers: expose_headers.into() }
    }

    /// Credentials are always allowed, so a wildcard origin is rejected by browsers
    pub fn has_wildcard_origin(&self) -> bool {
        self.enabled && self.allow_origin.trim() == "*"
    }

    fn validate_header_values(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        check_header_value("Access-Control-Allow-Origin", &self.allow_origin)?;
        check_header_value("Access-Control-Expose-Headers", &self.expose_headers)
    }
}

/// Version and commit id of the running service, resolved once at start-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ServiceIdentity {
    /// Service version
    #[validate(length(min = 1, message = "Service version cannot be empty"))]
    pub version: String,

    /// Commit id the service was built from
    #[validate(length(min = 1, message = "Commit id cannot be empty"))]
    pub commit_id: String,
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self::current()
    }
}

impl ServiceIdentity {
    pub fn new<V: Into<String>, C: Into<String>>(version: V, commit_id: C) -> Self {
        Self { version: version.into(), commit_id: commit_id.into() }
    }

    /// Identity of this build: crate version plus the commit id baked in at
    /// compile time through `CC_BUILD_COMMIT_ID`, if any.
    pub fn current() -> Self {
        Self::new(crate::VERSION, option_env!("CC_BUILD_COMMIT_ID").unwrap_or(UNKNOWN_COMMIT_ID))
    }

    fn validate_header_values(&self) -> Result<()> {
        check_header_value("Cruise-Control-Version", &self.version)?;
        check_header_value("Cruise-Control-Commit_Id", &self.commit_id)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Service name attached to log output
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { service_name: crate::APP_NAME.to_string(), log_level: "info".to_string(), json_logging: false }
    }
}

/// Complete configuration snapshot for the response core
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// CORS policy
    #[validate(nested)]
    pub cors: CorsConfig,

    /// Identity headers
    #[validate(nested)]
    pub identity: ServiceIdentity,

    /// Logging configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        self.validate_custom()?;

        Ok(())
    }

    /// Checks that go beyond what the validator crate can express
    fn validate_custom(&self) -> Result<()> {
        self.cors.validate_header_values()?;
        self.identity.validate_header_values()?;

        if self.cors.has_wildcard_origin() {
            tracing::warn!(
                allow_origin = %self.cors.allow_origin,
                "CORS allows credentials with a wildcard origin; browsers will reject credentialed requests"
            );
        }

        Ok(())
    }
}

fn check_header_value(name: &str, value: &str) -> Result<()> {
    HeaderValue::from_str(value).map(|_| ()).map_err(|e| Error::invalid_header(name, e.to_string()))
}
