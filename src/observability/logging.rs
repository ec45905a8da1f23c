//! # Structured Logging
//!
//! Subscriber setup and span macros built on the tracing ecosystem.
//!
//! In JSON logging mode every event is emitted as one JSON object per line with
//! the current span fields attached, which lets log pipelines group the events
//! of one response by `status` and flags.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Create a tracing span around writing one response.
///
/// ```rust,ignore
/// let span = response_span!(status, format.json, format.schema_requested());
/// ```
#[macro_export]
macro_rules! response_span {
    ($status:expr, $json:expr, $schema:expr) => {
        tracing::debug_span!(
            "write_response",
            status = %$status,
            json = $json,
            schema = $schema,
            content_length = tracing::field::Empty
        )
    };
    ($status:expr, $json:expr, $schema:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "write_response",
            status = %$status,
            json = $json,
            schema = $schema,
            content_length = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Build the env filter: `RUST_LOG` wins over the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.log_level, e))),
    }
}

/// Install the global subscriber.
///
/// Fails with [`Error::Config`] if the level is not a valid filter directive or
/// a global subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = env_filter(config)?;

    let result = if config.json_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .try_init()
    } else {
        tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| Error::config(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = config.json_logging,
        "Logging initialized"
    );

    Ok(())
}

/// Log configuration at startup
pub fn log_config_info(config: &crate::config::AppConfig) {
    tracing::info!(
        version = %config.identity.version,
        commit_id = %config.identity.commit_id,
        cors_enabled = config.cors.enabled,
        cors_origin = %config.cors.allow_origin,
        "Response core configuration"
    );
}
