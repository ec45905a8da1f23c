//! # Observability Infrastructure
//!
//! Structured logging and response metrics for the response core.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_config_info};
pub use metrics::ResponseMetrics;

use crate::config::AppConfig;
use crate::errors::Result;

/// Initialize logging, register metric descriptions and log the active configuration
pub fn init_observability(config: &AppConfig) -> Result<()> {
    init_logging(&config.observability)?;
    ResponseMetrics::describe();
    log_config_info(config);
    Ok(())
}
