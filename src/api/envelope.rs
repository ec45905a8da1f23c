//! Response envelopes wrapped around every JSON body.
//!
//! ```text
//! success: {"version":1,"message":"<text>"}
//! error:   {"version":1,"stackTrace":"<text>","errorMessage":"<text>"}
//! ```
//!
//! Plain-text responses bypass the envelope and carry the bare message.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorReport, Result};

/// Protocol version carried by every envelope
pub const JSON_VERSION: u32 = 1;

/// Envelope field holding the protocol version
pub const VERSION: &str = "version";

/// Envelope field holding the success payload
pub const MESSAGE: &str = "message";

/// Envelope field holding the formatted stack trace
pub const STACK_TRACE: &str = "stackTrace";

/// Envelope field holding the error payload
pub const ERROR_MESSAGE: &str = "errorMessage";

/// JSON response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success {
        version: u32,
        message: String,
    },
    Error {
        version: u32,
        #[serde(rename = "stackTrace")]
        stack_trace: String,
        /// Omitted from the body when the caller supplied no message
        #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
    },
}

impl ResponseEnvelope {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self::Success { version: JSON_VERSION, message: message.into() }
    }

    /// Error envelope; the stack trace is empty when there is no report
    pub fn error(report: Option<&ErrorReport>, error_message: Option<&str>) -> Self {
        Self::Error {
            version: JSON_VERSION,
            stack_trace: report.map(ErrorReport::stack_trace).unwrap_or_default(),
            error_message: error_message.map(str::to_string),
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Self::Success { version, .. } | Self::Error { version, .. } => *version,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Serialized JSON body
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `{"version":1,"message":...}` for any message text
pub fn build_success(message: &str) -> Result<String> {
    ResponseEnvelope::success(message).to_body()
}

/// `{"version":1,"stackTrace":...,"errorMessage":...}`
pub fn build_error(report: Option<&ErrorReport>, error_message: Option<&str>) -> Result<String> {
    ResponseEnvelope::error(report, error_message).to_body()
}

/// Success body in the requested mode: enveloped JSON or the raw message
pub fn render_success(message: &str, json: bool) -> Result<String> {
    if json {
        build_success(message)
    } else {
        Ok(message.to_string())
    }
}

/// Error body in the requested mode: enveloped JSON or the bare error message
pub fn render_error(report: Option<&ErrorReport>, error_message: Option<&str>, json: bool) -> Result<String> {
    if json {
        build_error(report, error_message)
    } else {
        Ok(error_message.unwrap_or_default().to_string())
    }
}
