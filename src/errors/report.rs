//! Captured business errors rendered as stack-trace text for the error envelope.

use std::any::type_name;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;

/// A business error captured for the `stackTrace` field of an error response.
///
/// The report keeps the error's type identifier, its display message, the
/// chain of causes and, when the process captures backtraces
/// (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`), the frame list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    kind: String,
    message: String,
    causes: Vec<String>,
    backtrace: Option<String>,
}

impl ErrorReport {
    /// Capture a concrete error together with its source chain.
    pub fn capture<E>(error: &E) -> Self
    where
        E: StdError + 'static,
    {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            kind: type_name::<E>().to_string(),
            message: error.to_string(),
            causes,
            backtrace: render_backtrace(&Backtrace::capture()),
        }
    }

    /// Capture an `anyhow::Error`, reusing the backtrace it already carries.
    pub fn from_anyhow(error: &anyhow::Error) -> Self {
        Self {
            kind: type_name::<anyhow::Error>().to_string(),
            message: error.to_string(),
            causes: error.chain().skip(1).map(|cause| cause.to_string()).collect(),
            backtrace: render_backtrace(error.backtrace()),
        }
    }

    /// Build a report from an explicit type identifier and message.
    pub fn new<K: Into<String>, M: Into<String>>(kind: K, message: M) -> Self {
        Self { kind: kind.into(), message: message.into(), causes: Vec::new(), backtrace: None }
    }

    /// Append a cause line to the report
    pub fn with_cause<S: Into<String>>(mut self, cause: S) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Type identifier of the captured error
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Display message of the captured error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Messages of the source chain, outermost first
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    /// Whether frames were captured alongside the error
    pub fn has_backtrace(&self) -> bool {
        self.backtrace.is_some()
    }

    /// Full stack-trace text: type and message, cause chain, then frames.
    pub fn stack_trace(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for cause in &self.causes {
            write!(f, "\nCaused by: {}", cause)?;
        }
        if let Some(backtrace) = &self.backtrace {
            write!(f, "\nStack backtrace:\n{}", backtrace)?;
        }
        Ok(())
    }
}

fn render_backtrace(backtrace: &Backtrace) -> Option<String> {
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
