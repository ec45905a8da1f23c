//! # Error Handling
//!
//! Error types for the response core, defined with `thiserror`.
//!
//! Business failures handed to the writer are not represented here: they are
//! captured as an [`ErrorReport`] and rendered into the error envelope. The
//! variants below are failures of the response construction itself.

pub mod report;

pub use report::ErrorReport;

/// Custom result type for response operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the response core
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration values that failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The body was marked as JSON with a schema requested but could not be parsed
    #[error("Schema inference failed: {source}")]
    SchemaInference {
        #[source]
        source: serde_json::Error,
    },

    /// Envelope or schema serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value that cannot be carried in an HTTP header
    #[error("Invalid value for header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    /// Transport write failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid header error
    pub fn invalid_header<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self::InvalidHeader { name: name.into(), message: message.into() }
    }

    /// Wrap a parse failure of a body that claimed to be JSON
    pub fn schema_inference(source: serde_json::Error) -> Self {
        Self::SchemaInference { source }
    }

    /// Whether the failure happened while talking to the transport
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_validation_messages(&errors, "", &mut fields);
        fields.sort();

        Self::validation(format!("Validation failed: {}", fields.join("; ")))
    }
}

fn collect_validation_messages(errors: &validator::ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() { field.to_string() } else { format!("{}.{}", prefix, field) };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                out.push(format!("{}: {}", path, messages.join(", ")));
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_messages(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_messages(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
