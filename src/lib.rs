//! # cc-response
//!
//! Response core of the cluster-management control plane's REST layer. It
//! formats handler results into HTTP responses and, on request, describes the
//! structure of a JSON body in a response header inferred from the body itself.
//!
//! ## Architecture
//!
//! ```text
//! handler result → ResponseWriter → ResponseSink (axum Response / HTTP/1.1 stream)
//!                      ↓         ↓
//!            ResponseEnvelope   SchemaInference
//! ```
//!
//! ## Core Components
//!
//! - **Envelope** (`api::envelope`): `{"version":1,...}` wrappers for success and error bodies
//! - **Writer** (`api::writer`): status, content type, CORS and identity headers, schema header,
//!   byte-exact `Content-Length`, body write
//! - **Schema inference** (`schema`): JSON document → structural schema, first array element only
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cc_response::{api::ResponseFormat, Config, ResponseWriter, Result};
//! use http::StatusCode;
//!
//! fn demote_broker_response(config: &Config) -> Result<axum::response::Response> {
//!     let writer = ResponseWriter::from_config(config);
//!     writer.respond_message(StatusCode::OK, ResponseFormat::json().with_schema(), "Demotion started.")
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod observability;
pub mod schema;

// Re-export commonly used types and traits
pub use api::{ResponseEnvelope, ResponseFormat, ResponseWriter};
pub use config::{Config, CorsConfig, ServiceIdentity};
pub use errors::{Error, ErrorReport, Result};
pub use observability::init_observability;
pub use schema::SchemaNode;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
