//! # Response Layer
//!
//! Turns handler results into HTTP responses: the JSON envelope, the status
//! and header set, the optional inferred-schema header and the byte write.

pub mod envelope;
pub mod sink;
pub mod writer;

pub use envelope::{
    build_error, build_success, render_error, render_success, ResponseEnvelope, JSON_VERSION, MESSAGE,
    VERSION,
};
pub use sink::{BufferedResponse, ResponseSink, StreamSink};
pub use writer::{ResponseFormat, ResponseWriter, COMMIT_ID_HEADER, JSON_SCHEMA_HEADER, VERSION_HEADER};
