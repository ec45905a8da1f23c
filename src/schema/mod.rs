//! Schema inference for response bodies
//!
//! Derives a minimal structural description of a JSON response directly from
//! the response instance, for the schema header clients can request.

pub mod inference;

pub use inference::{infer, infer_from_json, schema_header_value, SchemaNode};
