//! Schema inference engine for JSON response bodies
//!
//! The schema is built as a [`SchemaNode`] tree in a single pass over the
//! document and serialized once. The dialect is intentionally small:
//!
//! ```text
//! {"type":"object","properties":{"a":{"type":"number"}}}
//! {"type":"array","items":[{"type":"string"}]}
//! ```
//!
//! Arrays take their item schema from the first element only; remaining
//! elements are never inspected, so a heterogeneous array yields the shape of
//! its first element. Use a validator, not this inference, when every element
//! matters.

use serde::ser::Serializer;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{Error, Result};

/// Inferred structure of a JSON value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    /// Object with its properties in document order
    Object {
        #[serde(serialize_with = "properties_as_map")]
        properties: Vec<(String, SchemaNode)>,
    },
    /// Array, described by its first element when it has one
    Array {
        #[serde(skip_serializing_if = "Option::is_none", serialize_with = "item_as_list")]
        items: Option<Box<SchemaNode>>,
    },
    Boolean,
    Number,
    String,
    /// JSON `null`, emitted as `{"type":"null"}`
    Null,
}

impl SchemaNode {
    /// Name emitted in the `type` field
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::Object { .. } => "object",
            SchemaNode::Array { .. } => "array",
            SchemaNode::Boolean => "boolean",
            SchemaNode::Number => "number",
            SchemaNode::String => "string",
            SchemaNode::Null => "null",
        }
    }

    /// Schema of a property, if this is an object that has it
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Object { properties } => {
                properties.iter().find(|(key, _)| key == name).map(|(_, node)| node)
            }
            _ => None,
        }
    }

    /// Item schema, if this is a non-empty array
    pub fn items(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Array { items } => items.as_deref(),
            _ => None,
        }
    }

    /// Compact JSON text carried in the schema response header
    pub fn to_header_text(&self) -> Result<String> {
        // DEL only occurs inside JSON strings and is not a legal header byte
        Ok(serde_json::to_string(self)?.replace('\u{7f}', "\\u007f"))
    }
}

fn properties_as_map<S>(properties: &[(String, SchemaNode)], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(properties.iter().map(|(key, node)| (key, node)))
}

fn item_as_list<S>(item: &Option<Box<SchemaNode>>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match item {
        Some(node) => serializer.collect_seq(std::iter::once(&**node)),
        None => serializer.serialize_none(),
    }
}

/// Infer the schema of a parsed JSON document
pub fn infer(value: &Value) -> SchemaNode {
    match value {
        Value::Null => SchemaNode::Null,
        Value::Bool(_) => SchemaNode::Boolean,
        Value::Number(_) => SchemaNode::Number,
        Value::String(_) => SchemaNode::String,
        Value::Array(elements) => {
            SchemaNode::Array { items: elements.first().map(|first| Box::new(infer(first))) }
        }
        Value::Object(map) => SchemaNode::Object {
            properties: map.iter().map(|(key, child)| (key.clone(), infer(child))).collect(),
        },
    }
}

/// Parse a response body and infer its schema.
///
/// A body that is not valid JSON yields [`Error::SchemaInference`].
pub fn infer_from_json(body: &str) -> Result<SchemaNode> {
    let value: Value = serde_json::from_str(body).map_err(Error::schema_inference)?;
    let schema = infer(&value);

    debug!(root_type = schema.type_name(), "Inferred schema from response body");

    Ok(schema)
}

/// Schema header value for a JSON response body
pub fn schema_header_value(body: &str) -> Result<String> {
    infer_from_json(body)?.to_header_text()
}
