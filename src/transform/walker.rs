//! Generic schema walker.
//!
//! Projects a JSON value onto a [`Schema`]: declared fields are kept in
//! declaration order, undeclared ones are dropped, absent ones are skipped.
//! Annotated leaves are re-encoded in the requested [`Direction`].

use serde_json::{Map, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::transform::codec;
use crate::transform::schema::{Annotations, Field, Kind, Schema};

/// Which side of the boundary the value is travelling to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client request on its way to the backend (decode form).
    ToBackend,
    /// Backend response on its way to the client (encode form).
    ToClient,
}

/// Transform `value` according to `schema`.
pub fn transform(schema: &Schema, value: Value, direction: Direction) -> GatewayResult<Value> {
    match value {
        Value::Object(map) => transform_object(schema, map, direction).map(Value::Object),
        Value::Null => Ok(Value::Null),
        other => Err(GatewayError::Serialization(format!(
            "expected an object for '{}', found {}",
            schema.name,
            type_name(&other)
        ))),
    }
}

fn transform_object(
    schema: &Schema,
    mut map: Map<String, Value>,
    direction: Direction,
) -> GatewayResult<Map<String, Value>> {
    let mut out = Map::new();
    for field in schema.fields {
        let Some(value) = map.remove(field.key) else {
            continue;
        };
        let value = if field.repeated {
            transform_list(field, value, direction)?
        } else {
            transform_single(field, value, direction)?
        };
        out.insert(field.key.to_string(), value);
    }
    Ok(out)
}

fn transform_list(field: &Field, value: Value, direction: Direction) -> GatewayResult<Value> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| transform_single(field, item, direction))
            .collect::<GatewayResult<Vec<_>>>()
            .map(Value::Array),
        Value::Null => Ok(Value::Null),
        other => Err(GatewayError::Serialization(format!(
            "expected a list for '{}', found {}",
            field.key,
            type_name(&other)
        ))),
    }
}

fn transform_single(field: &Field, value: Value, direction: Direction) -> GatewayResult<Value> {
    match field.kind {
        Kind::Any => Ok(value),
        Kind::Object(schema) => transform(schema, value, direction),
        Kind::Leaf(annotations) if annotations.is_empty() => Ok(value),
        Kind::Leaf(annotations) => match value {
            Value::String(s) => transform_leaf(field.key, annotations, &s, direction).map(Value::String),
            Value::Null => Ok(Value::Null),
            other => Err(GatewayError::malformed(
                field.key,
                format!("expected a string, found {}", type_name(&other)),
            )),
        },
    }
}

/// Apply the leaf codecs of `annotations` to a single string value.
pub fn transform_leaf(
    key: &str,
    annotations: Annotations,
    value: &str,
    direction: Direction,
) -> GatewayResult<String> {
    let mut out = match (annotations.hex, direction) {
        (true, Direction::ToBackend) => codec::hex_to_base64(key, value)?,
        (true, Direction::ToClient) => codec::base64_to_hex(key, value)?,
        (false, _) => value.to_string(),
    };
    if let Some(variants) = annotations.variants {
        let index = codec::match_variant(key, &out, variants)?;
        out = match direction {
            Direction::ToBackend => variants[index].to_ascii_uppercase(),
            Direction::ToClient => variants[index].to_string(),
        };
    }
    if annotations.time {
        codec::validate_time(key, &out)?;
    }
    Ok(out)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
