//! SQL value model and per-version JSON codec.
//!
//! The protocol speaks two encodings for the same value domain:
//! - v1 uses raw JSON scalars, with blobs wrapped as `{"base64": …}`;
//! - v2/v3 use tagged `{"type": …, "value": …}` objects, with integers
//!   carried as decimal strings so 64-bit magnitudes survive JSON.
//!
//! Decoding is shared (`decode_any`): request arguments may arrive in either
//! shape regardless of route, and both encodings round-trip losslessly
//! through it.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use serde_json::{Map, Number, Value as JsonValue};

/// A single SQL value as held by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    /// 64-bit signed integer. Serialized as a decimal string in v2/v3 so the
    /// full range survives JSON number parsing on the client side.
    Integer(i64),
    /// IEEE-754 double.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Opaque bytes; base64 on the wire.
    Blob(Vec<u8>),
}

/// Decode a wire value in either the v1 scalar shape or the v2/v3 tagged
/// shape into a native [`Value`].
pub fn decode_any(wire: &JsonValue) -> Result<Value, String> {
    match wire {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Number(n) => decode_number(n),
        JsonValue::Bool(_) => Err("boolean is not a SQL value".to_string()),
        JsonValue::Array(_) => Err("array is not a SQL value".to_string()),
        JsonValue::Object(map) => decode_tagged(map),
    }
}

/// Encode a native value in the v1 shape: raw scalars, blobs as `{base64}`.
pub fn encode_v1(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::Number(Number::from(*i)),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(n) => JsonValue::Number(n),
            // NaN/infinity have no JSON representation
            None => JsonValue::Null,
        },
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Blob(bytes) => serde_json::json!({ "base64": STANDARD.encode(bytes) }),
    }
}

/// Encode a native value in the v2/v3 tagged shape.
pub fn encode_v2(value: &Value) -> JsonValue {
    match value {
        Value::Null => serde_json::json!({ "type": "null" }),
        Value::Integer(i) => serde_json::json!({ "type": "integer", "value": i.to_string() }),
        Value::Float(f) => {
            let number = Number::from_f64(*f).map(JsonValue::Number).unwrap_or(JsonValue::Null);
            serde_json::json!({ "type": "float", "value": number })
        },
        Value::Text(s) => serde_json::json!({ "type": "text", "value": s }),
        Value::Blob(bytes) => serde_json::json!({ "type": "blob", "value": STANDARD.encode(bytes) }),
    }
}

fn decode_number(n: &Number) -> Result<Value, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Integer(i));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| format!("number {} is outside the supported value range", n))
}

fn decode_tagged(map: &Map<String, JsonValue>) -> Result<Value, String> {
    let tag = match map.get("type").and_then(JsonValue::as_str) {
        Some(tag) => tag,
        // v1 blob encoding carries no type tag, only the payload key
        None if map.contains_key("base64") => "blob",
        None => return Err("value object is missing a `type` field".to_string()),
    };

    match tag {
        "null" => Ok(Value::Null),
        "integer" => decode_integer(map.get("value")),
        "float" => decode_float(map.get("value")),
        "text" => match map.get("value").and_then(JsonValue::as_str) {
            Some(s) => Ok(Value::Text(s.to_string())),
            None => Err("text value must be a string".to_string()),
        },
        "blob" => decode_blob(map.get("value").or_else(|| map.get("base64"))),
        other => Err(format!("unknown value type '{}'", other)),
    }
}

fn decode_integer(value: Option<&JsonValue>) -> Result<Value, String> {
    match value {
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| format!("integer {} does not fit in 64 bits", n)),
        Some(JsonValue::String(s)) => s
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| format!("integer string '{}' is invalid: {}", s, e)),
        _ => Err("integer value must be a number or a decimal string".to_string()),
    }
}

fn decode_float(value: Option<&JsonValue>) -> Result<Value, String> {
    match value {
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| format!("float {} is not representable", n)),
        Some(JsonValue::String(s)) => s
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| format!("float string '{}' is invalid: {}", s, e)),
        _ => Err("float value must be a number".to_string()),
    }
}

fn decode_blob(value: Option<&JsonValue>) -> Result<Value, String> {
    let encoded = match value.and_then(JsonValue::as_str) {
        Some(s) => s,
        None => return Err("blob value must be a base64 string".to_string()),
    };
    // Clients send base64 both with and without padding; normalize to unpadded.
    let trimmed = encoded.trim_end_matches('=');
    STANDARD_NO_PAD
        .decode(trimmed)
        .map(Value::Blob)
        .map_err(|e| format!("blob base64 is invalid: {}", e))
}
