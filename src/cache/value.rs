//! Value Codec
//!
//! Maps caller values onto the value attribute. Booleans, integers, floats and
//! null are stored natively so the store can increment and compare them;
//! everything else is serialized to JSON bytes.

use serde_json::{Number, Value};

use crate::document::FieldValue;
use crate::error::Result;

/// Encodes a caller value into its stored representation.
///
/// Integers outside the `i64` range are serialized rather than rounded.
pub fn encode(value: &Value) -> Result<FieldValue> {
    let encoded = match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Boolean(*b),
        Value::Number(n) if n.is_i64() => FieldValue::Integer(n.as_i64().unwrap_or_default()),
        Value::Number(n) if n.is_f64() => FieldValue::Double(n.as_f64().unwrap_or_default()),
        other => FieldValue::Bytes(serde_json::to_vec(other)?),
    };
    Ok(encoded)
}

/// Decodes a stored value attribute.
///
/// Returns `None` when the payload cannot be read back as a value.
pub fn decode(field: &FieldValue) -> Option<Value> {
    match field {
        FieldValue::Null => Some(Value::Null),
        FieldValue::Boolean(b) => Some(Value::Bool(*b)),
        FieldValue::Integer(i) => Some(Value::from(*i)),
        FieldValue::Double(d) => Number::from_f64(*d).map(Value::Number),
        FieldValue::Bytes(bytes) => serde_json::from_slice(bytes).ok(),
        FieldValue::String(text) => serde_json::from_str(text).ok(),
        FieldValue::Timestamp(_) => None,
    }
}
