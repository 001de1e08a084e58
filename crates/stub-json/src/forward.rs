//! Forward conversion: Stub → JSON value.
//!
//! Field order of a stub is kept in the rendered object.

use chrono::SecondsFormat;
use serde_json::{json, Map};
use stub_core::{Stub, StubValue};

/// Wrapper for JSON values.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonValue(pub serde_json::Value);

impl JsonValue {
    /// Get the inner JSON value.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the inner JSON value.
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<&StubValue> for JsonValue {
    fn from(value: &StubValue) -> Self {
        match value {
            StubValue::Null => JsonValue(serde_json::Value::Null),

            StubValue::Bool(b) => JsonValue(json!(*b)),

            StubValue::Int64(i) => JsonValue(json!(*i)),

            // Non-finite floats have no JSON form
            StubValue::Float64(f) => match serde_json::Number::from_f64(*f) {
                Some(n) => JsonValue(serde_json::Value::Number(n)),
                None => JsonValue(serde_json::Value::Null),
            },

            StubValue::String(s) => JsonValue(json!(s)),

            StubValue::Uuid(u) => JsonValue(json!(u.hyphenated().to_string())),

            StubValue::DateTime(dt) => {
                JsonValue(json!(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
            }

            StubValue::Array(items) => JsonValue(serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| JsonValue::from(item).into_inner())
                    .collect(),
            )),

            StubValue::Object(stub) => JsonValue::from(stub),
        }
    }
}

impl From<StubValue> for JsonValue {
    fn from(value: StubValue) -> Self {
        JsonValue::from(&value)
    }
}

impl From<&Stub> for JsonValue {
    fn from(stub: &Stub) -> Self {
        JsonValue(stub_to_json(stub))
    }
}

impl From<Stub> for JsonValue {
    fn from(stub: Stub) -> Self {
        JsonValue::from(&stub)
    }
}

fn stub_to_json(stub: &Stub) -> serde_json::Value {
    let map: Map<String, serde_json::Value> = stub
        .iter()
        .map(|(name, value)| (name.to_string(), JsonValue::from(value).into_inner()))
        .collect();
    serde_json::Value::Object(map)
}

/// Render a batch of stubs as a JSON array.
pub fn stubs_to_json(stubs: &[Stub]) -> serde_json::Value {
    serde_json::Value::Array(stubs.iter().map(stub_to_json).collect())
}
