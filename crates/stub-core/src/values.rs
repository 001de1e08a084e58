//! Value representations for synthesized stubs.
//!
//! A [`Stub`] is an ordered mapping from field name to [`StubValue`]. Related
//! entities and nested composites are stored as [`StubValue::Object`], to-many
//! relations as a [`StubValue::Array`] of objects.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A tagged value stored on a stub.
#[derive(Debug, Clone, PartialEq)]
pub enum StubValue {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// String value
    String(String),

    /// UUID value
    Uuid(Uuid),

    /// Date/time in UTC
    DateTime(DateTime<Utc>),

    /// Sequence of values
    Array(Vec<StubValue>),

    /// Nested record (related entity or composite)
    Object(Stub),
}

impl StubValue {
    /// Build a numeric value, keeping integral numbers as `Int64`.
    pub fn from_number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Self::Int64(value as i64)
        } else {
            Self::Float64(value)
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            Self::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a UUID.
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Try to get this value as a DateTime.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&Vec<StubValue>> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get this value as a nested stub.
    pub fn as_stub(&self) -> Option<&Stub> {
        match self {
            Self::Object(stub) => Some(stub),
            _ => None,
        }
    }
}

impl From<bool> for StubValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for StubValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for StubValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for StubValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StubValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Uuid> for StubValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for StubValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Stub> for StubValue {
    fn from(value: Stub) -> Self {
        Self::Object(value)
    }
}

/// A synthesized record.
///
/// Field order is insertion order. A field is unset while it is absent from
/// the mapping; an explicit [`StubValue::Null`] counts as set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stub {
    type_name: String,
    fields: Vec<(String, StubValue)>,
}

impl Stub {
    /// Create an empty stub for the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<StubValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Name of the entity or composite type this stub instantiates.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&StubValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Whether the field holds a value (including an explicit null).
    pub fn is_set(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    /// Set a field, replacing any existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<StubValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a nested to-one record.
    pub fn get_stub(&self, name: &str) -> Option<&Stub> {
        self.get(name).and_then(StubValue::as_stub)
    }

    /// Get the records of a to-many relation.
    pub fn get_stubs(&self, name: &str) -> Option<Vec<&Stub>> {
        self.get(name)
            .and_then(StubValue::as_array)
            .map(|items| items.iter().filter_map(StubValue::as_stub).collect())
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StubValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of set fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
