//! Element coercion for generated values.
//!
//! A raw value produced for a category (say a number for an `enum` field) is
//! converted to the field's declared representation before it is stored.

use stub_core::{Representation, StubValue};

use super::timestamp;

/// Convert a generated value to the given representation.
///
/// `Null` is kept as-is for every representation. Sequence, composite and
/// producer representations pass values through unchanged.
pub fn coerce_to_representation(value: StubValue, representation: &Representation) -> StubValue {
    if value.is_null() {
        return value;
    }
    match representation {
        Representation::Text => coerce_to_text(value),
        Representation::Number => coerce_to_number(value),
        Representation::Boolean => StubValue::Bool(is_truthy(&value)),
        Representation::Date => coerce_to_date(value),
        Representation::Sequence
        | Representation::Composite { .. }
        | Representation::Producer { .. } => value,
    }
}

fn coerce_to_text(value: StubValue) -> StubValue {
    match value {
        StubValue::Bool(b) => StubValue::String(b.to_string()),
        StubValue::Int64(i) => StubValue::String(i.to_string()),
        StubValue::Float64(f) => StubValue::String(f.to_string()),
        StubValue::Uuid(u) => StubValue::String(u.hyphenated().to_string()),
        StubValue::DateTime(dt) => StubValue::String(timestamp::format_timestamp(&dt)),
        other => other,
    }
}

fn coerce_to_number(value: StubValue) -> StubValue {
    match value {
        StubValue::Bool(b) => StubValue::Int64(i64::from(b)),
        StubValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                StubValue::Int64(0)
            } else {
                match trimmed.parse::<f64>() {
                    Ok(n) => StubValue::from_number(n),
                    Err(_) => StubValue::Null,
                }
            }
        }
        StubValue::DateTime(dt) => StubValue::Int64(dt.timestamp_millis()),
        StubValue::Uuid(_) => StubValue::Null,
        other => other,
    }
}

fn coerce_to_date(value: StubValue) -> StubValue {
    let parsed = match &value {
        StubValue::DateTime(dt) => Some(*dt),
        StubValue::String(s) => timestamp::parse_timestamp(s),
        StubValue::Int64(millis) => timestamp::from_epoch_millis(*millis),
        StubValue::Float64(millis) if millis.is_finite() => {
            timestamp::from_epoch_millis(*millis as i64)
        }
        _ => None,
    };
    StubValue::DateTime(parsed.unwrap_or_else(timestamp::generate_timestamp_now))
}

/// Truthiness used when a value is stored on a boolean field.
pub fn is_truthy(value: &StubValue) -> bool {
    match value {
        StubValue::Null => false,
        StubValue::Bool(b) => *b,
        StubValue::Int64(i) => *i != 0,
        StubValue::Float64(f) => *f != 0.0 && !f.is_nan(),
        StubValue::String(s) => !s.is_empty(),
        StubValue::Uuid(_) | StubValue::DateTime(_) | StubValue::Array(_) | StubValue::Object(_) => {
            true
        }
    }
}
