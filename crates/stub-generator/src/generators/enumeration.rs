//! Enumerated value generator.

use rand::Rng;
use stub_core::{EnumValues, FieldDescriptor, Stub, StubValue};

use crate::generator::GeneratorError;

/// Pick one of the field's enumerated values.
///
/// A list yields one of its elements. A mapping yields the value under a
/// uniformly chosen key when that value is a string or number, and `0`
/// otherwise.
pub fn generate_enum<R: Rng + ?Sized>(
    field: &FieldDescriptor,
    rng: &mut R,
) -> Result<StubValue, GeneratorError> {
    let missing = || GeneratorError::MissingEnumValues(field.property.clone());

    match field.options.enum_values.as_ref().ok_or_else(missing)? {
        EnumValues::List(choices) => {
            if choices.is_empty() {
                return Err(missing());
            }
            let idx = rng.random_range(0..choices.len());
            Ok(yaml_to_stub_value(&choices[idx]))
        }
        EnumValues::Mapping(mapping) => {
            if mapping.is_empty() {
                return Err(missing());
            }
            let idx = rng.random_range(0..mapping.len());
            let value = mapping
                .iter()
                .nth(idx)
                .map(|(_, value)| value)
                .ok_or_else(missing)?;
            Ok(match value {
                serde_yaml::Value::String(_) | serde_yaml::Value::Number(_) => {
                    yaml_to_stub_value(value)
                }
                _ => StubValue::Int64(0),
            })
        }
    }
}

/// Convert a YAML value to a StubValue.
pub fn yaml_to_stub_value(value: &serde_yaml::Value) -> StubValue {
    match value {
        serde_yaml::Value::Null => StubValue::Null,
        serde_yaml::Value::Bool(b) => StubValue::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                StubValue::Int64(i)
            } else if let Some(f) = n.as_f64() {
                StubValue::Float64(f)
            } else {
                StubValue::Null
            }
        }
        serde_yaml::Value::String(s) => StubValue::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            StubValue::Array(seq.iter().map(yaml_to_stub_value).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = Stub::new("");
            for (k, v) in map {
                if let serde_yaml::Value::String(key) = k {
                    object.set(key.clone(), yaml_to_stub_value(v));
                }
            }
            StubValue::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_stub_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use stub_core::Representation;

    #[test]
    fn test_list_enum_picks_member() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = FieldDescriptor::new("status", Representation::Text)
            .with_enum(EnumValues::list(["active", "inactive"]));

        for _ in 0..20 {
            let value = generate_enum(&field, &mut rng).unwrap();
            let s = value.as_str().unwrap();
            assert!(s == "active" || s == "inactive");
        }
    }

    #[test]
    fn test_mapping_enum_picks_value() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = FieldDescriptor::new("role", Representation::Text)
            .with_enum(EnumValues::mapping([("Admin", "admin"), ("User", "user")]));

        for _ in 0..20 {
            let value = generate_enum(&field, &mut rng).unwrap();
            let s = value.as_str().unwrap();
            assert!(s == "admin" || s == "user");
        }
    }

    #[test]
    fn test_mapping_enum_non_scalar_value_is_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut mapping = serde_yaml::Mapping::new();
        mapping.insert("Flag".into(), serde_yaml::Value::Bool(true));
        let field = FieldDescriptor::new("flag", Representation::Number)
            .with_enum(EnumValues::Mapping(mapping));

        assert_eq!(
            generate_enum(&field, &mut rng).unwrap(),
            StubValue::Int64(0)
        );
    }

    #[test]
    fn test_missing_enum_fails() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = FieldDescriptor::new("status", Representation::Text);

        let err = generate_enum(&field, &mut rng).unwrap_err();
        assert_eq!(err.to_string(), "Enum for field \"status\" was not provided");
    }

    #[test]
    fn test_empty_enum_fails() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = FieldDescriptor::new("status", Representation::Text)
            .with_enum(EnumValues::List(vec![]));

        assert!(matches!(
            generate_enum(&field, &mut rng),
            Err(GeneratorError::MissingEnumValues(_))
        ));
    }

    #[test]
    fn test_yaml_to_stub_value() {
        assert_eq!(
            yaml_to_stub_value(&serde_yaml::Value::Bool(true)),
            StubValue::Bool(true)
        );
        assert_eq!(
            yaml_to_stub_value(&serde_yaml::Value::Number(42.into())),
            StubValue::Int64(42)
        );
        assert_eq!(
            yaml_to_stub_value(&serde_yaml::Value::String("test".to_string())),
            StubValue::String("test".to_string())
        );
        assert_eq!(yaml_to_stub_value(&serde_yaml::Value::Null), StubValue::Null);
    }
}
