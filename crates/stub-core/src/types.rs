//! Type vocabulary for stub synthesis.
//!
//! This module defines the native [`Representation`] of a field, the
//! [`GenerationMode`] attached to timestamp columns, relation
//! [`Cardinality`], the semantic [`ValueCategory`] handed to the value
//! generator, and the fixed lookup table that maps declared storage-type
//! keywords onto those categories.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Native representation type of a field.
///
/// The representation decides how a generated value is coerced before it is
/// stored on the stub, and acts as the last-resort source of a value category
/// when no generation mode or storage keyword applies.
///
/// # YAML Format
///
/// Simple representations can be specified as strings:
/// ```yaml
/// type: text
/// type: number
/// type: date
/// ```
///
/// Named representations use object format:
/// ```yaml
/// type:
///   type: composite
///   name: Address
/// type:
///   type: producer
///   name: next_sku
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    /// Text value
    Text,

    /// Numeric value
    Number,

    /// Boolean value
    Boolean,

    /// Timestamp value
    Date,

    /// Sequence of values
    Sequence,

    /// Nested structured value populated property by property
    Composite {
        /// Name of the composite type in the type registry
        name: String,
    },

    /// Value returned by a registered zero-argument producer
    Producer {
        /// Name of the producer in the type registry
        name: String,
    },
}

impl Representation {
    /// Create a composite representation.
    pub fn composite(name: impl Into<String>) -> Self {
        Self::Composite { name: name.into() }
    }

    /// Create a producer representation.
    pub fn producer(name: impl Into<String>) -> Self {
        Self::Producer { name: name.into() }
    }

    /// Value category implied by a scalar representation, if any.
    pub fn category(&self) -> Option<ValueCategory> {
        match self {
            Self::Text => Some(ValueCategory::String),
            Self::Number => Some(ValueCategory::Number),
            Self::Boolean => Some(ValueCategory::Boolean),
            Self::Date => Some(ValueCategory::Date),
            Self::Sequence | Self::Composite { .. } | Self::Producer { .. } => None,
        }
    }

    fn simple_name(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Date => Some("date"),
            Self::Sequence => Some("sequence"),
            Self::Composite { .. } | Self::Producer { .. } => None,
        }
    }

    fn from_simple_name(value: &str) -> Option<Self> {
        match value {
            "text" | "string" => Some(Self::Text),
            "number" => Some(Self::Number),
            "boolean" | "bool" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            "sequence" | "array" => Some(Self::Sequence),
            _ => None,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite { name } => write!(f, "composite({name})"),
            Self::Producer { name } => write!(f, "producer({name})"),
            other => f.write_str(other.simple_name().unwrap_or_default()),
        }
    }
}

// Supports both simple string format ("text") and object format
// ({"type": "composite", "name": "Address"})

impl Serialize for Representation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Composite { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "composite")?;
                map.serialize_entry("name", name)?;
                map.end()
            }
            Self::Producer { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "producer")?;
                map.serialize_entry("name", name)?;
                map.end()
            }
            other => serializer.serialize_str(other.simple_name().unwrap_or_default()),
        }
    }
}

impl<'de> Deserialize<'de> for Representation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct RepresentationVisitor;

        impl<'de> Visitor<'de> for RepresentationVisitor {
            type Value = Representation;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or map representing a field representation")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Representation::from_simple_name(value)
                    .ok_or_else(|| E::custom(format!("unknown representation: {value}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut name: Option<String> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "type" => type_name = Some(map.next_value()?),
                        "name" => name = Some(map.next_value()?),
                        _ => {
                            map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                match type_name.as_str() {
                    "composite" => Ok(Representation::Composite {
                        name: name.ok_or_else(|| M::Error::missing_field("name"))?,
                    }),
                    "producer" => Ok(Representation::Producer {
                        name: name.ok_or_else(|| M::Error::missing_field("name"))?,
                    }),
                    other => Representation::from_simple_name(other).ok_or_else(|| {
                        M::Error::custom(format!("unknown representation: {other}"))
                    }),
                }
            }
        }

        deserializer.deserialize_any(RepresentationVisitor)
    }
}

/// Generation mode of a field.
///
/// Timestamp modes take priority over the declared storage type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Plain column
    #[default]
    Regular,
    /// Set when the record is created
    CreateTimestamp,
    /// Set when the record is updated
    UpdateTimestamp,
    /// Soft-delete marker, always synthesized as null
    DeleteTimestamp,
}

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One related record
    ToOne,
    /// A randomized number of related records
    ToMany,
}

/// Semantic value category understood by the value generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    Boolean,
    Number,
    String,
    Date,
    Uuid,
    Enum,
}

/// Result of looking a storage keyword up in the fixed storage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// Generate a value of this category
    Category(ValueCategory),
    /// Array-typed storage is synthesized as an empty sequence
    EmptySequence,
}

/// Map a declared storage-type keyword onto a [`StorageClass`].
///
/// Returns `None` for keywords outside the table, in which case the field's
/// representation decides.
pub fn storage_class(keyword: &str) -> Option<StorageClass> {
    let class = match keyword {
        "uuid" => StorageClass::Category(ValueCategory::Uuid),

        "int" | "int2" | "int4" | "int8" | "int64" | "integer" | "unsigned big int" | "tinyint"
        | "smallint" | "mediumint" | "bigint" | "dec" | "decimal" | "smalldecimal" | "fixed"
        | "numeric" | "number" | "float" | "float4" | "float8" | "double"
        | "double precision" | "real" => StorageClass::Category(ValueCategory::Number),

        "character varying" | "varying" | "nvarchar" | "national" | "character" | "native"
        | "varchar" | "char" | "nchar" | "varchar2" | "nvarchar2" | "alphanum" | "shorttext"
        | "raw" | "binary" | "varbinary" | "string" | "tinytext" | "mediumtext" | "text"
        | "ntext" | "citext" | "longtext" => StorageClass::Category(ValueCategory::String),

        "date"
        | "datetime"
        | "datetime2"
        | "datetimeoffset"
        | "time"
        | "time with time zone"
        | "time without time zone"
        | "timestamp"
        | "timestamptz"
        | "timestamp without time zone"
        | "timestamp with time zone"
        | "timestamp with local time zone" => StorageClass::Category(ValueCategory::Date),

        "boolean" | "bool" => StorageClass::Category(ValueCategory::Boolean),

        "enum" | "simple-enum" => StorageClass::Category(ValueCategory::Enum),

        "simple-array" | "array" => StorageClass::EmptySequence,

        _ => return None,
    };
    Some(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_class_lookup() {
        assert_eq!(
            storage_class("varchar"),
            Some(StorageClass::Category(ValueCategory::String))
        );
        assert_eq!(
            storage_class("double precision"),
            Some(StorageClass::Category(ValueCategory::Number))
        );
        assert_eq!(
            storage_class("timestamp with time zone"),
            Some(StorageClass::Category(ValueCategory::Date))
        );
        assert_eq!(
            storage_class("uuid"),
            Some(StorageClass::Category(ValueCategory::Uuid))
        );
        assert_eq!(
            storage_class("simple-enum"),
            Some(StorageClass::Category(ValueCategory::Enum))
        );
        assert_eq!(storage_class("simple-array"), Some(StorageClass::EmptySequence));
        assert_eq!(storage_class("geometry"), None);
    }

    #[test]
    fn test_representation_category() {
        assert_eq!(Representation::Text.category(), Some(ValueCategory::String));
        assert_eq!(Representation::Date.category(), Some(ValueCategory::Date));
        assert_eq!(Representation::Sequence.category(), None);
        assert_eq!(Representation::composite("Address").category(), None);
    }

    #[test]
    fn test_deserialize_simple_string() {
        let repr: Representation = serde_yaml::from_str("number").unwrap();
        assert_eq!(repr, Representation::Number);

        let repr: Representation = serde_yaml::from_str("bool").unwrap();
        assert_eq!(repr, Representation::Boolean);
    }

    #[test]
    fn test_deserialize_map_format() {
        let yaml = "type: composite\nname: Address";
        let repr: Representation = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(repr, Representation::composite("Address"));

        let yaml = "type: producer\nname: sku";
        let repr: Representation = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(repr, Representation::producer("sku"));

        let yaml = "type: text";
        let repr: Representation = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(repr, Representation::Text);
    }

    #[test]
    fn test_deserialize_errors() {
        assert!(serde_yaml::from_str::<Representation>("blob").is_err());
        assert!(serde_yaml::from_str::<Representation>("type: composite").is_err());
    }

    #[test]
    fn test_serialize_roundtrip_named() {
        let repr = Representation::composite("Address");
        let yaml = serde_yaml::to_string(&repr).unwrap();
        let parsed: Representation = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(repr, parsed);
    }

    #[test]
    fn test_generation_mode_serde() {
        let mode: GenerationMode = serde_yaml::from_str("delete_timestamp").unwrap();
        assert_eq!(mode, GenerationMode::DeleteTimestamp);
        assert_eq!(GenerationMode::default(), GenerationMode::Regular);
    }
}
