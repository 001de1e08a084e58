//! Synthesis settings.
//!
//! Settings can be embedded in the schema file under a `synthesis:` key:
//!
//! ```yaml
//! synthesis:
//!   to_many: { min: 1, max: 3 }
//!   array_length: { min: 0, max: 5 }
//! ```

use crate::schema::SchemaError;
use serde::{Deserialize, Serialize};

/// Default size range of a to-many relation.
pub const DEFAULT_TO_MANY: Bounds = Bounds::new(3, 10);

/// Default length range of declared arrays and of `create_many` batches.
pub const DEFAULT_ARRAY_LENGTH: Bounds = Bounds::new(3, 10);

/// Inclusive `[min, max]` range for randomized counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum (inclusive)
    pub min: usize,
    /// Maximum (inclusive)
    pub max: usize,
}

impl Bounds {
    /// Create a new range.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Reject ranges whose minimum exceeds the maximum.
    pub fn validate(&self, name: &str) -> Result<(), SchemaError> {
        if self.min > self.max {
            return Err(SchemaError::InvalidBounds {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Tunables for the graph synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Number of related stubs built for a to-many relation
    pub to_many: Bounds,

    /// Length of generated arrays and default batch size
    pub array_length: Bounds,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            to_many: DEFAULT_TO_MANY,
            array_length: DEFAULT_ARRAY_LENGTH,
        }
    }
}

impl SynthesisConfig {
    /// Validate every range.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.to_many.validate("to_many")?;
        self.array_length.validate("array_length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: SynthesisConfig = serde_yaml::from_str("to_many: { min: 1, max: 2 }").unwrap();
        assert_eq!(config.to_many, Bounds::new(1, 2));
        assert_eq!(config.array_length, DEFAULT_ARRAY_LENGTH);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = SynthesisConfig {
            to_many: Bounds::new(5, 1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SchemaError::InvalidBounds { min: 5, max: 1, .. })
        ));
        assert!(SynthesisConfig::default().validate().is_ok());
    }
}
