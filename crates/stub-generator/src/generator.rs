//! Value generator: one routine per value category plus array expansion.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::RngCore;
use stub_core::{
    Bounds, FieldDescriptor, Representation, StubValue, ValueCategory, DEFAULT_ARRAY_LENGTH,
};
use uuid::Uuid;

use crate::generators::{array, enumeration, numeric, text, timestamp, uuid as uuid_gen};

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Enum-category field without enumerated choices
    #[error("Enum for field \"{0}\" was not provided")]
    MissingEnumValues(String),

    /// Entity type missing from the type registry
    #[error("Entity not registered: {0}")]
    EntityNotFound(String),

    /// Schema error
    #[error("Schema error: {0}")]
    SchemaError(#[from] stub_core::SchemaError),
}

/// Produces raw values for a field.
///
/// Every category routine has a default; implementors override only the
/// ones they want to change. The provided [`ValueGenerator::generate`]
/// dispatches on the category, expands arrays and coerces the result to the
/// field's representation.
pub trait ValueGenerator: Send + Sync {
    /// Random boolean.
    fn generate_boolean(&self, _field: &FieldDescriptor, rng: &mut dyn RngCore) -> bool {
        numeric::generate_boolean(rng)
    }

    /// Random number.
    fn generate_number(&self, _field: &FieldDescriptor, rng: &mut dyn RngCore) -> f64 {
        numeric::generate_number(rng)
    }

    /// Random sentence.
    fn generate_string(&self, _field: &FieldDescriptor, rng: &mut dyn RngCore) -> String {
        text::generate_string(rng)
    }

    /// Timestamp. The default ignores the RNG and returns the current time.
    fn generate_date(&self, _field: &FieldDescriptor, _rng: &mut dyn RngCore) -> DateTime<Utc> {
        timestamp::generate_timestamp_now()
    }

    /// Random UUID v4.
    fn generate_uuid(&self, _field: &FieldDescriptor, rng: &mut dyn RngCore) -> Uuid {
        uuid_gen::generate_uuid_v4(rng)
    }

    /// One of the field's enumerated values.
    fn generate_enum(
        &self,
        field: &FieldDescriptor,
        rng: &mut dyn RngCore,
    ) -> Result<StubValue, GeneratorError> {
        enumeration::generate_enum(field, rng)
    }

    /// Random integer in `[min, max]`.
    fn generate_random_number(&self, min: i64, max: i64, rng: &mut dyn RngCore) -> i64 {
        numeric::generate_random_number(rng, min, max)
    }

    /// Length range for array fields.
    fn array_length(&self) -> Bounds {
        DEFAULT_ARRAY_LENGTH
    }

    /// Raw value of a category, before coercion.
    fn generate_category(
        &self,
        field: &FieldDescriptor,
        category: ValueCategory,
        rng: &mut dyn RngCore,
    ) -> Result<StubValue, GeneratorError> {
        Ok(match category {
            ValueCategory::Boolean => StubValue::Bool(self.generate_boolean(field, rng)),
            ValueCategory::Number => StubValue::from_number(self.generate_number(field, rng)),
            ValueCategory::String => StubValue::String(self.generate_string(field, rng)),
            ValueCategory::Date => StubValue::DateTime(self.generate_date(field, rng)),
            ValueCategory::Uuid => StubValue::Uuid(self.generate_uuid(field, rng)),
            ValueCategory::Enum => self.generate_enum(field, rng)?,
        })
    }

    /// Value of a category shaped for the field.
    ///
    /// Array fields and sequence representations yield a random-length
    /// array. Sequence elements are left raw; every other value is coerced
    /// to `representation`.
    fn generate(
        &self,
        field: &FieldDescriptor,
        category: ValueCategory,
        representation: &Representation,
        rng: &mut dyn RngCore,
    ) -> Result<StubValue, GeneratorError> {
        let is_sequence = *representation == Representation::Sequence;

        if field.options.array || is_sequence {
            let bounds = self.array_length();
            let length = self.generate_random_number(bounds.min as i64, bounds.max as i64, rng);

            let mut items = Vec::with_capacity(length.max(0) as usize);
            for _ in 0..length.max(0) {
                let item = self.generate_category(field, category, rng)?;
                items.push(if is_sequence {
                    item
                } else {
                    array::coerce_to_representation(item, representation)
                });
            }
            return Ok(StubValue::Array(items));
        }

        let value = self.generate_category(field, category, rng)?;
        Ok(array::coerce_to_representation(value, representation))
    }
}

type Override<T> = Arc<dyn Fn(&FieldDescriptor, &mut dyn RngCore) -> T + Send + Sync>;

/// Caller-supplied replacements for individual category routines.
///
/// Unset entries fall back to the defaults.
#[derive(Clone, Default)]
pub struct GeneratorOverrides {
    boolean: Option<Override<bool>>,
    number: Option<Override<f64>>,
    string: Option<Override<String>>,
    date: Option<Override<DateTime<Utc>>>,
    uuid: Option<Override<Uuid>>,
    enumeration: Option<Override<Result<StubValue, GeneratorError>>>,
}

impl GeneratorOverrides {
    /// Create an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boolean<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldDescriptor, &mut dyn RngCore) -> bool + Send + Sync + 'static,
    {
        self.boolean = Some(Arc::new(f));
        self
    }

    pub fn with_number<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldDescriptor, &mut dyn RngCore) -> f64 + Send + Sync + 'static,
    {
        self.number = Some(Arc::new(f));
        self
    }

    pub fn with_string<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldDescriptor, &mut dyn RngCore) -> String + Send + Sync + 'static,
    {
        self.string = Some(Arc::new(f));
        self
    }

    pub fn with_date<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldDescriptor, &mut dyn RngCore) -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.date = Some(Arc::new(f));
        self
    }

    pub fn with_uuid<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldDescriptor, &mut dyn RngCore) -> Uuid + Send + Sync + 'static,
    {
        self.uuid = Some(Arc::new(f));
        self
    }

    pub fn with_enum<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldDescriptor, &mut dyn RngCore) -> Result<StubValue, GeneratorError>
            + Send
            + Sync
            + 'static,
    {
        self.enumeration = Some(Arc::new(f));
        self
    }

    /// Whether no routine is overridden.
    pub fn is_empty(&self) -> bool {
        self.boolean.is_none()
            && self.number.is_none()
            && self.string.is_none()
            && self.date.is_none()
            && self.uuid.is_none()
            && self.enumeration.is_none()
    }
}

impl fmt::Debug for GeneratorOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOverrides")
            .field("boolean", &self.boolean.is_some())
            .field("number", &self.number.is_some())
            .field("string", &self.string.is_some())
            .field("date", &self.date.is_some())
            .field("uuid", &self.uuid.is_some())
            .field("enum", &self.enumeration.is_some())
            .finish()
    }
}

/// Default [`ValueGenerator`] with optional per-category overrides.
#[derive(Debug, Clone)]
pub struct Generator {
    overrides: GeneratorOverrides,
    array_length: Bounds,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorOverrides::default())
    }
}

impl Generator {
    /// Create a generator with the given overrides.
    pub fn new(overrides: GeneratorOverrides) -> Self {
        Self {
            overrides,
            array_length: DEFAULT_ARRAY_LENGTH,
        }
    }

    /// Set the length range for array fields.
    pub fn with_array_length(mut self, bounds: Bounds) -> Self {
        self.array_length = bounds;
        self
    }
}

impl ValueGenerator for Generator {
    fn generate_boolean(&self, field: &FieldDescriptor, rng: &mut dyn RngCore) -> bool {
        match &self.overrides.boolean {
            Some(f) => f(field, rng),
            None => numeric::generate_boolean(rng),
        }
    }

    fn generate_number(&self, field: &FieldDescriptor, rng: &mut dyn RngCore) -> f64 {
        match &self.overrides.number {
            Some(f) => f(field, rng),
            None => numeric::generate_number(rng),
        }
    }

    fn generate_string(&self, field: &FieldDescriptor, rng: &mut dyn RngCore) -> String {
        match &self.overrides.string {
            Some(f) => f(field, rng),
            None => text::generate_string(rng),
        }
    }

    fn generate_date(&self, field: &FieldDescriptor, rng: &mut dyn RngCore) -> DateTime<Utc> {
        match &self.overrides.date {
            Some(f) => f(field, rng),
            None => timestamp::generate_timestamp_now(),
        }
    }

    fn generate_uuid(&self, field: &FieldDescriptor, rng: &mut dyn RngCore) -> Uuid {
        match &self.overrides.uuid {
            Some(f) => f(field, rng),
            None => uuid_gen::generate_uuid_v4(rng),
        }
    }

    fn generate_enum(
        &self,
        field: &FieldDescriptor,
        rng: &mut dyn RngCore,
    ) -> Result<StubValue, GeneratorError> {
        match &self.overrides.enumeration {
            Some(f) => f(field, rng),
            None => enumeration::generate_enum(field, rng),
        }
    }

    fn array_length(&self) -> Bounds {
        self.array_length
    }
}
