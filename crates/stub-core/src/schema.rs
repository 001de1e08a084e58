//! Schema metadata for stub synthesis.
//!
//! This module defines the descriptors the synthesizer consumes and the
//! [`SchemaIntrospector`] boundary it reads them through.
//!
//! ## Type Hierarchy
//!
//! **Descriptors** (what the synthesizer sees):
//! - `FieldDescriptor` - One property of an entity type
//! - `RelationDescriptor` - Association to another entity type
//! - `JoinFieldDescriptor` - Foreign-key field declared on a relation
//!
//! **Store** (YAML-backed introspector):
//! - `EntityDefinition` - One entity type with its descriptors
//! - `EntitySchema` - Collection of entity and composite definitions

use crate::config::SynthesisConfig;
use crate::registry::{CompositeType, TypeRegistry};
use crate::types::{Cardinality, GenerationMode, Representation};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Entity not found in schema
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Two entities share a name
    #[error("Entity '{0}' is declared more than once")]
    DuplicateEntity(String),

    /// `extends` names an entity that is not declared
    #[error("Entity '{entity}' extends unknown entity '{ancestor}'")]
    UnknownAncestor { entity: String, ancestor: String },

    /// The inheritance chain loops back on itself
    #[error("Inheritance cycle through entity '{0}'")]
    InheritanceCycle(String),

    /// A range setting has min > max
    #[error("Invalid bounds for '{name}': min {min} > max {max}")]
    InvalidBounds { name: String, min: usize, max: usize },
}

// ============================================================================
// Descriptors
// ============================================================================

/// Enumerated choices declared on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValues {
    /// Ordered list of choices
    List(Vec<serde_yaml::Value>),

    /// Name → value mapping
    Mapping(serde_yaml::Mapping),
}

impl EnumValues {
    /// Build an ordered list of string choices.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(
            values
                .into_iter()
                .map(|v| serde_yaml::Value::String(v.into()))
                .collect(),
        )
    }

    /// Build a name → value mapping.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<serde_yaml::Value>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.into()), v.into()))
                .collect(),
        )
    }
}

/// Options attached to a field descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Declared storage-type keyword (e.g. `varchar`, `uuid`, `enum`)
    #[serde(default, rename = "storage", skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,

    /// Explicit storage-field name, used to match join fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_name: Option<String>,

    /// Whether the column is nullable
    #[serde(default)]
    pub nullable: bool,

    /// Whether the field is part of the primary key
    #[serde(default)]
    pub primary: bool,

    /// Whether the field holds an array of values
    #[serde(default)]
    pub array: bool,

    /// Enumerated choices for enum storage
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<EnumValues>,
}

/// Schema metadata for one property of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Property name on the stub
    #[serde(rename = "name")]
    pub property: String,

    /// Native representation type
    #[serde(rename = "type")]
    pub representation: Representation,

    /// Generation mode
    #[serde(default)]
    pub mode: GenerationMode,

    /// Storage options
    #[serde(flatten)]
    pub options: FieldOptions,
}

impl FieldDescriptor {
    /// Create a regular field with default options.
    pub fn new(property: impl Into<String>, representation: Representation) -> Self {
        Self {
            property: property.into(),
            representation,
            mode: GenerationMode::Regular,
            options: FieldOptions::default(),
        }
    }

    /// Set the storage-type keyword.
    pub fn storage(mut self, keyword: impl Into<String>) -> Self {
        self.options.storage_type = Some(keyword.into());
        self
    }

    /// Set the explicit storage-field name.
    pub fn storage_name(mut self, name: impl Into<String>) -> Self {
        self.options.storage_name = Some(name.into());
        self
    }

    /// Mark the field as part of the primary key.
    pub fn primary(mut self) -> Self {
        self.options.primary = true;
        self
    }

    /// Mark the field as an array.
    pub fn array(mut self) -> Self {
        self.options.array = true;
        self
    }

    /// Mark the field as nullable.
    pub fn nullable(mut self) -> Self {
        self.options.nullable = true;
        self
    }

    /// Set the generation mode.
    pub fn mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Declare enumerated choices.
    pub fn with_enum(mut self, values: EnumValues) -> Self {
        self.options.enum_values = Some(values);
        self
    }

    /// Name the field is stored under: the explicit storage name, else the property.
    pub fn storage_key(&self) -> &str {
        self.options
            .storage_name
            .as_deref()
            .unwrap_or(&self.property)
    }

    /// Whether the field is part of the primary key.
    pub fn is_primary(&self) -> bool {
        self.options.primary
    }
}

/// Closure resolving a relation target on demand.
pub type TargetResolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Reference to the entity type a relation points at.
#[derive(Clone)]
pub enum RelationTarget {
    /// Target known by name
    Named(String),

    /// Target resolved lazily; `None` means the name cannot be determined
    Lazy(TargetResolver),
}

impl RelationTarget {
    /// Create a lazily resolved target.
    pub fn lazy<F>(resolver: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self::Lazy(Arc::new(resolver))
    }

    /// Resolve the target entity name.
    pub fn resolve(&self) -> Option<String> {
        match self {
            Self::Named(name) => Some(name.clone()),
            Self::Lazy(resolver) => resolver(),
        }
    }
}

impl fmt::Debug for RelationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl Serialize for RelationTarget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.resolve() {
            Some(name) => serializer.serialize_str(&name),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for RelationTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::Named)
    }
}

/// Foreign-key field declared on the owning side of a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinFieldDescriptor {
    /// Property name of the relation this join field belongs to
    #[serde(default, skip_serializing)]
    pub property: String,

    /// Explicit storage-field name of the local foreign-key field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl JoinFieldDescriptor {
    /// Join field located through the relation's property name.
    pub fn implicit(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            name: None,
        }
    }

    /// Join field located through an explicit storage name.
    pub fn named(property: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            name: Some(name.into()),
        }
    }

    /// Key compared against each local field's storage key.
    pub fn lookup_key(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.property)
    }
}

/// Association from one entity type to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Property name on the stub
    #[serde(rename = "name")]
    pub property: String,

    /// Cardinality
    #[serde(rename = "kind")]
    pub cardinality: Cardinality,

    /// Target entity type
    pub target: RelationTarget,

    /// Join fields declared on this relation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub join_fields: Vec<JoinFieldDescriptor>,
}

impl RelationDescriptor {
    /// Create a to-one relation.
    pub fn to_one(property: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(property, Cardinality::ToOne, RelationTarget::Named(target.into()))
    }

    /// Create a to-many relation.
    pub fn to_many(property: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(property, Cardinality::ToMany, RelationTarget::Named(target.into()))
    }

    /// Create a relation with an arbitrary target reference.
    pub fn new(property: impl Into<String>, cardinality: Cardinality, target: RelationTarget) -> Self {
        Self {
            property: property.into(),
            cardinality,
            target,
            join_fields: Vec::new(),
        }
    }

    /// Declare a join field located through the relation's property name.
    pub fn join(mut self) -> Self {
        self.join_fields
            .push(JoinFieldDescriptor::implicit(self.property.clone()));
        self
    }

    /// Declare a join field located through an explicit storage name.
    pub fn join_on(mut self, name: impl Into<String>) -> Self {
        self.join_fields
            .push(JoinFieldDescriptor::named(self.property.clone(), name));
        self
    }

    /// Whether this relation resolves to the given entity type.
    pub fn targets(&self, entity: &str) -> bool {
        self.target.resolve().is_some_and(|name| name == entity)
    }
}

// ============================================================================
// Introspector
// ============================================================================

/// Source of schema metadata for entity types.
///
/// Lookups for unknown entities return empty slices.
pub trait SchemaIntrospector: Send + Sync {
    /// Own field descriptors of an entity type.
    fn fields_of(&self, entity: &str) -> &[FieldDescriptor];

    /// Own relation descriptors of an entity type.
    fn relations_of(&self, entity: &str) -> &[RelationDescriptor];

    /// Nearest ancestor of an entity type.
    fn ancestor_of(&self, entity: &str) -> Option<&str>;

    /// Join fields declared on the relation `property` of an entity type.
    fn join_fields_of(&self, entity: &str, property: &str) -> &[JoinFieldDescriptor] {
        self.relations_of(entity)
            .iter()
            .find(|relation| relation.property == property)
            .map(|relation| relation.join_fields.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestors of an entity type, nearest first. Stops at the first repeat.
    fn ancestry(&self, entity: &str) -> Vec<&str> {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = self.ancestor_of(entity);
        while let Some(ancestor) = current {
            if ancestor == entity || chain.contains(&ancestor) {
                break;
            }
            chain.push(ancestor);
            current = self.ancestor_of(ancestor);
        }
        chain
    }

    /// Own fields followed by inherited fields, nearest ancestor first.
    fn fields_with_ancestors(&self, entity: &str) -> Vec<&FieldDescriptor> {
        let mut fields: Vec<&FieldDescriptor> = self.fields_of(entity).iter().collect();
        for ancestor in self.ancestry(entity) {
            fields.extend(self.fields_of(ancestor));
        }
        fields
    }

    /// Primary-key fields in positional order: own first, then inherited.
    fn primary_fields(&self, entity: &str) -> Vec<&FieldDescriptor> {
        self.fields_with_ancestors(entity)
            .into_iter()
            .filter(|field| field.is_primary())
            .collect()
    }
}

// ============================================================================
// YAML store
// ============================================================================

/// One entity type declared in a schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Entity type name
    pub name: String,

    /// Nearest ancestor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Own fields
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    /// Own relations
    #[serde(default)]
    pub relations: Vec<RelationDescriptor>,
}

impl EntityDefinition {
    /// Create an entity without fields or relations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Set the ancestor.
    pub fn extends(mut self, ancestor: impl Into<String>) -> Self {
        self.extends = Some(ancestor.into());
        self
    }

    /// Add a field.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a relation.
    pub fn relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    /// Get a field by property name.
    pub fn get_field(&self, property: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.property == property)
    }
}

fn default_version() -> u32 {
    1
}

/// Entity schema loaded from YAML or assembled in code.
///
/// ```yaml
/// version: 1
/// entities:
///   - name: User
///     fields:
///       - name: id
///         type: text
///         storage: uuid
///         primary: true
///       - name: profileId
///         type: text
///     relations:
///       - name: profile
///         kind: to_one
///         target: Profile
///         join_fields:
///           - name: profileId
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default seed for reproducible synthesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Synthesis tunables
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Entity definitions
    #[serde(default)]
    pub entities: Vec<EntityDefinition>,

    /// Composite type definitions
    #[serde(default)]
    pub composites: Vec<CompositeType>,

    /// Cached entity lookup (not serialized)
    #[serde(skip)]
    entity_map: HashMap<String, usize>,
}

impl EntitySchema {
    /// Build a schema from definitions, validating it.
    pub fn new(
        entities: Vec<EntityDefinition>,
        composites: Vec<CompositeType>,
    ) -> Result<Self, SchemaError> {
        let mut schema = Self {
            version: default_version(),
            seed: None,
            synthesis: SynthesisConfig::default(),
            entities,
            composites,
            entity_map: HashMap::new(),
        };
        schema.prepare()?;
        Ok(schema)
    }

    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: EntitySchema = serde_yaml::from_str(yaml)?;
        schema.prepare()?;
        Ok(schema)
    }

    /// Replace the synthesis settings.
    pub fn with_synthesis(mut self, synthesis: SynthesisConfig) -> Result<Self, SchemaError> {
        synthesis.validate()?;
        self.synthesis = synthesis;
        Ok(self)
    }

    fn prepare(&mut self) -> Result<(), SchemaError> {
        self.synthesis.validate()?;
        self.build_entity_map()?;
        self.fill_join_field_properties();
        self.check_inheritance()
    }

    /// Build the internal entity lookup map.
    fn build_entity_map(&mut self) -> Result<(), SchemaError> {
        self.entity_map.clear();
        for (idx, entity) in self.entities.iter().enumerate() {
            if self.entity_map.insert(entity.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateEntity(entity.name.clone()));
            }
        }
        Ok(())
    }

    /// Join fields read from YAML carry no property; take it from their relation.
    fn fill_join_field_properties(&mut self) {
        for relation in self.entities.iter_mut().flat_map(|e| e.relations.iter_mut()) {
            for join in &mut relation.join_fields {
                if join.property.is_empty() {
                    join.property = relation.property.clone();
                }
            }
        }
    }

    fn check_inheritance(&self) -> Result<(), SchemaError> {
        for entity in &self.entities {
            let mut seen: HashSet<&str> = HashSet::from([entity.name.as_str()]);
            let mut current = entity;
            while let Some(ancestor) = current.extends.as_deref() {
                let next = self.get_entity(ancestor).ok_or_else(|| SchemaError::UnknownAncestor {
                    entity: current.name.clone(),
                    ancestor: ancestor.to_string(),
                })?;
                if !seen.insert(ancestor) {
                    return Err(SchemaError::InheritanceCycle(entity.name.clone()));
                }
                current = next;
            }
        }
        Ok(())
    }

    /// Get an entity definition by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entity_map
            .get(name)
            .and_then(|&idx| self.entities.get(idx))
    }

    /// Get an entity definition by name, failing if it is not declared.
    pub fn entity(&self, name: &str) -> Result<&EntityDefinition, SchemaError> {
        self.get_entity(name)
            .ok_or_else(|| SchemaError::EntityNotFound(name.to_string()))
    }

    /// Get all entity names in declaration order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    /// Registry with every declared entity and composite registered.
    ///
    /// Embedding code can add custom factories and producers to the result.
    pub fn type_registry(&self) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for entity in &self.entities {
            registry.register_entity(entity.name.clone());
        }
        for composite in &self.composites {
            registry.register_composite(composite.clone());
        }
        registry
    }
}

impl SchemaIntrospector for EntitySchema {
    fn fields_of(&self, entity: &str) -> &[FieldDescriptor] {
        self.get_entity(entity)
            .map(|e| e.fields.as_slice())
            .unwrap_or(&[])
    }

    fn relations_of(&self, entity: &str) -> &[RelationDescriptor] {
        self.get_entity(entity)
            .map(|e| e.relations.as_slice())
            .unwrap_or(&[])
    }

    fn ancestor_of(&self, entity: &str) -> Option<&str> {
        self.get_entity(entity).and_then(|e| e.extends.as_deref())
    }
}

// ============================================================================
// Tests
// ============================================================================
