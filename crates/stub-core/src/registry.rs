//! Explicit registry of constructible types.
//!
//! Entity types, composite types and value producers are looked up by name.
//! A relation target or field representation that names something absent
//! from the registry is not constructible.

use crate::types::Representation;
use crate::values::{Stub, StubValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Factory producing a fresh stub, optionally with preset fields.
pub type StubFactoryFn = Arc<dyn Fn() -> Stub + Send + Sync>;

/// Zero-argument value producer.
pub type ProducerFn = Arc<dyn Fn() -> StubValue + Send + Sync>;

/// One property of a composite type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeProperty {
    /// Property name
    pub name: String,

    /// Native representation of the property
    #[serde(rename = "type")]
    pub representation: Representation,
}

/// A plain structured type that is not an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeType {
    /// Composite type name
    pub name: String,

    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<CompositeProperty>,
}

impl CompositeType {
    /// Create a composite type without properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Builder-style property declaration.
    pub fn with_property(mut self, name: impl Into<String>, representation: Representation) -> Self {
        self.properties.push(CompositeProperty {
            name: name.into(),
            representation,
        });
        self
    }
}

struct CompositeEntry {
    definition: CompositeType,
    template: Option<StubFactoryFn>,
}

/// Name → factory registry supplied by the embedding application.
#[derive(Default, Clone)]
pub struct TypeRegistry {
    entities: HashMap<String, StubFactoryFn>,
    composites: HashMap<String, Arc<CompositeEntry>>,
    producers: HashMap<String, ProducerFn>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type built as an empty stub.
    pub fn register_entity(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let type_name = name.clone();
        self.entities
            .insert(name, Arc::new(move || Stub::new(type_name.clone())));
        self
    }

    /// Register an entity type with a custom factory.
    pub fn register_entity_factory<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Stub + Send + Sync + 'static,
    {
        self.entities.insert(name.into(), Arc::new(factory));
        self
    }

    /// Register a composite type.
    pub fn register_composite(&mut self, definition: CompositeType) -> &mut Self {
        self.composites.insert(
            definition.name.clone(),
            Arc::new(CompositeEntry {
                definition,
                template: None,
            }),
        );
        self
    }

    /// Register a composite type whose instances start from a template.
    ///
    /// Template properties that hold [`StubValue::Null`] stay null.
    pub fn register_composite_template<F>(&mut self, definition: CompositeType, template: F) -> &mut Self
    where
        F: Fn() -> Stub + Send + Sync + 'static,
    {
        self.composites.insert(
            definition.name.clone(),
            Arc::new(CompositeEntry {
                definition,
                template: Some(Arc::new(template)),
            }),
        );
        self
    }

    /// Register a named value producer.
    pub fn register_producer<F>(&mut self, name: impl Into<String>, producer: F) -> &mut Self
    where
        F: Fn() -> StubValue + Send + Sync + 'static,
    {
        self.producers.insert(name.into(), Arc::new(producer));
        self
    }

    /// Whether the entity type is constructible.
    pub fn is_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Build a fresh stub of the given entity type.
    pub fn instantiate(&self, name: &str) -> Option<Stub> {
        self.entities.get(name).map(|factory| factory())
    }

    /// Look up a composite type definition.
    pub fn composite(&self, name: &str) -> Option<&CompositeType> {
        self.composites.get(name).map(|entry| &entry.definition)
    }

    /// Build the starting stub of a composite type.
    pub fn instantiate_composite(&self, name: &str) -> Option<Stub> {
        self.composites.get(name).map(|entry| match &entry.template {
            Some(template) => template(),
            None => Stub::new(name),
        })
    }

    /// Invoke a named producer.
    pub fn produce(&self, name: &str) -> Option<StubValue> {
        self.producers.get(name).map(|producer| producer())
    }

    /// Registered entity names.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut composites: Vec<&str> = self.composites.keys().map(String::as_str).collect();
        composites.sort_unstable();
        let mut producers: Vec<&str> = self.producers.keys().map(String::as_str).collect();
        producers.sort_unstable();

        f.debug_struct("TypeRegistry")
            .field("entities", &self.entity_names())
            .field("composites", &composites)
            .field("producers", &producers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_factories() {
        let mut registry = TypeRegistry::new();
        registry
            .register_entity("User")
            .register_entity_factory("Admin", || Stub::new("Admin").with("role", "admin"));

        assert!(registry.is_entity("User"));
        assert!(!registry.is_entity("Ghost"));
        assert!(registry.instantiate("User").unwrap().is_empty());
        assert_eq!(
            registry.instantiate("Admin").unwrap().get("role"),
            Some(&StubValue::String("admin".to_string()))
        );
        assert!(registry.instantiate("Ghost").is_none());
        assert_eq!(registry.entity_names(), vec!["Admin", "User"]);
    }

    #[test]
    fn test_composite_templates() {
        let address = CompositeType::new("Address")
            .with_property("street", Representation::Text)
            .with_property("zip", Representation::Text);

        let mut registry = TypeRegistry::new();
        registry.register_composite(address.clone());
        assert_eq!(registry.composite("Address"), Some(&address));
        assert!(registry.instantiate_composite("Address").unwrap().is_empty());

        registry.register_composite_template(address, || {
            Stub::new("Address").with("zip", StubValue::Null)
        });
        let template = registry.instantiate_composite("Address").unwrap();
        assert!(template.get("zip").unwrap().is_null());
    }

    #[test]
    fn test_producers() {
        let mut registry = TypeRegistry::new();
        registry.register_producer("answer", || StubValue::Int64(42));

        assert_eq!(registry.produce("answer"), Some(StubValue::Int64(42)));
        assert_eq!(registry.produce("missing"), None);
    }
}
