//! Core types for stubsmith.
//!
//! This crate provides the foundational types used by the synthesizer:
//!
//! - [`FieldDescriptor`], [`RelationDescriptor`], [`JoinFieldDescriptor`] - Schema metadata
//! - [`SchemaIntrospector`] - Boundary through which metadata is read
//! - [`EntitySchema`] - YAML-backed introspector
//! - [`TypeRegistry`] - Explicit name → factory map for constructible types
//! - [`Stub`] / [`StubValue`] - The synthesized records
//!
//! # Architecture
//!
//! ```text
//! stub-core (this crate)
//!    │
//!    ├─── stub-generator  (value generator, graph synthesizer, factory)
//!    │
//!    └─── stub-json       (Stub → JSON for fixture output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use stub_core::{EntitySchema, SchemaIntrospector};
//!
//! let schema = EntitySchema::from_yaml(r#"
//! entities:
//!   - name: User
//!     fields:
//!       - name: id
//!         type: text
//!         storage: uuid
//!         primary: true
//! "#).unwrap();
//!
//! assert_eq!(schema.primary_fields("User").len(), 1);
//! ```

pub mod config;
pub mod registry;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use config::{Bounds, SynthesisConfig, DEFAULT_ARRAY_LENGTH, DEFAULT_TO_MANY};
pub use registry::{CompositeProperty, CompositeType, ProducerFn, StubFactoryFn, TypeRegistry};
pub use schema::{
    EntityDefinition, EntitySchema, EnumValues, FieldDescriptor, FieldOptions,
    JoinFieldDescriptor, RelationDescriptor, RelationTarget, SchemaError, SchemaIntrospector,
    TargetResolver,
};
pub use types::{
    storage_class, Cardinality, GenerationMode, Representation, StorageClass, ValueCategory,
};
pub use values::{Stub, StubValue};
