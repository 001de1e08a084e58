//! Stub synthesis for stubsmith.
//!
//! This crate turns schema metadata into populated in-memory stubs. A
//! [`StubFactory`] owns the schema, the type registry and a
//! [`ValueGenerator`]; each call builds a fresh [`GraphSynthesizer`] pass with
//! its own RNG, seeded when [`StubOptions::seed`] is set.
//!
//! # Architecture
//!
//! ```text
//! EntitySchema / SchemaIntrospector      TypeRegistry
//!                 │                           │
//!                 ▼                           ▼
//!        ┌──────────────────────────────────────────┐
//!        │               StubFactory                │
//!        │                                          │
//!        │  create_one / create_many                │
//!        │        │                                 │
//!        │        ▼                                 │
//!        │  GraphSynthesizer ──► ValueGenerator     │
//!        │  (fields, relations,   (categories,      │
//!        │   join-field wiring)    arrays, coercion)│
//!        └────────────────┬─────────────────────────┘
//!                         │
//!                         ▼
//!                 Stub { type_name, fields }
//! ```
//!
//! # Example
//!
//! ```rust
//! use stub_core::EntitySchema;
//! use stub_generator::{StubFactory, StubOptions};
//!
//! let schema = EntitySchema::from_yaml(r#"
//! entities:
//!   - name: User
//!     fields:
//!       - name: id
//!         type: text
//!         storage: uuid
//!         primary: true
//!       - name: email
//!         type: text
//!     relations:
//!       - name: posts
//!         kind: to_many
//!         target: Post
//!   - name: Post
//!     fields:
//!       - name: id
//!         type: text
//!         storage: uuid
//!         primary: true
//!       - name: userId
//!         type: text
//!     relations:
//!       - name: user
//!         kind: to_one
//!         target: User
//!         join_fields:
//!           - name: userId
//! "#).unwrap();
//!
//! let factory = StubFactory::from_schema(schema);
//! let user = factory.create_one("User", &StubOptions::default().with_seed(42)).unwrap();
//!
//! for post in user.get_stubs("posts").unwrap() {
//!     assert_eq!(post.get("userId"), user.get("id"));
//! }
//! ```
//!
//! # Value categories
//!
//! - `boolean` - parity of a random integer in `[1, 10]`
//! - `number` - random integer in `[0, 999]`
//! - `string` - 3 to 10 corpus words, capitalized, ending in a period
//! - `date` - the current time
//! - `uuid` - random UUID v4
//! - `enum` - one of the field's enumerated values

pub mod factory;
pub mod generator;
pub mod generators;
pub mod options;
pub mod synthesizer;

// Re-exports for convenience
pub use factory::StubFactory;
pub use generator::{Generator, GeneratorError, GeneratorOverrides, ValueGenerator};
pub use options::StubOptions;
pub use synthesizer::GraphSynthesizer;
