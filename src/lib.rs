//! Stubsmith Library
//!
//! Synthesizes fully populated in-memory records ("stubs") of entity types
//! from schema metadata, for use as fixtures in tests.
//!
//! # Crates
//!
//! - `stub_core` - Schema metadata, type registry and stub values
//! - `stub_generator` - Value generator, graph synthesizer and `StubFactory`
//! - `stub_json` - JSON rendering of stubs
//!
//! # CLI Usage
//!
//! ```bash
//! # One stub with relations expanded
//! stubsmith one --schema schemas/blog.yaml --entity User --pretty
//!
//! # Ten reproducible stubs without relations
//! stubsmith many --schema schemas/blog.yaml --entity Post --count 10 --seed 42 --shallow
//! ```

pub mod args;
pub mod commands;

pub use args::{ManyArgs, OneArgs, SynthesisArgs};
pub use commands::{render_many, render_one, run_many, run_one};
