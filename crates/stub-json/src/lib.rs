//! JSON rendering for stubsmith stubs.
//!
//! This crate converts synthesized [`stub_core::Stub`] graphs into
//! `serde_json` values for fixture files and CLI output.
//!
//! # Example
//!
//! ```rust
//! use stub_core::Stub;
//! use stub_json::JsonValue;
//!
//! let stub = Stub::new("User").with("id", "u-1").with("age", 30i64);
//! let json: JsonValue = (&stub).into();
//! assert_eq!(json.into_inner(), serde_json::json!({"id": "u-1", "age": 30}));
//! ```

pub mod forward;

pub use forward::{stubs_to_json, JsonValue};
