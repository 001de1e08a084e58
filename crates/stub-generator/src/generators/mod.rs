//! Individual value generators for each value category.
//!
//! These are the default behaviours behind [`crate::ValueGenerator`]; every
//! function takes the RNG explicitly so seeded runs stay reproducible.

pub mod array;
pub mod enumeration;
pub mod numeric;
pub mod text;
pub mod timestamp;
pub mod uuid;
