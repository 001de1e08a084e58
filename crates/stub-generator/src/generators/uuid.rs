//! Random identifiers for `uuid` fields.

use rand::Rng;
use uuid::{Builder, Uuid};

/// Draw a version 4 UUID from `rng`, so seeded runs repeat their ids.
pub fn generate_uuid_v4<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}
