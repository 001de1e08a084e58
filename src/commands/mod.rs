//! Subcommand handlers.

mod many;
mod one;
mod output;

pub use many::{render_many, run_many};
pub use one::{render_one, run_one};

use anyhow::Context;
use stub_core::EntitySchema;
use stub_generator::{StubFactory, StubOptions};

use crate::args::SynthesisArgs;

/// Load the schema and build the factory and options for a run.
fn load_factory(args: &SynthesisArgs) -> anyhow::Result<(StubFactory<EntitySchema>, StubOptions)> {
    let schema = EntitySchema::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;

    tracing::debug!(
        entities = schema.entities.len(),
        composites = schema.composites.len(),
        "Loaded schema"
    );

    let options = StubOptions {
        deep: !args.shallow,
        seed: args.seed.or(schema.seed),
        ..StubOptions::default()
    };

    Ok((StubFactory::from_schema(schema), options))
}
