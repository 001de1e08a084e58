//! `one` command handler.

use anyhow::Context;
use stub_json::JsonValue;

use super::{load_factory, output::write_json};
use crate::args::OneArgs;

/// Synthesize a single stub and return it as JSON.
pub fn render_one(args: &OneArgs) -> anyhow::Result<serde_json::Value> {
    let synthesis = &args.synthesis;
    let (factory, options) = load_factory(synthesis)?;

    let stub = factory
        .create_one(&synthesis.entity, &options)
        .with_context(|| format!("Failed to synthesize '{}'", synthesis.entity))?;

    tracing::info!(
        entity = %synthesis.entity,
        deep = options.deep,
        "Synthesized stub"
    );

    Ok(JsonValue::from(&stub).into_inner())
}

/// Run the `one` command.
pub fn run_one(args: OneArgs) -> anyhow::Result<()> {
    let value = render_one(&args)?;
    write_json(
        &value,
        args.synthesis.output.as_deref(),
        args.synthesis.pretty,
    )
}
