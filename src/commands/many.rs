//! `many` command handler.

use anyhow::Context;
use stub_json::stubs_to_json;

use super::{load_factory, output::write_json};
use crate::args::ManyArgs;

/// Synthesize a batch of stubs and return them as a JSON array.
pub fn render_many(args: &ManyArgs) -> anyhow::Result<serde_json::Value> {
    let synthesis = &args.synthesis;
    let (factory, options) = load_factory(synthesis)?;

    let stubs = factory
        .create_many(&synthesis.entity, args.count, &options)
        .with_context(|| format!("Failed to synthesize '{}' batch", synthesis.entity))?;

    tracing::info!(
        entity = %synthesis.entity,
        count = stubs.len(),
        deep = options.deep,
        "Synthesized stubs"
    );

    Ok(stubs_to_json(&stubs))
}

/// Run the `many` command.
pub fn run_many(args: ManyArgs) -> anyhow::Result<()> {
    let value = render_many(&args)?;
    write_json(
        &value,
        args.synthesis.output.as_deref(),
        args.synthesis.pretty,
    )
}
