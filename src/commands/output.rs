//! JSON output to stdout or a file.

use std::path::Path;

use anyhow::Context;

/// Serialize `value` and write it to `path`, or stdout when no path is given.
pub(crate) fn write_json(
    value: &serde_json::Value,
    path: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match path {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write output to {path:?}"))?;
            tracing::info!("Wrote output to {:?}", path);
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
