//! Command-line arguments shared by the synthesis subcommands.

use std::path::PathBuf;

use clap::Args;

/// Options common to `one` and `many`.
#[derive(Args, Debug, Clone)]
pub struct SynthesisArgs {
    /// Path to the YAML schema file
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Entity type to synthesize
    #[arg(long)]
    pub entity: String,

    /// Populate own and inherited fields only, without expanding relations
    #[arg(long)]
    pub shallow: bool,

    /// Seed for reproducible output (defaults to the schema's seed)
    #[arg(long, env = "STUBSMITH_SEED")]
    pub seed: Option<u64>,

    /// Write JSON to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `one` subcommand.
#[derive(Args, Debug, Clone)]
pub struct OneArgs {
    #[command(flatten)]
    pub synthesis: SynthesisArgs,
}

/// Arguments for the `many` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ManyArgs {
    #[command(flatten)]
    pub synthesis: SynthesisArgs,

    /// Number of stubs (default: random within the schema's array-length bounds)
    #[arg(long)]
    pub count: Option<usize>,
}
