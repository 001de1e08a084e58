//! Command-line interface for stubsmith
//!
//! # Usage Examples
//!
//! ## Single stub
//! ```bash
//! # Deep stub of a User with its related posts and profile
//! stubsmith one --schema schemas/blog.yaml --entity User --pretty
//!
//! # Same, written to a file and reproducible
//! stubsmith one --schema schemas/blog.yaml --entity User --seed 42 --output user.json
//! ```
//!
//! ## Batches
//! ```bash
//! # Five posts, fields only
//! stubsmith many --schema schemas/blog.yaml --entity Post --count 5 --shallow
//! ```
//!
//! Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=stub_generator=trace`
//! shows every relation expansion.

use clap::{Parser, Subcommand};
use stubsmith::{run_many, run_one, ManyArgs, OneArgs};

#[derive(Parser)]
#[command(name = "stubsmith")]
#[command(about = "Synthesize populated entity stubs from a YAML schema")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create one stub and print it as a JSON object
    One(OneArgs),

    /// Create a batch of stubs and print them as a JSON array
    Many(ManyArgs),
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::One(args) => run_one(args)?,
        Commands::Many(args) => run_many(args)?,
    }

    Ok(())
}
