//! # pipeschema CLI Entry Point
//!
//! Parses arguments, installs logging, and prints the schema.

use clap::Parser;

/// Print the JSON Schema for pipeline configuration files.
///
/// The schema is written to stdout as a single compact line. Set `RUST_LOG`
/// to see composition diagnostics on stderr.
#[derive(Parser, Debug)]
#[command(name = "pipeschema", version, about)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    let stdout = std::io::stdout();
    pipeschema_cli::write_schema(&mut stdout.lock())
}
