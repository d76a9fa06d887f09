//! DagorArc CLI - Command-line interface for Dagor archives

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "dagorarc")]
#[command(about = "DagorArc: list and extract Dagor engine asset archives", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Run the DagorArc CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging (stderr, so listings on stdout stay clean)
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
