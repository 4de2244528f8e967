//! jellydoc CLI - Jelly tag library documentation generator.
//!
//! Provides commands for:
//! - `generate`: Extract tag libraries from type descriptions into `taglib.xml`
//! - `report`: Render the tag library reference report from `taglib.xml`
//! - `site`: Run `generate` then `report`

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{GenerateArgs, ReportArgs, SiteArgs};
use output::Output;

/// jellydoc - Jelly tag library documentation generator.
#[derive(Parser)]
#[command(name = "jellydoc", version, about)]
struct Cli {
    /// Enable verbose output (INFO level logging).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate taglib.xml from type descriptions.
    Generate(GenerateArgs),
    /// Render the reference report from taglib.xml.
    Report(ReportArgs),
    /// Generate taglib.xml and render the reference report.
    Site(SiteArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(),
        Commands::Report(args) => args.execute(),
        Commands::Site(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
