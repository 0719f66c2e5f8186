//! mdc CLI - Cursor rules documentation builder.
//!
//! Provides commands for:
//! - `build`: Resolve rule cross-references and write the site manifest
//! - `check`: Report broken cross-references and resolution statistics

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use commands::{BuildArgs, CheckArgs};
use output::Output;

/// mdc - Cursor rules documentation builder.
#[derive(Parser)]
#[command(name = "mdc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site manifest from rule documents.
    Build(BuildArgs),
    /// Validate cross-references between rule documents.
    Check(CheckArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.common.verbose,
            Self::Check(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(cli.command.verbose(), rust_log.as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables INFO level, otherwise `RUST_LOG` applies on top of a
/// WARN default.
fn env_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .parse_lossy(rust_log.unwrap_or_default())
    }
}
