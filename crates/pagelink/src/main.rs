//! pagelink CLI - Confluence workflow node.
//!
//! Provides commands for:
//! - `run`: Run the node with a JSON node configuration
//! - `page`: Fetch a page by id
//! - `page-by-title`: Fetch a page by space key and title
//! - `search`: Search pages by keywords

mod commands;
mod error;
mod output;

use std::io::Write;

use clap::{Parser, Subcommand};
use pagelink_confluence::Envelope;
use tracing_subscriber::EnvFilter;

use commands::{PageArgs, PageByTitleArgs, RunArgs, SearchArgs};
use error::CliError;
use output::Output;

/// pagelink - Confluence workflow node.
#[derive(Parser)]
#[command(name = "pagelink", version, about)]
struct Cli {
    /// Log outgoing requests (INFO level).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the node with a JSON node configuration file.
    Run(RunArgs),
    /// Fetch a page by id.
    Page(PageArgs),
    /// Fetch a page by space key and title.
    PageByTitle(PageByTitleArgs),
    /// Search pages by keywords.
    Search(SearchArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let filter = EnvFilter::new(log_directives(cli.verbose, std::env::var("RUST_LOG").ok()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run(args) => args.execute(&output),
        Commands::Page(args) => args.execute(&output),
        Commands::PageByTitle(args) => args.execute(&output),
        Commands::Search(args) => args.execute(&output),
    };

    match result.and_then(|envelope| print_envelope(&envelope).map(|()| envelope)) {
        Ok(envelope) if envelope.is_ok() => output.success(&format!("Status {}", envelope.status)),
        Ok(envelope) => {
            let detail = envelope.error_message().unwrap_or("upstream error");
            output.error(&format!("Status {}: {detail}", envelope.status));
            std::process::exit(1);
        }
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}

/// Write the envelope to stdout as pretty JSON.
/// Log filter directives: `info` with --verbose, otherwise `RUST_LOG` or `warn`.
fn log_directives(verbose: bool, rust_log: Option<String>) -> String {
    if verbose {
        return "info".to_owned();
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| "warn".to_owned())
}

fn print_envelope(envelope: &Envelope) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(envelope)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
