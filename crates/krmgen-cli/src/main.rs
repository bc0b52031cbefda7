//! krmgen CLI - Rust source from Kubernetes manifests

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod discover;
mod display;
mod error;
mod exit_codes;
mod helm;

use commands::generate::GenerateArgs;

/// Environment variable holding the log filter
const LOG_ENV: &str = "KRMGEN_LOG";

#[derive(Parser)]
#[command(name = "krmgen")]
#[command(version)]
#[command(about = "Generate Rust source from Kubernetes manifests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Rust module from manifests or a Helm chart
    Generate(GenerateArgs),

    /// List the kinds that can be decoded into typed schemas
    Kinds {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match &cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Kinds { json } => commands::kinds::run(*json),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log to stderr, filtered by `KRMGEN_LOG` when set
fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
