//! # pix CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// PIX receiver registry toolchain.
///
/// Checks values against the receiver validation rules and seeds a
/// database with sample receivers.
#[derive(Parser, Debug)]
#[command(name = "pix", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a document, email or PIX key.
    Check(pix_cli::check::CheckArgs),
    /// Insert sample receivers into the database.
    Seed(pix_cli::seed::SeedArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => pix_cli::check::run_check(&args),
        Commands::Seed(args) => pix_cli::seed::run_seed(&args).await,
    }
}
