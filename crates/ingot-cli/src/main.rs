use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ingot_cli::cli::{Cli, Commands};
use ingot_cli::commands;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level / --verbose
    let filter = EnvFilter::builder()
        .with_default_directive(cli.level().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let failure = match &cli.command {
        Commands::Import(_) => "Import failed",
        Commands::Id { .. } | Commands::Config => "Command failed",
    };

    match commands::execute(cli.command, cli.config.as_deref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{} {failure}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
