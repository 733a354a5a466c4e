pub mod config;
pub mod id;
pub mod import;

use anyhow::{Context, Result};
use ingot_config::ImportSettings;
use std::path::Path;

use crate::cli::Commands;

/// Run one subcommand
pub async fn execute(command: Commands, config: Option<&Path>) -> Result<()> {
    match command {
        Commands::Import(args) => import::execute(args, config).await,
        Commands::Id {
            namespace,
            path,
            sub_page,
        } => id::execute(namespace, &path, sub_page.as_deref()),
        Commands::Config => config::execute(config).await,
    }
}

/// Settings from `path`, or the defaults when no file is given
pub async fn load_settings(path: Option<&Path>) -> Result<ImportSettings> {
    match path {
        Some(path) => ImportSettings::load_from_file(path)
            .await
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(ImportSettings::default()),
    }
}
