//! `ingot import`
//!
//! The destination is a directory: the store lives in `store.json` and is
//! loaded before and written back after the run, uploads go below `assets/`.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use ingot_config::ImportSettings;
use ingot_core::MemoryStore;
use ingot_pipeline::ImportPipeline;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::load_settings;
use crate::cli::ImportArgs;
use crate::local_assets::LocalAssetStorage;
use crate::vault_scan::scan_vault;

pub const STORE_FILE: &str = "store.json";
pub const ASSETS_DIR: &str = "assets";

pub async fn execute(args: ImportArgs, config: Option<&Path>) -> Result<()> {
    let mut settings = load_settings(config).await?;
    args.apply_to(&mut settings);
    settings.validate().context("Invalid import settings")?;
    require_local_storage(&settings)?;

    let files = scan_vault(&args.vault)?;
    info!(files = files.len(), vault = %args.vault.display(), "Found vault files");

    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("Failed to create output directory {}", args.out.display()))?;
    let store_path = args.out.join(STORE_FILE);
    let store = Arc::new(load_store(&store_path).await?);
    let assets = Arc::new(LocalAssetStorage::new(args.out.join(ASSETS_DIR)));

    let pipeline = ImportPipeline::new(store.clone(), store.clone(), assets, settings);
    let summary = pipeline.import(files).await?;

    let json = store.to_json().context("Failed to serialize store")?;
    tokio::fs::write(&store_path, json)
        .await
        .with_context(|| format!("Failed to write {}", store_path.display()))?;

    println!(
        "{} Imported {} into {}",
        "Success:".green().bold(),
        args.vault.display(),
        args.out.display()
    );
    println!("{summary}");
    Ok(())
}

/// Uploads are written below `--out`, so remote storage cannot be honoured
fn require_local_storage(settings: &ImportSettings) -> Result<()> {
    if settings.uses_remote_storage() {
        bail!(
            "Invalid import settings: remote storage (bucket '{}') is not supported, \
             assets are written to the output directory",
            settings.remote_storage.bucket
        );
    }
    Ok(())
}

async fn load_store(path: &Path) -> Result<MemoryStore> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Starting with an empty store");
        return Ok(MemoryStore::new());
    }
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    MemoryStore::from_json(&json).with_context(|| format!("Invalid store file {}", path.display()))
}
