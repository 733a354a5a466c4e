use anyhow::{Context, Result};
use std::path::Path;

use super::load_settings;

/// Print the effective settings as TOML
pub async fn execute(config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config).await?;
    let text = settings
        .to_toml_string()
        .context("Failed to render settings")?;
    print!("{text}");
    Ok(())
}
