//! Vault discovery on disk

use anyhow::{bail, Context, Result};
use ingot_core::VaultFile;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Skip dot-directories (`.obsidian`, `.git`, `.trash`) below the vault root
fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/// List the files of the vault at `vault`
///
/// Paths are `/`-separated and start with the vault directory's own name,
/// which the tree builder strips again. Contents are read lazily.
pub fn scan_vault(vault: &Path) -> Result<Vec<VaultFile>> {
    if !vault.is_dir() {
        bail!("Vault directory not found: {}", vault.display());
    }
    let canonical = vault
        .canonicalize()
        .with_context(|| format!("Failed to resolve vault path {}", vault.display()))?;
    let vault_name = canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vault".to_string());

    let mut files = Vec::new();
    for entry in WalkDir::new(&canonical)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&canonical)
            .with_context(|| format!("File outside vault: {}", entry.path().display()))?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        files.push(VaultFile::on_disk(
            format!("{vault_name}/{}", segments.join("/")),
            entry.path(),
        ));
    }

    debug!(vault = %canonical.display(), files = files.len(), "Scanned vault");
    Ok(files)
}
