//! Common helpers for pipeline tests.

#![allow(dead_code)]

use ingot_config::ImportSettings;
use ingot_core::store::{Entry, Page};
use ingot_core::test_support::RecordingAssetStorage;
use ingot_core::{MemoryStore, VaultFile};
use ingot_pipeline::ImportPipeline;
use std::sync::Arc;

/// A vault of text files, paths prefixed with the vault directory `v/`
pub fn vault(files: &[(&str, &str)]) -> Vec<VaultFile> {
    files
        .iter()
        .map(|(path, text)| VaultFile::from_text(format!("v/{path}"), text))
        .collect()
}

pub fn pipeline(
    store: &Arc<MemoryStore>,
    assets: &Arc<RecordingAssetStorage>,
    settings: ImportSettings,
) -> ImportPipeline {
    ImportPipeline::new(store.clone(), store.clone(), assets.clone(), settings)
}

pub fn page(store: &MemoryStore, name: &str) -> Page {
    store
        .pages()
        .into_iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("no page named {name}"))
}

pub fn entry(store: &MemoryStore, name: &str) -> Entry {
    store
        .entries()
        .into_iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("no entry named {name}"))
}

/// Link markup pointing at the page called `name`
pub fn link_to(store: &MemoryStore, name: &str, label: &str) -> String {
    let page = page(store, name);
    format!("@Doc[{}.{}]{{{}}}", page.entry, page.id, label)
}
