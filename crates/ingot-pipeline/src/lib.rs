//! Vault Import Pipeline
//!
//! Drives a whole import. Stages run strictly in order, each finishing
//! before the next starts:
//!
//! 1. **Tree**: build the folder tree from the flat file list
//! 2. **Orchestrate**: create or reuse containers, entries and pages, upload assets
//! 3. **Links**: rewrite wiki-links in the pages written this run
//! 4. **Backlinks**: append References sections (unless disabled)
//! 5. **Index**: write the Index entry (when enabled)
//! 6. **Format**: hand every written page to the [`PageFormatter`], if any
//!
//! A failing stage aborts the run. Nothing is rolled back; records are keyed
//! by deterministic identities, so running the import again picks up where
//! the last run stopped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ingot_pipeline::ImportPipeline;
//!
//! let store = Arc::new(MemoryStore::new());
//! let pipeline = ImportPipeline::new(store.clone(), store, assets, settings);
//! let summary = pipeline.import(files).await?;
//! ```

use anyhow::{Context, Result};
use futures::future::try_join_all;
use ingot_config::ImportSettings;
use ingot_core::{
    build_tree, AssetStorage, ContainerStore, DocumentStore, FolderNode, PageFormatter, PageRef,
    VaultFile, VaultItem,
};
use std::sync::Arc;
use tracing::info;

pub mod assets;
pub mod backlinks;
pub mod index;
pub mod links;
pub mod orchestrator;
mod summary;

pub use orchestrator::{asset_root, extract_options, OrchestratedImport, Orchestrator};
pub use summary::{AssetStats, ImportSummary};

/// Imports vaults into a destination store
pub struct ImportPipeline {
    documents: Arc<dyn DocumentStore>,
    containers: Arc<dyn ContainerStore>,
    assets: Arc<dyn AssetStorage>,
    /// Optional final conversion pass
    formatter: Option<Arc<dyn PageFormatter>>,
    settings: ImportSettings,
}

impl ImportPipeline {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        containers: Arc<dyn ContainerStore>,
        assets: Arc<dyn AssetStorage>,
        settings: ImportSettings,
    ) -> Self {
        Self {
            documents,
            containers,
            assets,
            formatter: None,
            settings,
        }
    }

    /// Convert every written page with `formatter` once the import is done
    pub fn with_formatter(mut self, formatter: Arc<dyn PageFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Import a flat vault file list
    pub async fn import<I>(&self, files: I) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = VaultFile>,
    {
        self.settings.validate().context("Invalid import settings")?;
        let mut root = build_tree(files);
        self.run_stages(&mut root).await
    }

    /// Import an already built tree, leaving the resolved records on its items
    pub async fn import_tree(&self, root: &mut FolderNode) -> Result<ImportSummary> {
        self.settings.validate().context("Invalid import settings")?;
        self.run_stages(root).await
    }

    async fn run_stages(&self, root: &mut FolderNode) -> Result<ImportSummary> {
        let settings = &self.settings;
        info!(items = root.item_count(), "Starting import");

        let orchestrated = Orchestrator::new(
            settings,
            self.documents.as_ref(),
            self.containers.as_ref(),
            self.assets.as_ref(),
        )
        .run(root)
        .await?;
        let mut summary = orchestrated.summary;
        info!(
            created = summary.pages_created,
            updated = summary.pages_updated,
            skipped = summary.notes_skipped,
            "Imported notes"
        );

        summary.links_rewritten = links::resolve_links(root, self.documents.as_ref())
            .await
            .context("Link resolution failed")?;
        info!(count = summary.links_rewritten, "Resolved links");

        if settings.create_backlinks {
            summary.backlinks_appended = backlinks::append_backlinks(root, self.documents.as_ref())
                .await
                .context("Backlink generation failed")?;
            info!(count = summary.backlinks_appended, "Appended backlinks");
        }

        let mut pages = written_pages(root);
        if settings.create_index {
            let index = index::write_index(
                root,
                &settings.root_name,
                &orchestrated.root_container,
                settings.default_public,
                self.documents.as_ref(),
                &mut summary,
            )
            .await
            .context("Index generation failed")?;
            info!(page = %index.id, "Wrote index");
            pages.push(PageRef {
                entry: index.entry,
                page: index.id,
                name: index.name,
            });
        }

        if let Some(formatter) = &self.formatter {
            format_pages(formatter.as_ref(), &pages).await?;
        }

        info!("Import finished");
        Ok(summary)
    }
}

/// Pages written during this run, in tree order
fn written_pages(root: &FolderNode) -> Vec<PageRef> {
    root.walk()
        .into_iter()
        .filter_map(|item| match item {
            VaultItem::Markdown(note) => note.resolved.as_ref(),
            VaultItem::Other(_) => None,
        })
        .filter(|doc| doc.is_produced())
        .map(|doc| PageRef {
            entry: doc.entry.clone(),
            page: doc.id.clone(),
            name: doc.name.clone(),
        })
        .collect()
}

async fn format_pages(formatter: &dyn PageFormatter, pages: &[PageRef]) -> Result<()> {
    try_join_all(pages.iter().map(|page| async move {
        formatter
            .format_page(page)
            .await
            .with_context(|| format!("Failed to format page '{}'", page.name))
    }))
    .await?;
    info!(count = pages.len(), "Formatted pages");
    Ok(())
}
