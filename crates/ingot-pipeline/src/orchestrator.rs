//! Import Orchestrator
//!
//! First stage of an import: walks the folder tree depth-first, creates or
//! reuses the destination container, entry and page for every note, and
//! uploads attachments. Every record is keyed by an identity derived from its
//! vault path, so a second run finds the records of the first.
//!
//! ## Folder policy
//!
//! A folder is *combined* when `combine_notes` is set, it directly holds at
//! least one note, and either `combine_leaves_only` is off or it has no child
//! folders. A combined folder becomes a single entry (in the parent
//! container) holding one page per note. Otherwise every note becomes its own
//! entry inside a container named after the folder.

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use ingot_config::ImportSettings;
use ingot_core::store::{Container, Entry, EntryUpdate, NewContainer, NewEntry, NewPage, PageUpdate};
use ingot_core::{
    identity, page_identity, AssetLocation, AssetStorage, ContainerStore, DocumentStore,
    FolderNode, MarkdownItem, Namespace, OtherItem, ResolvedDocument, StorageSource, VaultItem,
};
use ingot_parser::ExtractOptions;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::assets::scan_existing_assets;
use crate::index::is_index_record;
use crate::summary::{AssetStats, ImportSummary};

/// Note extraction options implied by the settings
pub fn extract_options(settings: &ImportSettings) -> ExtractOptions {
    ExtractOptions {
        strip_annotations: settings.strip_annotations,
        default_public: settings.default_public,
    }
}

/// Asset storage directory every upload goes below
pub fn asset_root(settings: &ImportSettings) -> AssetLocation {
    let source = if settings.remote_storage.enabled {
        StorageSource::Remote {
            bucket: settings.remote_storage.bucket.clone(),
            region: settings.remote_storage.region.clone(),
        }
    } else {
        StorageSource::Local
    };
    AssetLocation::new(source, &settings.asset_destination)
}

/// Result of the orchestration stage
#[derive(Debug, Clone)]
pub struct OrchestratedImport {
    /// Id of the top-level container
    pub root_container: String,
    pub summary: ImportSummary,
}

/// Walks the tree and writes the records for one import run
pub struct Orchestrator<'a> {
    settings: &'a ImportSettings,
    documents: &'a dyn DocumentStore,
    containers: &'a dyn ContainerStore,
    assets: &'a dyn AssetStorage,
    options: ExtractOptions,
    asset_root: AssetLocation,
    /// Pre-scanned uploads, file name -> stored path
    existing_assets: HashMap<String, String>,
    /// Asset directories checked during this run
    validated: HashSet<AssetLocation>,
    /// Identity -> what it was derived from, for collision reporting
    derived: HashMap<String, String>,
    summary: ImportSummary,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        settings: &'a ImportSettings,
        documents: &'a dyn DocumentStore,
        containers: &'a dyn ContainerStore,
        assets: &'a dyn AssetStorage,
    ) -> Self {
        Self {
            settings,
            documents,
            containers,
            assets,
            options: extract_options(settings),
            asset_root: asset_root(settings),
            existing_assets: HashMap::new(),
            validated: HashSet::new(),
            derived: HashMap::new(),
            summary: ImportSummary::default(),
        }
    }

    /// Import the whole tree below a freshly resolved root container
    pub async fn run(mut self, root: &mut FolderNode) -> Result<OrchestratedImport> {
        if self.settings.import_non_markdown && self.settings.skip_duplicate_assets {
            self.existing_assets = scan_existing_assets(self.assets, &self.asset_root).await;
        }

        let root_name = self.settings.root_name.clone();
        let root_container = self.resolve_container("", &root_name, None).await?;
        info!(container = %root_container.id, name = %root_name, "Importing vault");

        let assets = self
            .import_folder(root, root_container.id.clone(), Vec::new())
            .await?;
        self.summary.assets = assets;

        Ok(OrchestratedImport {
            root_container: root_container.id,
            summary: self.summary,
        })
    }

    fn import_folder<'f>(
        &'f mut self,
        folder: &'f mut FolderNode,
        parent: String,
        path: Vec<String>,
    ) -> BoxFuture<'f, Result<AssetStats>> {
        Box::pin(async move {
            let settings = self.settings;
            let folder_path = path.join("/");
            let combine = settings.combine_notes
                && folder.has_markdown()
                && (!settings.combine_leaves_only || folder.children.is_empty());

            let shared_entry = if combine {
                let name = if folder.is_root() {
                    settings.root_name.clone()
                } else {
                    folder.name.clone()
                };
                let id = identity(Namespace::Journal, &folder_path);
                self.track(&id, format!("journal:{folder_path}"));
                let entry = self
                    .resolve_entry(&id, &name, &parent, settings.default_public)
                    .await?;
                Some(entry)
            } else {
                None
            };

            let needs_container = !folder.is_root()
                && if combine {
                    folder.children.iter().any(FolderNode::subtree_has_markdown)
                } else {
                    folder.subtree_has_markdown()
                };
            let container = if needs_container {
                self.resolve_container(&folder_path, &folder.name, Some(parent.as_str()))
                    .await?
                    .id
            } else {
                parent
            };

            debug!(
                folder = %folder_path,
                combine,
                container = %container,
                "Importing folder"
            );

            let mut stats = AssetStats::default();
            for item in folder.items.iter_mut() {
                match item {
                    VaultItem::Markdown(note) => {
                        self.import_note(note, &container, shared_entry.as_ref(), &folder_path)
                            .await?
                    }
                    VaultItem::Other(asset) => stats += self.import_asset(asset).await?,
                }
            }

            for child in folder.children.iter_mut() {
                let mut child_path = path.clone();
                child_path.push(child.name.clone());
                stats += self
                    .import_folder(child, container.clone(), child_path)
                    .await?;
            }

            Ok(stats)
        })
    }

    async fn import_note(
        &mut self,
        note: &mut MarkdownItem,
        container: &str,
        shared_entry: Option<&Entry>,
        folder_path: &str,
    ) -> Result<()> {
        let item_path = note.meta.path();
        let options = self.options;
        let extracted = note
            .load(&options)
            .await
            .with_context(|| format!("Failed to read note '{item_path}'"))?;
        let body = extracted.body.clone();
        let is_public = extracted.is_public;
        let title = note.title().to_string();

        let (entry, page_id) = match shared_entry {
            Some(entry) => (entry.clone(), page_identity(folder_path, Some(&title))),
            None => {
                let id = identity(Namespace::Journal, &item_path);
                self.track(&id, format!("journal:{item_path}"));
                let entry = self.resolve_entry(&id, &title, container, is_public).await?;
                (entry, page_identity(&item_path, None))
            }
        };
        self.track(&page_id, format!("page:{item_path}"));

        let existing = match self
            .documents
            .find_page(&page_id)
            .await
            .with_context(|| format!("Failed to look up page for '{item_path}'"))?
        {
            Some(page) => Some(page),
            None => self
                .documents
                .find_page_by_name(&title, &entry.id)
                .await
                .with_context(|| format!("Failed to look up page for '{item_path}'"))?
                .filter(|page| !is_index_record(&page.id)),
        };

        let (id, written) = match existing {
            Some(page) if self.settings.overwrite => {
                self.documents
                    .update_page(&page.id, PageUpdate::body(body.clone()))
                    .await
                    .with_context(|| format!("Failed to update page for '{item_path}'"))?;
                if shared_entry.is_none() && entry.public != is_public {
                    self.documents
                        .update_entry(
                            &entry.id,
                            EntryUpdate {
                                public: Some(is_public),
                            },
                        )
                        .await
                        .with_context(|| format!("Failed to update entry for '{item_path}'"))?;
                }
                debug!(path = %item_path, page = %page.id, "Updated page");
                self.summary.pages_updated += 1;
                (page.id, Some(body))
            }
            Some(page) => {
                if self.settings.ignore_duplicate {
                    debug!(path = %item_path, "Page already exists, skipping");
                } else {
                    warn!(path = %item_path, page = %page.id, "Page already exists, skipping");
                }
                self.summary.notes_skipped += 1;
                (page.id, None)
            }
            None => {
                let page = self
                    .documents
                    .create_page(NewPage {
                        id: Some(page_id),
                        entry: entry.id.clone(),
                        name: title.clone(),
                        body: body.clone(),
                    })
                    .await
                    .with_context(|| format!("Failed to create page for '{item_path}'"))?;
                debug!(path = %item_path, page = %page.id, "Created page");
                self.summary.pages_created += 1;
                (page.id, Some(body))
            }
        };

        note.resolved = Some(ResolvedDocument {
            id,
            entry: entry.id,
            name: title,
            container: entry.container,
            combined: shared_entry.is_some(),
            body: written,
        });
        Ok(())
    }

    async fn import_asset(&mut self, asset: &mut OtherItem) -> Result<AssetStats> {
        let item_path = asset.meta.path();
        if !self.settings.import_non_markdown {
            debug!(path = %item_path, "Skipping non-markdown file");
            return Ok(AssetStats::default());
        }

        let file_name = asset.meta.file_name().to_string();
        if self.settings.skip_duplicate_assets {
            if let Some(stored) = self.existing_assets.get(&file_name) {
                debug!(path = %item_path, stored = %stored, "Asset already uploaded");
                asset.upload_path = Some(stored.clone());
                return Ok(AssetStats {
                    total: 1,
                    skipped: 1,
                });
            }
        }

        let destination = self.asset_root.join(asset.meta.directories());
        self.ensure_destination(&destination).await?;

        let bytes = asset
            .source
            .read()
            .await
            .with_context(|| format!("Failed to read asset '{item_path}'"))?;
        let stored = self
            .assets
            .upload(&destination, &file_name, bytes)
            .await
            .with_context(|| format!("Failed to upload asset '{item_path}'"))?;

        debug!(path = %item_path, stored = %stored, "Uploaded asset");
        asset.upload_path = Some(stored);
        Ok(AssetStats {
            total: 1,
            skipped: 0,
        })
    }

    /// Make sure `destination` exists, checking each directory once per run
    async fn ensure_destination(&mut self, destination: &AssetLocation) -> Result<()> {
        if self.validated.contains(destination) {
            return Ok(());
        }
        if let Err(e) = self.assets.list(destination).await {
            debug!(destination = %destination.path, error = %e, "Creating asset directory");
            self.assets
                .ensure_directory(destination)
                .await
                .with_context(|| {
                    format!("Failed to create asset directory '{}'", destination.path)
                })?;
        }
        self.validated.insert(destination.clone());
        Ok(())
    }

    /// Find the container for `folder_path` by identity, then by name, or create it
    async fn resolve_container(
        &mut self,
        folder_path: &str,
        name: &str,
        parent: Option<&str>,
    ) -> Result<Container> {
        let id = identity(Namespace::Folder, folder_path);
        self.track(&id, format!("folder:{folder_path}"));

        if let Some(container) = self
            .containers
            .find_container(&id)
            .await
            .with_context(|| format!("Failed to look up container '{name}'"))?
        {
            return Ok(container);
        }
        if let Some(container) = self
            .containers
            .find_container_by_name(name, parent)
            .await
            .with_context(|| format!("Failed to look up container '{name}'"))?
        {
            debug!(name, container = %container.id, "Reusing container found by name");
            return Ok(container);
        }

        let container = self
            .containers
            .create_container(NewContainer {
                id: Some(id),
                name: name.to_string(),
                parent: parent.map(str::to_string),
            })
            .await
            .with_context(|| format!("Failed to create container '{name}'"))?;
        self.summary.containers += 1;
        Ok(container)
    }

    /// Find an entry by identity, then by name inside `container`, or create it
    async fn resolve_entry(
        &mut self,
        id: &str,
        name: &str,
        container: &str,
        public: bool,
    ) -> Result<Entry> {
        if let Some(entry) = self
            .documents
            .find_entry(id)
            .await
            .with_context(|| format!("Failed to look up entry '{name}'"))?
        {
            return Ok(entry);
        }
        // The index shares the root container but never stands in for a note
        if let Some(entry) = self
            .documents
            .find_entry_by_name(name, Some(container))
            .await
            .with_context(|| format!("Failed to look up entry '{name}'"))?
            .filter(|entry| !is_index_record(&entry.id))
        {
            debug!(name, entry = %entry.id, "Reusing entry found by name");
            return Ok(entry);
        }

        let entry = self
            .documents
            .create_entry(NewEntry {
                id: Some(id.to_string()),
                name: name.to_string(),
                container: Some(container.to_string()),
                public,
            })
            .await
            .with_context(|| format!("Failed to create entry '{name}'"))?;
        self.summary.entries += 1;
        Ok(entry)
    }

    /// Remember what `id` was derived from and report a second source
    fn track(&mut self, id: &str, source: String) {
        if let Some(first) = record_derivation(&mut self.derived, id, &source) {
            warn!(id, first = %first, second = %source, "Identity collision");
        }
    }
}

/// Note that `id` was derived from `source`
///
/// Returns the first source when an earlier, different one produced the same id.
fn record_derivation<'m>(
    derived: &'m mut HashMap<String, String>,
    id: &str,
    source: &str,
) -> Option<&'m str> {
    let first: &'m String = derived
        .entry(id.to_string())
        .or_insert_with(|| source.to_string());
    (first != source).then_some(first.as_str())
}
