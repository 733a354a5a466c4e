//! Vault index page
//!
//! Optional stage: one "Index" entry in the root container whose page links
//! every imported note, grouped by top-level folder.

use anyhow::{Context, Result};
use ingot_core::store::{NewEntry, NewPage, PageUpdate};
use ingot_core::{identity, DocumentStore, FolderNode, Namespace, ResolvedDocument, VaultItem};
use std::collections::BTreeMap;
use tracing::debug;

use crate::summary::ImportSummary;

/// Name of the index entry and page
pub const INDEX_NAME: &str = "Index";

/// Path the index identities are derived from. `#` never starts a vault path.
pub const INDEX_KEY: &str = "#index";

/// Whether `id` is the index entry or page
pub fn is_index_record(id: &str) -> bool {
    id == identity(Namespace::Journal, INDEX_KEY) || id == identity(Namespace::Page, INDEX_KEY)
}

/// Render the index body for every note that has a page
///
/// Notes at the vault root are listed under `root_name`.
pub fn render_index(root: &FolderNode, root_name: &str) -> String {
    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let notes = root.walk().into_iter().filter_map(VaultItem::as_markdown);
    for note in notes {
        let Some(doc) = note.resolved.as_ref() else {
            continue;
        };
        let group = note
            .meta
            .directories()
            .first()
            .map_or(root_name, String::as_str);
        groups
            .entry(group)
            .or_default()
            .push(format!("- {}", doc.link(&doc.name)));
    }

    groups
        .into_iter()
        .map(|(group, links)| format!("## {group}\n\n{}", links.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Create or refresh the index entry inside `container`
pub async fn write_index(
    root: &FolderNode,
    root_name: &str,
    container: &str,
    public: bool,
    documents: &dyn DocumentStore,
    summary: &mut ImportSummary,
) -> Result<ResolvedDocument> {
    let body = render_index(root, root_name);
    let entry_id = identity(Namespace::Journal, INDEX_KEY);
    let page_id = identity(Namespace::Page, INDEX_KEY);

    let entry = match documents
        .find_entry(&entry_id)
        .await
        .context("Failed to look up index entry")?
    {
        Some(entry) => entry,
        None => {
            summary.entries += 1;
            documents
                .create_entry(NewEntry {
                    id: Some(entry_id),
                    name: INDEX_NAME.to_string(),
                    container: Some(container.to_string()),
                    public,
                })
                .await
                .context("Failed to create index entry")?
        }
    };

    match documents
        .find_page(&page_id)
        .await
        .context("Failed to look up index page")?
    {
        Some(page) if page.body == body => {
            debug!(page = %page.id, "Index unchanged");
        }
        Some(page) => {
            documents
                .update_page(&page.id, PageUpdate::body(body.clone()))
                .await
                .context("Failed to update index page")?;
            summary.pages_updated += 1;
        }
        None => {
            documents
                .create_page(NewPage {
                    id: Some(page_id.clone()),
                    entry: entry.id.clone(),
                    name: INDEX_NAME.to_string(),
                    body: body.clone(),
                })
                .await
                .context("Failed to create index page")?;
            summary.pages_created += 1;
        }
    }

    Ok(ResolvedDocument {
        id: page_id,
        entry: entry.id,
        name: INDEX_NAME.to_string(),
        container: entry.container,
        combined: false,
        body: Some(body),
    })
}
