//! Link resolution
//!
//! Second stage of an import. Once every note has a page and every asset a
//! stored path, wiki-links in the pages written this run are replaced:
//!
//! - `[[Note]]`, `[[Note|alias]]` become `@Doc[{entry}.{page}]{label}`
//! - `![[image.png|alias|300x200]]` becomes `![alias](path =300x200)`
//!
//! Links to files that were not imported stay as they are.

use anyhow::{Context, Result};
use ingot_core::store::PageUpdate;
use ingot_core::{DocumentStore, FolderNode, ResolvedDocument, VaultItem};
use ingot_parser::{patterns_for, LinkKind, LinkMatch, LinkPattern};
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone)]
enum Resolution {
    Note(ResolvedDocument),
    Asset(String),
}

/// An imported file that links can resolve to
#[derive(Debug, Clone)]
pub struct LinkTarget {
    patterns: Vec<LinkPattern>,
    resolution: Resolution,
}

impl LinkTarget {
    pub fn note(file_name: &str, document: ResolvedDocument) -> Self {
        Self {
            patterns: patterns_for(file_name, LinkKind::Note),
            resolution: Resolution::Note(document),
        }
    }

    pub fn asset(file_name: &str, stored_path: impl Into<String>) -> Self {
        Self {
            patterns: patterns_for(file_name, LinkKind::Asset),
            resolution: Resolution::Asset(stored_path.into()),
        }
    }

    fn page_id(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Note(doc) => Some(&doc.id),
            Resolution::Asset(_) => None,
        }
    }

    fn render(&self, link: &LinkMatch) -> String {
        match &self.resolution {
            Resolution::Note(doc) => doc.link(link.display()),
            Resolution::Asset(path) => match link.size {
                Some(size) => {
                    let height = size
                        .height
                        .map_or_else(|| "*".to_string(), |h| h.to_string());
                    format!("![{}]({} ={}x{})", link.display(), path, size.width, height)
                }
                None => format!("![{}]({})", link.display(), path),
            },
        }
    }
}

/// Every note with a page and every asset with a stored path
pub fn collect_targets(root: &FolderNode) -> Vec<LinkTarget> {
    root.walk()
        .into_iter()
        .filter_map(|item| match item {
            VaultItem::Markdown(note) => note
                .resolved
                .as_ref()
                .map(|doc| LinkTarget::note(note.meta.file_name(), doc.clone())),
            VaultItem::Other(asset) => asset
                .upload_path
                .as_ref()
                .map(|path| LinkTarget::asset(asset.meta.file_name(), path.clone())),
        })
        .collect()
}

/// Rewrite the links in the body of page `own_page`
///
/// Returns the new body and the number of links replaced, or `None` when
/// nothing matched. A page never links to itself.
pub fn rewrite_links(
    body: &str,
    targets: &[LinkTarget],
    own_page: &str,
) -> Option<(String, usize)> {
    let mut current = Cow::Borrowed(body);
    let mut count = 0;

    for target in targets.iter().filter(|t| t.page_id() != Some(own_page)) {
        for pattern in &target.patterns {
            let replaced = pattern.replace_in(&current, |link| {
                count += 1;
                target.render(link)
            });
            if let Some(replaced) = replaced {
                current = Cow::Owned(replaced);
            }
        }
    }

    (count > 0).then(|| (current.into_owned(), count))
}

/// Rewrite and persist the links of every page written this run
pub async fn resolve_links(root: &mut FolderNode, documents: &dyn DocumentStore) -> Result<usize> {
    let targets = collect_targets(root);
    let mut rewritten = 0;

    for item in root.walk_mut() {
        let VaultItem::Markdown(note) = item else {
            continue;
        };
        let Some(doc) = note.resolved.as_mut() else {
            continue;
        };
        let Some(body) = doc.body.as_deref() else {
            continue;
        };
        let Some((updated, count)) = rewrite_links(body, &targets, &doc.id) else {
            continue;
        };

        documents
            .update_page(&doc.id, PageUpdate::body(updated.clone()))
            .await
            .with_context(|| format!("Failed to save links of '{}'", note.meta.path()))?;
        debug!(page = %doc.id, count, "Rewrote links");
        doc.body = Some(updated);
        rewritten += count;
    }

    Ok(rewritten)
}
