//! Backlinks
//!
//! Third stage of an import. Every page written this run gets a References
//! section listing the notes whose page links to it. Bodies are read before
//! any section is appended, so a References list never counts as a link.

use anyhow::{Context, Result};
use ingot_core::store::PageUpdate;
use ingot_core::{DocumentStore, FolderNode, ResolvedDocument, VaultItem};
use tracing::debug;

/// Heading of the appended section
pub const REFERENCES_HEADING: &str = "## References";

/// Render the section listing `linkers`, in the given order
pub fn references_section(linkers: &[&ResolvedDocument]) -> String {
    let lines: Vec<String> = linkers
        .iter()
        .map(|doc| format!("- {}", doc.link(&doc.name)))
        .collect();
    format!("\n\n{REFERENCES_HEADING}\n\n{}", lines.join("\n"))
}

fn by_display_name(a: &&ResolvedDocument, b: &&ResolvedDocument) -> std::cmp::Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Append References sections, returning how many pages got one
pub async fn append_backlinks(
    root: &mut FolderNode,
    documents: &dyn DocumentStore,
) -> Result<usize> {
    let mut sources: Vec<(ResolvedDocument, String)> = Vec::new();
    for item in root.walk() {
        let Some(doc) = item.as_markdown().and_then(|note| note.resolved.as_ref()) else {
            continue;
        };
        let body = match &doc.body {
            Some(body) => Some(body.clone()),
            None => documents
                .find_page(&doc.id)
                .await
                .with_context(|| format!("Failed to read page '{}'", doc.name))?
                .map(|page| page.body),
        };
        if let Some(body) = body {
            sources.push((doc.clone(), body));
        }
    }

    let mut appended = 0;
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

        let anchor = doc.anchor();
        let mut linkers: Vec<&ResolvedDocument> = sources
            .iter()
            .filter(|(source, text)| source.id != doc.id && text.contains(&anchor))
            .map(|(source, _)| source)
            .collect();
        if linkers.is_empty() {
            continue;
        }
        linkers.sort_by(by_display_name);

        let updated = format!("{body}{}", references_section(&linkers));
        documents
            .update_page(&doc.id, PageUpdate::body(updated.clone()))
            .await
            .with_context(|| format!("Failed to save backlinks of '{}'", note.meta.path()))?;
        debug!(page = %doc.id, count = linkers.len(), "Appended backlinks");
        doc.body = Some(updated);
        appended += 1;
    }

    Ok(appended)
}
