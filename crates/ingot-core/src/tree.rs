//! Folder tree construction
//!
//! Turns the flat vault file list into a tree of [`FolderNode`]s mirroring
//! the vault's directories. The vault's own directory name is dropped, so
//! renaming a vault never changes the identities derived from item paths.

use crate::vault::{FileSource, MarkdownItem, OtherItem, VaultFile, VaultItem};
use tracing::{debug, trace};

/// A directory of the vault
#[derive(Debug, Clone, Default)]
pub struct FolderNode {
    /// Directory name, empty only for the root
    pub name: String,
    /// Sub-directories in first-seen order, names unique
    pub children: Vec<FolderNode>,
    /// Files in first-seen order
    pub items: Vec<VaultItem>,
}

impl FolderNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            items: Vec::new(),
        }
    }

    /// The synthetic root of a vault
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&FolderNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Find the child called `name`, creating it at the end if missing
    pub fn child_or_insert(&mut self, name: &str) -> &mut FolderNode {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.children.push(FolderNode::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Markdown items directly in this folder
    pub fn markdown_items(&self) -> impl Iterator<Item = &MarkdownItem> {
        self.items.iter().filter_map(VaultItem::as_markdown)
    }

    /// Non-markdown items directly in this folder
    pub fn other_items(&self) -> impl Iterator<Item = &OtherItem> {
        self.items.iter().filter_map(VaultItem::as_other)
    }

    /// At least one markdown item directly in this folder
    pub fn has_markdown(&self) -> bool {
        self.items.iter().any(VaultItem::is_markdown)
    }

    /// At least one markdown item in this folder or below
    pub fn subtree_has_markdown(&self) -> bool {
        self.has_markdown() || self.children.iter().any(FolderNode::subtree_has_markdown)
    }

    /// Every item of the subtree: a folder's files before its children's
    pub fn walk(&self) -> Vec<&VaultItem> {
        fn collect<'a>(node: &'a FolderNode, out: &mut Vec<&'a VaultItem>) {
            out.extend(node.items.iter());
            for child in &node.children {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// Mutable counterpart of [`FolderNode::walk`], same order
    pub fn walk_mut(&mut self) -> Vec<&mut VaultItem> {
        fn collect<'a>(node: &'a mut FolderNode, out: &mut Vec<&'a mut VaultItem>) {
            out.extend(node.items.iter_mut());
            for child in node.children.iter_mut() {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// Number of items in the subtree
    pub fn item_count(&self) -> usize {
        let nested: usize = self.children.iter().map(FolderNode::item_count).sum();
        self.items.len() + nested
    }
}

/// Split a vault path into segments and drop the vault's own directory
fn vault_segments(path: &str) -> Vec<String> {
    let mut segments: Vec<String> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.len() > 1 {
        segments.remove(0);
    }
    segments
}

/// Build the folder tree for a flat vault file list
///
/// Hidden files and canvas files are skipped.
pub fn build_tree<I>(files: I) -> FolderNode
where
    I: IntoIterator<Item = VaultFile>,
{
    let mut root = FolderNode::root();
    let mut skipped = 0usize;

    for VaultFile { path, source } in files {
        let item = item_for(&path, source);
        let meta = item.meta();
        if meta.hidden || meta.canvas || meta.segments.is_empty() {
            trace!(path = %path, "skipping hidden or canvas file");
            skipped += 1;
            continue;
        }

        let mut folder = &mut root;
        for dir in meta.directories().to_vec() {
            folder = folder.child_or_insert(&dir);
        }
        folder.items.push(item);
    }

    debug!(items = root.item_count(), skipped, "built vault tree");
    root
}

fn item_for(path: &str, source: FileSource) -> VaultItem {
    VaultItem::from_segments(vault_segments(path), source)
}
