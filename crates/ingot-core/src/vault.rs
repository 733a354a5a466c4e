//! Vault items
//!
//! A vault is handed to the importer as a flat list of [`VaultFile`]s. The
//! tree builder turns each one into a [`VaultItem`]: a markdown note or any
//! other file. File contents are only read when the importer gets to them.

use ingot_parser::{extract_note, ExtractOptions, ExtractedNote};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Extension of Obsidian canvas files, which are never imported
pub const CANVAS_EXTENSION: &str = "canvas";

/// Extension of markdown notes
pub const MARKDOWN_EXTENSION: &str = "md";

/// Where a vault file's bytes come from
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Contents already in memory
    Memory(Arc<[u8]>),
    /// A file on the local disk, read on demand
    Disk(PathBuf),
}

impl FileSource {
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Memory(bytes) => Ok(bytes.to_vec()),
            Self::Disk(path) => tokio::fs::read(path).await,
        }
    }
}

/// One entry of the flat vault file list
///
/// `path` is relative and starts with the vault's own directory name, e.g.
/// `"My Vault/People/Alice.md"`.
#[derive(Debug, Clone)]
pub struct VaultFile {
    pub path: String,
    pub source: FileSource,
}

impl VaultFile {
    pub fn new(path: impl Into<String>, source: FileSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// A file whose contents are given as text
    pub fn from_text(path: impl Into<String>, text: &str) -> Self {
        Self::new(path, FileSource::Memory(Arc::from(text.as_bytes())))
    }

    /// A file whose contents are given as bytes
    pub fn from_bytes(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(path, FileSource::Memory(Arc::from(bytes.into())))
    }

    /// A file read lazily from `disk_path`
    pub fn on_disk(path: impl Into<String>, disk_path: impl Into<PathBuf>) -> Self {
        Self::new(path, FileSource::Disk(disk_path.into()))
    }
}

/// Location and classification shared by every item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Directory names below the vault root, then the file name
    pub segments: Vec<String>,
    /// Some segment starts with `.` (`.obsidian`, `.trash`, dotfiles)
    pub hidden: bool,
    pub canvas: bool,
}

impl ItemMeta {
    /// Classify the item at `segments` (vault root already removed)
    pub fn new(segments: Vec<String>) -> Self {
        let hidden = segments.iter().any(|s| s.starts_with('.'));
        let canvas = extension_of(segments.last().map_or("", String::as_str))
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CANVAS_EXTENSION));
        Self {
            segments,
            hidden,
            canvas,
        }
    }

    pub fn file_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        extension_of(self.file_name())
    }

    /// Directory segments, file name excluded
    pub fn directories(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, dirs)) => dirs,
            None => &[],
        }
    }

    /// `/`-joined path below the vault root
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn is_markdown(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
    }
}

fn extension_of(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext),
        _ => None,
    }
}

/// The store records produced for a markdown note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    /// Page id
    pub id: String,
    /// Id of the entry holding the page
    pub entry: String,
    /// Display name of the page
    pub name: String,
    /// Container the entry lives in
    pub container: Option<String>,
    /// The entry is shared by every note of a combined folder
    pub combined: bool,
    /// Page body, present when the page was written during this run
    pub body: Option<String>,
}

impl ResolvedDocument {
    /// Link text identifying this page, without a label
    pub fn anchor(&self) -> String {
        format!("@Doc[{}.{}]", self.entry, self.id)
    }

    /// Resolved link markup showing `label`
    pub fn link(&self, label: &str) -> String {
        format!("{}{{{}}}", self.anchor(), label)
    }

    /// Whether this run wrote the page, making it subject to later passes
    pub fn is_produced(&self) -> bool {
        self.body.is_some()
    }
}

/// A markdown note
#[derive(Debug, Clone)]
pub struct MarkdownItem {
    pub meta: ItemMeta,
    source: FileSource,
    note: Option<ExtractedNote>,
    /// Set once by the orchestrator
    pub resolved: Option<ResolvedDocument>,
}

impl MarkdownItem {
    pub fn new(meta: ItemMeta, source: FileSource) -> Self {
        Self {
            meta,
            source,
            note: None,
            resolved: None,
        }
    }

    /// Read and extract the note, once
    pub async fn load(&mut self, options: &ExtractOptions) -> std::io::Result<&ExtractedNote> {
        let note = match self.note.take() {
            Some(note) => note,
            None => {
                let bytes = self.source.read().await?;
                extract_note(&String::from_utf8_lossy(&bytes), options)
            }
        };
        let note: &ExtractedNote = self.note.insert(note);
        Ok(note)
    }

    /// The extracted note, if [`MarkdownItem::load`] ran
    pub fn note(&self) -> Option<&ExtractedNote> {
        self.note.as_ref()
    }

    /// Display name used for the page
    pub fn title(&self) -> &str {
        self.meta.stem()
    }
}

/// Any vault file that is not a markdown note
#[derive(Debug, Clone)]
pub struct OtherItem {
    pub meta: ItemMeta,
    pub source: FileSource,
    /// Where the file lives in asset storage, once uploaded or matched
    pub upload_path: Option<String>,
}

impl OtherItem {
    pub fn new(meta: ItemMeta, source: FileSource) -> Self {
        Self {
            meta,
            source,
            upload_path: None,
        }
    }
}

/// One file of the vault
#[derive(Debug, Clone)]
pub enum VaultItem {
    Markdown(MarkdownItem),
    Other(OtherItem),
}

impl VaultItem {
    /// Build the item for a file whose vault-root segment is already removed
    pub fn from_segments(segments: Vec<String>, source: FileSource) -> Self {
        let meta = ItemMeta::new(segments);
        if meta.is_markdown() {
            Self::Markdown(MarkdownItem::new(meta, source))
        } else {
            Self::Other(OtherItem::new(meta, source))
        }
    }

    pub fn meta(&self) -> &ItemMeta {
        match self {
            Self::Markdown(item) => &item.meta,
            Self::Other(item) => &item.meta,
        }
    }

    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Markdown(_))
    }

    pub fn as_markdown(&self) -> Option<&MarkdownItem> {
        match self {
            Self::Markdown(item) => Some(item),
            Self::Other(_) => None,
        }
    }

    pub fn as_other(&self) -> Option<&OtherItem> {
        match self {
            Self::Other(item) => Some(item),
            Self::Markdown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(path: &str) -> Vec<String> {
        path.split('/').map(str::to_string).collect()
    }

    #[test]
    fn test_meta_classification() {
        let meta = ItemMeta::new(segments("People/Alice.MD"));
        assert!(meta.is_markdown());
        assert!(!meta.hidden);
        assert_eq!(meta.stem(), "Alice");
        assert_eq!(meta.directories(), ["People".to_string()]);
        assert_eq!(meta.path(), "People/Alice.MD");

        assert!(ItemMeta::new(segments(".obsidian/app.json")).hidden);
        assert!(ItemMeta::new(segments("Board.canvas")).canvas);
        assert!(ItemMeta::new(segments("misc/.gitkeep")).hidden);
        assert_eq!(ItemMeta::new(segments("misc/.gitkeep")).extension(), None);
    }

    #[test]
    fn test_resolved_link_forms() {
        let doc = ResolvedDocument {
            id: "page0000000000id".into(),
            entry: "entry00000000000".into(),
            name: "Note".into(),
            container: None,
            combined: false,
            body: None,
        };
        assert_eq!(doc.anchor(), "@Doc[entry00000000000.page0000000000id]");
        assert_eq!(doc.link("See This"), "@Doc[entry00000000000.page0000000000id]{See This}");
        assert!(!doc.is_produced());
    }

    #[tokio::test]
    async fn test_markdown_is_extracted_once() {
        let file = VaultFile::from_text("v/n.md", "---\npublic: true\n---\nHello");
        let mut item = MarkdownItem::new(ItemMeta::new(segments("n.md")), file.source);
        assert!(item.note().is_none());

        let note = item.load(&ExtractOptions::default()).await.unwrap();
        assert!(note.is_public);
        assert_eq!(note.body, "Hello");
        assert_eq!(item.title(), "n");
    }

    #[tokio::test]
    async fn test_disk_source_missing_file() {
        let source = FileSource::Disk(PathBuf::from("/definitely/not/here.md"));
        assert!(source.read().await.is_err());
    }
}
