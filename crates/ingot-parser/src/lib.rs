//! Ingot Markdown Parser
//!
//! The minimal note dialect understood by the vault importer:
//! - Leading `---` frontmatter blocks with flat `key: value` lines
//! - Obsidian-style `> [!private]` annotation callouts
//! - Wikilinks `[[note]]`, `[[note|alias]]` and embeds `![[image.png|300x200]]`
//!
//! Nothing in this crate performs I/O; every function is a pure transformation
//! over note text.

pub mod callouts;
pub mod frontmatter;
pub mod headings;
pub mod note;
pub mod wikilinks;

// Re-export main types for convenience
pub use callouts::{strip_annotation_blocks, ANNOTATION_MARKER};
pub use frontmatter::{split_frontmatter, Frontmatter, FrontmatterValue};
pub use headings::guard_headings;
pub use note::{extract_note, ExtractOptions, ExtractedNote};
pub use wikilinks::{patterns_for, LinkKind, LinkMatch, LinkPattern, SizeHint};
