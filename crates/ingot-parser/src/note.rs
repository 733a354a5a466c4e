//! Full note extraction: frontmatter, visibility and the cleaned body

use crate::callouts::strip_annotation_blocks;
use crate::frontmatter::{split_frontmatter, Frontmatter};
use crate::headings::guard_headings;
use serde::{Deserialize, Serialize};

/// Options controlling note extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Remove `> [!private]` annotation blocks from the body
    pub strip_annotations: bool,
    /// Visibility for notes whose frontmatter does not declare one
    pub default_public: bool,
}

/// Result of extracting a note's raw text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedNote {
    pub frontmatter: Frontmatter,
    pub is_public: bool,
    pub body: String,
}

/// Split `raw` into frontmatter and body and clean the body up for import
pub fn extract_note(raw: &str, options: &ExtractOptions) -> ExtractedNote {
    let (frontmatter, body) = split_frontmatter(raw);
    let is_public = frontmatter.visibility().unwrap_or(options.default_public);

    let body = if options.strip_annotations {
        strip_annotation_blocks(body)
    } else {
        body.into()
    };
    let body = guard_headings(&body).into_owned();

    ExtractedNote {
        frontmatter,
        is_public,
        body,
    }
}
