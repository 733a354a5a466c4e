//! Annotation callout removal
//!
//! Annotation blocks are Obsidian callouts the author keeps to themselves:
//!
//! ```text
//! > [!private] Spoilers
//! > The butler did it.
//! ```
//!
//! The header line opens the block and every directly following `>` line
//! belongs to it. The first line without a `>` prefix ends the block.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Callout type that marks an annotation block
pub const ANNOTATION_MARKER: &str = "[!private]";

static ANNOTATION_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*>\s*\[!private\]").expect("annotation header regex"));

fn is_continuation(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

/// Remove every annotation block from `body`
pub fn strip_annotation_blocks(body: &str) -> Cow<'_, str> {
    if !body.to_ascii_lowercase().contains(ANNOTATION_MARKER) {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut in_block = false;
    let mut removed = 0usize;

    for line in body.split_inclusive('\n') {
        if ANNOTATION_HEADER_REGEX.is_match(line) {
            in_block = true;
            removed += 1;
            continue;
        }
        if in_block && is_continuation(line) {
            continue;
        }
        in_block = false;
        out.push_str(line);
    }

    tracing::trace!(blocks = removed, "stripped annotation callouts");
    Cow::Owned(out)
}
