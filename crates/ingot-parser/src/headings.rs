//! Heading marker guard
//!
//! Obsidian treats `#tag` at the start of a line as a tag, while stricter
//! markdown renderers read it as a heading. Prefixing a space keeps the line
//! from becoming a heading without changing how it reads.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static UNSPACED_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6}[\p{L}\p{N}])").expect("unspaced heading regex"));

/// Insert a leading space before `#` markers glued to a letter or digit
pub fn guard_headings(body: &str) -> Cow<'_, str> {
    UNSPACED_HEADING_REGEX.replace_all(body, " $1")
}
