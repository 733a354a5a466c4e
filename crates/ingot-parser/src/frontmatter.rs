//! Frontmatter extraction
//!
//! Frontmatter is the block between a leading `---` line and the next `---`
//! line. It is read line by line rather than as YAML: every `key: value` line
//! becomes an entry and anything else in the block is ignored, so a broken
//! line never costs the rest of the note.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static FRONTMATTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---\r?\n(?s:(.*?)\r?\n)?---(?:\r?\n|$)").expect("frontmatter regex")
});

static KEY_VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9_-]+)\s*:\s*(.*?)\s*$").expect("key value regex"));

/// A single frontmatter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Bool(bool),
    Text(String),
}

impl FrontmatterValue {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        Self::Text(unquote(raw).to_string())
    }

    /// Returns the boolean value, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }
}

fn unquote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Parsed frontmatter: lowercase keys mapped to values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    values: BTreeMap<String, FrontmatterValue>,
}

impl Frontmatter {
    /// Parse the inside of a frontmatter block (without the `---` fences)
    pub fn parse_block(block: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in block.lines() {
            let Some(cap) = KEY_VALUE_REGEX.captures(line) else {
                continue;
            };
            let key = cap[1].to_lowercase();
            values.insert(key, FrontmatterValue::parse(&cap[2]));
        }
        Self { values }
    }

    /// Look up a value by key (keys are case-insensitive)
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.values.get(&key.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FrontmatterValue)> {
        self.values.iter()
    }

    /// Explicit visibility declared by the note, if any
    ///
    /// `public: true` or `visibility: public` make a note public. Any other
    /// value of either key makes it private. `None` means the note says
    /// nothing and the caller's default applies.
    pub fn visibility(&self) -> Option<bool> {
        let public = self.get("public");
        let visibility = self.get("visibility");
        if public.is_none() && visibility.is_none() {
            return None;
        }

        let by_flag = public.and_then(FrontmatterValue::as_bool).unwrap_or(false);
        let by_name = visibility
            .and_then(FrontmatterValue::as_str)
            .is_some_and(|v| v.eq_ignore_ascii_case("public"));
        Some(by_flag || by_name)
    }
}

/// Split raw note text into its frontmatter and the remaining body
///
/// Text without a leading frontmatter block comes back whole as the body,
/// with empty frontmatter.
pub fn split_frontmatter(raw: &str) -> (Frontmatter, &str) {
    match FRONTMATTER_REGEX.captures(raw) {
        Some(cap) => {
            let block = cap.get(1).map_or("", |m| m.as_str());
            let end = cap.get(0).map_or(0, |m| m.end());
            (Frontmatter::parse_block(block), &raw[end..])
        }
        None => (Frontmatter::default(), raw),
    }
}
