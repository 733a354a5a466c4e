//! Wikilink patterns
//!
//! Every imported file can be referenced by its name, with or without
//! extension:
//! - Notes: `[[note]]`, `[[note.md]]`, `[[note|alias]]`, `![[note]]`
//! - Assets: `![[image.png]]`, `![[image.png|alias]]`, `![[image.png|300]]`,
//!   `![[image.png|300x200]]`, `![[image.png|alias|300x200]]`
//!
//! A [`LinkPattern`] recognises the references to one file. Matching is
//! case-insensitive and ignores anything inside inline or fenced code.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static CODE_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```[\s\S]*?^```|`[^`\n]+`").expect("code block regex"));

static SIZE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d+)(?:x(\d+))?\s*$").expect("size regex"));

/// What kind of file a pattern refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A markdown note, linked with `[[...]]` or embedded with `![[...]]`
    Note,
    /// A media file, only ever embedded with `![[...]]`
    Asset,
}

/// Display size requested by an embed (`|W` or `|WxH`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeHint {
    pub width: u32,
    pub height: Option<u32>,
}

/// One reference found in a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Byte range of the whole reference, brackets included
    pub range: Range<usize>,
    /// The target exactly as written
    pub target: String,
    pub alias: Option<String>,
    pub size: Option<SizeHint>,
}

impl LinkMatch {
    /// Text to display for the link: the alias, or the target as written
    pub fn display(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.target)
    }
}

/// Matching rule for references to a single file name
#[derive(Debug, Clone)]
pub struct LinkPattern {
    name: String,
    kind: LinkKind,
    regex: Regex,
}

impl LinkPattern {
    /// Build the pattern for `name` (used verbatim, regex-escaped)
    pub fn new(name: &str, kind: LinkKind) -> Self {
        let embed = match kind {
            LinkKind::Note => "!?",
            LinkKind::Asset => "!",
        };
        let source = format!(
            r"(?i){embed}\[\[({name})(?:\|([^\]\n]*))?\]\]",
            name = regex::escape(name)
        );
        let regex = Regex::new(&source).expect("escaped link pattern is always valid");
        Self {
            name: name.to_string(),
            kind,
            regex,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    /// Find every reference this pattern recognises, outside code
    pub fn find_matches(&self, body: &str) -> Vec<LinkMatch> {
        if !body.contains("[[") {
            return Vec::new();
        }
        let code: Vec<Range<usize>> = CODE_BLOCK_REGEX.find_iter(body).map(|m| m.range()).collect();

        self.regex
            .captures_iter(body)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                if code.iter().any(|r| r.contains(&whole.start())) {
                    return None;
                }
                let target = cap.get(1)?.as_str().to_string();
                let (alias, size) = self.split_suffix(cap.get(2).map(|m| m.as_str()));
                Some(LinkMatch {
                    range: whole.range(),
                    target,
                    alias,
                    size,
                })
            })
            .collect()
    }

    /// Whether `body` contains at least one reference
    pub fn is_match(&self, body: &str) -> bool {
        !self.find_matches(body).is_empty()
    }

    /// Replace every reference with the text produced by `render`
    ///
    /// Returns `None` when the body holds no reference at all.
    pub fn replace_in<F>(&self, body: &str, mut render: F) -> Option<String>
    where
        F: FnMut(&LinkMatch) -> String,
    {
        let matches = self.find_matches(body);
        if matches.is_empty() {
            return None;
        }

        let mut out = String::with_capacity(body.len());
        let mut last = 0;
        for m in &matches {
            out.push_str(&body[last..m.range.start]);
            out.push_str(&render(m));
            last = m.range.end;
        }
        out.push_str(&body[last..]);
        Some(out)
    }

    fn split_suffix(&self, suffix: Option<&str>) -> (Option<String>, Option<SizeHint>) {
        let Some(suffix) = suffix else {
            return (None, None);
        };

        if self.kind == LinkKind::Asset {
            let (head, last) = match suffix.rsplit_once('|') {
                Some((head, last)) => (Some(head), last),
                None => (None, suffix),
            };
            if let Some(size) = parse_size(last) {
                return (head.and_then(non_empty), Some(size));
            }
        }

        (non_empty(suffix), None)
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_size(s: &str) -> Option<SizeHint> {
    let cap = SIZE_REGEX.captures(s)?;
    let width = cap[1].parse().ok()?;
    let height = match cap.get(2) {
        Some(h) => Some(h.as_str().parse().ok()?),
        None => None,
    };
    Some(SizeHint { width, height })
}

/// Patterns recognising references to `file_name`
///
/// The full name comes first, then the name without its extension when the
/// two differ.
pub fn patterns_for(file_name: &str, kind: LinkKind) -> Vec<LinkPattern> {
    let mut patterns = vec![LinkPattern::new(file_name, kind)];
    if let Some((stem, _ext)) = file_name.rsplit_once('.') {
        if !stem.is_empty() {
            patterns.push(LinkPattern::new(stem, kind));
        }
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_with_and_without_extension() {
        let patterns = patterns_for("Note A.md", LinkKind::Note);
        let names: Vec<_> = patterns.iter().map(LinkPattern::name).collect();
        assert_eq!(names, vec!["Note A.md", "Note A"]);

        assert_eq!(patterns_for("README", LinkKind::Note).len(), 1);
        assert_eq!(patterns_for(".env", LinkKind::Asset).len(), 1);
    }

    #[test]
    fn test_note_link_with_alias() {
        let pattern = LinkPattern::new("Note A", LinkKind::Note);
        let found = pattern.find_matches("See [[note a|See This]] and [[Note A]].");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].target, "note a");
        assert_eq!(found[0].display(), "See This");
        assert_eq!(found[1].alias, None);
        assert_eq!(found[1].display(), "Note A");
    }

    #[test]
    fn test_longer_names_are_not_matched() {
        let pattern = LinkPattern::new("Note", LinkKind::Note);
        assert!(!pattern.is_match("[[Notebook]] [[My Note]] [[Note.md]]"));
        assert!(pattern.is_match("![[Note]]"));
    }

    #[test]
    fn test_regex_characters_in_names() {
        let pattern = LinkPattern::new("C++ (draft) [v2]", LinkKind::Note);
        assert!(pattern.is_match("[[c++ (DRAFT) [v2]]]"));
        assert!(!pattern.is_match("[[Cxx (draft) [v2]]]"));
    }

    fn size(width: u32, height: Option<u32>) -> Option<SizeHint> {
        Some(SizeHint { width, height })
    }

    #[test]
    fn test_asset_sizes() {
        let pattern = LinkPattern::new("img.png", LinkKind::Asset);
        let found = pattern.find_matches(
            "![[img.png|300x200]] ![[img.png|300]] ![[img.png|Map|40x30]] ![[img.png|Map]]",
        );
        assert_eq!(found.len(), 4);
        assert_eq!(found[0].size, size(300, Some(200)));
        assert_eq!(found[0].alias, None);
        assert_eq!(found[1].size, size(300, None));
        assert_eq!(found[2].alias.as_deref(), Some("Map"));
        assert_eq!(found[2].size, size(40, Some(30)));
        assert_eq!(found[3].alias.as_deref(), Some("Map"));
        assert_eq!(found[3].size, None);
    }

    #[test]
    fn test_size_separator_is_case_insensitive() {
        let pattern = LinkPattern::new("img.png", LinkKind::Asset);
        let found = pattern.find_matches("![[img.png|300X200]] ![[img.png|Map|40X30]]");
        assert_eq!(found[0].size, size(300, Some(200)));
        assert_eq!(found[0].alias, None);
        assert_eq!(found[1].size, size(40, Some(30)));
        assert_eq!(found[1].alias.as_deref(), Some("Map"));
    }

    #[test]
    fn test_assets_require_embed_syntax() {
        let pattern = LinkPattern::new("img.png", LinkKind::Asset);
        assert!(!pattern.is_match("[[img.png]]"));
        assert!(pattern.is_match("![[IMG.PNG]]"));
    }

    #[test]
    fn test_note_suffix_digits_are_an_alias() {
        let pattern = LinkPattern::new("Session", LinkKind::Note);
        let found = pattern.find_matches("[[Session|42]]");
        assert_eq!(found[0].alias.as_deref(), Some("42"));
        assert_eq!(found[0].size, None);
    }

    #[test]
    fn test_code_is_ignored() {
        let pattern = LinkPattern::new("Note", LinkKind::Note);
        let body = "`[[Note]]`\n```\n[[Note]]\n```\n[[Note]]";
        let found = pattern.find_matches(body);
        assert_eq!(found.len(), 1);
        assert_eq!(&body[found[0].range.clone()], "[[Note]]");
        assert_eq!(found[0].range.start, body.len() - "[[Note]]".len());
    }

    #[test]
    fn test_replace_in() {
        let pattern = LinkPattern::new("Note", LinkKind::Note);
        let out = pattern.replace_in("a [[Note|x]] b [[Note]] c", |m| format!("<{}>", m.display()));
        assert_eq!(out.as_deref(), Some("a <x> b <Note> c"));
        assert_eq!(pattern.replace_in("nothing here", |_| String::new()), None);
    }
}
