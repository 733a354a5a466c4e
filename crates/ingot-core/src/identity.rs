//! Deterministic identities
//!
//! Every store record created by an import gets an id derived from what it
//! represents, so a second import of the same vault finds the records of the
//! first one instead of creating duplicates.
//!
//! ## Format
//!
//! `"{namespace}:{path}"` is hashed three times with a 32-bit
//! multiply/xor-shift hash, each round using its own seed and multiplier.
//! Each value is written as 7 zero-padded base-36 digits, of which the last
//! 6, 5 and 5 are kept, for a 16-character lowercase alphanumeric id.
//!
//! ## Collisions
//!
//! There is no collision detection. Roughly 83 bits of hash output back each
//! id, which makes a collision inside a single vault unlikely but not
//! impossible. The assumption is pinned by `test_no_collisions_in_large_vault`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of every identity
pub const IDENTITY_LEN: usize = 16;

/// Separates a page path from its sub-page name. Obsidian forbids `|` in
/// file names, so it never occurs inside a vault path.
pub const SUB_PAGE_SEPARATOR: char = '|';

const ROUNDS: [(u32, u32); 3] = [
    (0x811c_9dc5, 0x0100_0193),
    (0x9e37_79b9, 0x85eb_ca6b),
    (0x27d4_eb2f, 0xc2b2_ae35),
];
const WIDTHS: [usize; 3] = [6, 5, 5];
const BASE36_WIDTH: usize = 7;
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Kind of record an identity is derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Destination containers (folders)
    Folder,
    /// Entries (documents holding pages)
    Journal,
    /// Pages inside entries
    Page,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Journal => "journal",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "folder" => Ok(Self::Folder),
            "journal" => Ok(Self::Journal),
            "page" => Ok(Self::Page),
            other => Err(format!("unknown namespace '{other}' (expected folder, journal or page)")),
        }
    }
}

fn rolling_hash(input: &[u8], seed: u32, multiplier: u32) -> u32 {
    input.iter().fold(seed, |h, &b| {
        let h = (h ^ u32::from(b)).wrapping_mul(multiplier);
        h ^ (h >> 13)
    })
}

fn push_base36(out: &mut String, mut value: u32, keep: usize) {
    let mut digits = [b'0'; BASE36_WIDTH];
    for slot in digits.iter_mut().rev() {
        *slot = DIGITS[(value % 36) as usize];
        value /= 36;
    }
    let tail = &digits[BASE36_WIDTH - keep..];
    out.extend(tail.iter().map(|&d| char::from(d)));
}

/// Derive the identity of `path` within `namespace`
pub fn identity(namespace: Namespace, path: &str) -> String {
    let input = format!("{namespace}:{path}");
    let mut id = String::with_capacity(IDENTITY_LEN);
    for ((seed, multiplier), width) in ROUNDS.iter().zip(WIDTHS) {
        push_base36(&mut id, rolling_hash(input.as_bytes(), *seed, *multiplier), width);
    }
    id
}

/// Identity of a page, optionally distinguished by a sub-page name
pub fn page_identity(path: &str, sub_page: Option<&str>) -> String {
    match sub_page {
        Some(name) => identity(Namespace::Page, &format!("{path}{SUB_PAGE_SEPARATOR}{name}")),
        None => identity(Namespace::Page, path),
    }
}
