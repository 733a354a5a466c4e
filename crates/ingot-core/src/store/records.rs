//! Store records
//!
//! The destination store knows three record types: containers (folders),
//! entries (documents) and the pages inside entries. Creation requests carry
//! an optional id; a store must keep a supplied id rather than generate one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A folder-like container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContainer {
    pub id: Option<String>,
    pub name: String,
    pub parent: Option<String>,
}

/// A document holding one or more pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Visible to everyone rather than only to its owner
    #[serde(default)]
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub id: Option<String>,
    pub name: String,
    pub container: Option<String>,
    pub public: bool,
}

/// Fields of an entry that can change after creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub public: Option<bool>,
}

/// A page of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub entry: String,
    pub name: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub id: Option<String>,
    pub entry: String,
    pub name: String,
    pub body: String,
}

/// Fields of a page that can change after creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageUpdate {
    pub body: Option<String>,
}

impl PageUpdate {
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Reference to a page handed to the format conversion pass
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    pub entry: String,
    pub page: String,
    pub name: String,
}
