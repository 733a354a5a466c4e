//! Collaborator traits
//!
//! The importer only ever talks to its destination through these traits.
//! Implementations live outside the pipeline: [`MemoryStore`] for tests and
//! the CLI, anything else (a remote API, a database) in the embedding
//! application.
//!
//! [`MemoryStore`]: super::MemoryStore

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::{AssetResult, StoreResult};
use super::records::{
    Container, Entry, EntryUpdate, NewContainer, NewEntry, NewPage, Page, PageRef, PageUpdate,
};

/// Folder-like containers
#[async_trait]
pub trait ContainerStore: Send + Sync {
    async fn find_container(&self, id: &str) -> StoreResult<Option<Container>>;

    async fn find_container_by_name(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> StoreResult<Option<Container>>;

    /// Create a container, keeping `new.id` when given
    async fn create_container(&self, new: NewContainer) -> StoreResult<Container>;
}

/// Entries and their pages
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_entry(&self, id: &str) -> StoreResult<Option<Entry>>;

    async fn find_entry_by_name(
        &self,
        name: &str,
        container: Option<&str>,
    ) -> StoreResult<Option<Entry>>;

    /// Create an entry, keeping `new.id` when given
    async fn create_entry(&self, new: NewEntry) -> StoreResult<Entry>;

    async fn update_entry(&self, id: &str, update: EntryUpdate) -> StoreResult<()>;

    async fn find_page(&self, id: &str) -> StoreResult<Option<Page>>;

    async fn find_page_by_name(&self, name: &str, entry: &str) -> StoreResult<Option<Page>>;

    /// Create a page, keeping `new.id` when given
    async fn create_page(&self, new: NewPage) -> StoreResult<Page>;

    async fn update_page(&self, id: &str, update: PageUpdate) -> StoreResult<()>;
}

/// Backend an asset location refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageSource {
    /// The host's own file storage
    Local,
    /// An object storage bucket
    Remote { bucket: String, region: String },
}

/// A directory in asset storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetLocation {
    pub source: StorageSource,
    /// `/`-separated path, no leading or trailing slash
    pub path: String,
}

impl AssetLocation {
    pub fn new(source: StorageSource, path: impl AsRef<str>) -> Self {
        Self {
            source,
            path: path.as_ref().trim_matches('/').to_string(),
        }
    }

    pub fn local(path: impl AsRef<str>) -> Self {
        Self::new(StorageSource::Local, path)
    }

    /// This location extended by `segments`
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> Self {
        let mut path = self.path.clone();
        for segment in segments {
            let segment = segment.as_ref().trim_matches('/');
            if segment.is_empty() {
                continue;
            }
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(segment);
        }
        Self {
            source: self.source.clone(),
            path,
        }
    }
}

/// Binary asset storage
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Store `bytes` as `file_name` in `location`, returning the stored path
    async fn upload(
        &self,
        location: &AssetLocation,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AssetResult<String>;

    /// Paths of the files stored under `location`
    ///
    /// Fails with [`AssetError::MissingLocation`] when `location` does not
    /// exist yet.
    ///
    /// [`AssetError::MissingLocation`]: super::AssetError::MissingLocation
    async fn list(&self, location: &AssetLocation) -> AssetResult<Vec<String>>;

    async fn ensure_directory(&self, location: &AssetLocation) -> AssetResult<()>;
}

/// Post-import format conversion of a single page
#[async_trait]
pub trait PageFormatter: Send + Sync {
    async fn format_page(&self, page: &PageRef) -> StoreResult<()>;
}
