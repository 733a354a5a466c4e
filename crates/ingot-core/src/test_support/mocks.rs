//! Mock Implementations for Testing
//!
//! In-memory collaborators that record every call so tests can assert on
//! what the pipeline did:
//!
//! - [`RecordingAssetStorage`] - asset storage with configurable listings
//! - [`RecordingFormatter`] - page formatter that records every page
//!
//! # Examples
//!
//! ```rust,ignore
//! use ingot_core::test_support::RecordingAssetStorage;
//!
//! let storage = RecordingAssetStorage::new()
//!     .with_existing("assets", ["assets/photo.png"]);
//! assert!(storage.uploads().is_empty());
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use crate::store::{
    AssetError, AssetLocation, AssetResult, AssetStorage, PageFormatter, PageRef, StoreError,
    StoreResult,
};

/// One recorded upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub location: String,
    pub file_name: String,
    pub size: usize,
}

/// Asset storage that keeps listings in memory and records uploads
#[derive(Debug, Default)]
pub struct RecordingAssetStorage {
    listings: Mutex<BTreeMap<String, Vec<String>>>,
    uploads: Mutex<Vec<Upload>>,
    ensured: Mutex<Vec<String>>,
    list_calls: Mutex<usize>,
    fail_uploads: bool,
}

impl RecordingAssetStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `location` with files at `paths`
    pub fn with_existing<I, S>(self, location: &str, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listings
            .lock()
            .entry(location.to_string())
            .or_default()
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Make every upload fail with a backend error
    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().clone()
    }

    /// Locations passed to `ensure_directory`, in call order
    pub fn ensured(&self) -> Vec<String> {
        self.ensured.lock().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock()
    }
}

#[async_trait]
impl AssetStorage for RecordingAssetStorage {
    async fn upload(
        &self,
        location: &AssetLocation,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AssetResult<String> {
        if self.fail_uploads {
            return Err(AssetError::Backend(format!("upload of {file_name} rejected")));
        }
        let path = if location.path.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", location.path, file_name)
        };
        self.uploads.lock().push(Upload {
            location: location.path.clone(),
            file_name: file_name.to_string(),
            size: bytes.len(),
        });
        self.listings
            .lock()
            .entry(location.path.clone())
            .or_default()
            .push(path.clone());
        Ok(path)
    }

    async fn list(&self, location: &AssetLocation) -> AssetResult<Vec<String>> {
        *self.list_calls.lock() += 1;
        self.listings
            .lock()
            .get(&location.path)
            .cloned()
            .ok_or_else(|| AssetError::MissingLocation(location.path.clone()))
    }

    async fn ensure_directory(&self, location: &AssetLocation) -> AssetResult<()> {
        self.ensured.lock().push(location.path.clone());
        self.listings
            .lock()
            .entry(location.path.clone())
            .or_default();
        Ok(())
    }
}

/// Page formatter that records the pages it was asked to convert
#[derive(Debug, Default)]
pub struct RecordingFormatter {
    calls: Mutex<Vec<PageRef>>,
    fail_on: Option<String>,
}

impl RecordingFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when asked to format the page called `name`
    pub fn failing_on(name: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(name.into()),
        }
    }

    /// Formatted pages, sorted by page id
    pub fn formatted(&self) -> Vec<PageRef> {
        let mut calls = self.calls.lock().clone();
        calls.sort_by(|a, b| a.page.cmp(&b.page));
        calls
    }
}

#[async_trait]
impl PageFormatter for RecordingFormatter {
    async fn format_page(&self, page: &PageRef) -> StoreResult<()> {
        if self.fail_on.as_deref() == Some(page.name.as_str()) {
            return Err(StoreError::backend(format!("cannot format {}", page.name)));
        }
        self.calls.lock().push(page.clone());
        Ok(())
    }
}
