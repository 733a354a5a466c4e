//! File system asset storage
//!
//! Stores uploads below a root directory. Stored paths are `/`-separated and
//! relative to that root, e.g. `vault-assets/maps/city.png`.

use async_trait::async_trait;
use ingot_core::store::AssetResult;
use ingot_core::{AssetError, AssetLocation, AssetStorage, StorageSource};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct LocalAssetStorage {
    root: PathBuf,
}

impl LocalAssetStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn directory(&self, location: &AssetLocation) -> AssetResult<PathBuf> {
        match &location.source {
            StorageSource::Local => Ok(location
                .path
                .split('/')
                .filter(|s| !s.is_empty())
                .fold(self.root.clone(), |dir, segment| dir.join(segment))),
            StorageSource::Remote { bucket, region } => Err(AssetError::Unsupported(format!(
                "remote bucket '{bucket}' in {region}, the CLI only writes to local storage"
            ))),
        }
    }
}

fn stored_path(location: &AssetLocation, file_name: &str) -> String {
    if location.path.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", location.path, file_name)
    }
}

#[async_trait]
impl AssetStorage for LocalAssetStorage {
    async fn upload(
        &self,
        location: &AssetLocation,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AssetResult<String> {
        let dir = self.directory(location)?;
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(file_name), bytes).await?;
        let stored = stored_path(location, file_name);
        debug!(path = %stored, "Stored asset");
        Ok(stored)
    }

    async fn list(&self, location: &AssetLocation) -> AssetResult<Vec<String>> {
        let dir = self.directory(location)?;
        if !tokio::fs::try_exists(&dir).await? {
            return Err(AssetError::MissingLocation(location.path.clone()));
        }

        let mut stored = Vec::new();
        let mut pending = vec![(dir, location.path.clone())];
        while let Some((dir, prefix)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let path = if prefix.is_empty() {
                    name
                } else {
                    format!("{prefix}/{name}")
                };
                if entry.file_type().await?.is_dir() {
                    pending.push((entry.path(), path));
                } else {
                    stored.push(path);
                }
            }
        }
        stored.sort();
        Ok(stored)
    }

    async fn ensure_directory(&self, location: &AssetLocation) -> AssetResult<()> {
        let dir = self.directory(location)?;
        tokio::fs::create_dir_all(&dir).await?;
        Ok(())
    }
}
