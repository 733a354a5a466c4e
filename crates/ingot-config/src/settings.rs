//! Import settings
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. Unknown keys are rejected to catch typos.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportSettings {
    /// Vault directory. The CLI fills this from its positional argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<PathBuf>,
    /// Name of the top-level container every import lands in
    pub root_name: String,
    /// Merge the notes of a folder into one entry, one page per note
    pub combine_notes: bool,
    /// Only merge folders without child folders
    pub combine_leaves_only: bool,
    /// Upload attachments (images, PDFs, ...) alongside the notes
    pub import_non_markdown: bool,
    /// Rewrite pages that already exist in the store
    pub overwrite: bool,
    /// Keep quiet about notes that already exist
    pub ignore_duplicate: bool,
    /// Visibility of notes whose frontmatter says nothing
    pub default_public: bool,
    /// Drop `> [!private]` callout blocks from note bodies
    pub strip_annotations: bool,
    /// Write an "Index" entry linking every imported note
    pub create_index: bool,
    /// Append a References section to every linked note
    pub create_backlinks: bool,
    /// Asset directory, relative to the storage root
    pub asset_destination: String,
    /// Reuse assets already present at the destination
    pub skip_duplicate_assets: bool,
    pub remote_storage: RemoteStorageConfig,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            vault_path: None,
            root_name: "Vault Import".to_string(),
            combine_notes: false,
            combine_leaves_only: false,
            import_non_markdown: false,
            overwrite: false,
            ignore_duplicate: false,
            default_public: false,
            strip_annotations: false,
            create_index: false,
            create_backlinks: true,
            asset_destination: "vault-assets".to_string(),
            skip_duplicate_assets: false,
            remote_storage: RemoteStorageConfig::default(),
        }
    }
}

/// Object storage bucket for uploaded assets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteStorageConfig {
    pub enabled: bool,
    pub bucket: String,
    pub region: String,
}

impl ImportSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML settings file
    pub async fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "Loaded settings file");
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the settings before any import work starts
    pub fn validate(&self) -> ConfigResult<()> {
        if self.root_name.trim().is_empty() {
            return Err(ConfigError::BlankRootName);
        }
        if self.remote_storage.enabled {
            self.remote_storage.validate()?;
        }
        Ok(())
    }

    /// Whether assets go to a remote bucket instead of local storage
    pub fn uses_remote_storage(&self) -> bool {
        self.remote_storage.enabled
    }
}

impl RemoteStorageConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::MissingBucket);
        }
        let region = self.region.trim();
        if region.is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        if !is_region_name(region) {
            return Err(ConfigError::InvalidRegion(region.to_string()));
        }
        Ok(())
    }
}

/// `us-east-1`, `ap-southeast-2`, `us-gov-west-1`: lowercase words joined by
/// dashes, ending in a number.
fn is_region_name(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    let Some((number, words)) = parts.split_last() else {
        return false;
    };
    words.len() >= 2
        && words
            .iter()
            .all(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_lowercase()))
        && !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
}
