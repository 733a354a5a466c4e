//! Duplicate-asset pre-scan
//!
//! Before uploading anything, the importer lists what the asset destination
//! already holds so files uploaded by an earlier run can be reused.

use ingot_core::{AssetLocation, AssetStorage};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// Map each file name already stored under `destination` to its stored path
///
/// Names and paths are percent-decoded. A listing failure (usually: the
/// destination does not exist yet) gives an empty map.
pub async fn scan_existing_assets(
    storage: &dyn AssetStorage,
    destination: &AssetLocation,
) -> HashMap<String, String> {
    let listing = match storage.list(destination).await {
        Ok(listing) => listing,
        Err(e) => {
            debug!(destination = %destination.path, error = %e, "No existing assets found");
            return HashMap::new();
        }
    };

    let existing: HashMap<String, String> = listing
        .iter()
        .map(|stored| {
            let path = decode(stored).into_owned();
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            (name, path)
        })
        .filter(|(name, _)| !name.is_empty())
        .collect();

    debug!(
        destination = %destination.path,
        count = existing.len(),
        "Scanned existing assets"
    );
    existing
}

fn decode(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}
