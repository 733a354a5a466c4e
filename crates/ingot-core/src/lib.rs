//! Ingot Core
//!
//! Domain types shared by every stage of a vault import:
//! - [`identity`] - deterministic record ids
//! - [`vault`] - vault files and the items built from them
//! - [`tree`] - the folder tree built from a flat file list
//! - [`store`] - traits for the destination store and asset storage
//!
//! Orchestration lives in `ingot-pipeline`; this crate only defines what the
//! pipeline works on and what it talks to.

pub mod identity;
pub mod store;
pub mod tree;
pub mod vault;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use identity::{identity, page_identity, Namespace, IDENTITY_LEN};
pub use store::{
    AssetError, AssetLocation, AssetStorage, ContainerStore, DocumentStore, MemoryStore,
    PageFormatter, PageRef, StorageSource, StoreError, StoreResult,
};
pub use tree::{build_tree, FolderNode};
pub use vault::{
    FileSource, ItemMeta, MarkdownItem, OtherItem, ResolvedDocument, VaultFile, VaultItem,
};
