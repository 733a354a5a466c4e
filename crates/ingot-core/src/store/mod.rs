//! Destination store abstractions
//!
//! - [`ContainerStore`] / [`DocumentStore`] - folder, entry and page records
//! - [`AssetStorage`] - binary uploads and directory listings
//! - [`PageFormatter`] - optional conversion applied to finished pages
//! - [`MemoryStore`] - in-memory implementation of both record stores

pub mod error;
pub mod memory;
pub mod records;
pub mod traits;

pub use error::{AssetError, AssetResult, StoreError, StoreResult};
pub use memory::{MemoryStore, StoreSnapshot};
pub use records::{
    Container, Entry, EntryUpdate, NewContainer, NewEntry, NewPage, Page, PageRef, PageUpdate,
};
pub use traits::{
    AssetLocation, AssetStorage, ContainerStore, DocumentStore, PageFormatter, StorageSource,
};
