//! The `ingot` command-line tool
//!
//! Imports a vault directory into a file-backed [`MemoryStore`], with
//! attachments copied into local asset storage.
//!
//! [`MemoryStore`]: ingot_core::MemoryStore

pub mod cli;
pub mod commands;
pub mod local_assets;
pub mod vault_scan;
