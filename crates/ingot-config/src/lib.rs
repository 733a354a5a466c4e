//! # Ingot Configuration
//!
//! The settings of one import run. A run builds an [`ImportSettings`] once,
//! validates it, and hands the same immutable value to every stage.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ingot_config::ImportSettings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ImportSettings::load_from_file("ingot.toml").await?;
//!     settings.validate()?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

mod error;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{ImportSettings, RemoteStorageConfig};
