use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Root container name must not be blank")]
    BlankRootName,

    #[error("Remote storage is enabled but no bucket is set")]
    MissingBucket,

    #[error("Remote storage is enabled but no region is set")]
    MissingRegion,

    #[error("Invalid remote storage region '{0}' (expected something like 'us-east-1')")]
    InvalidRegion(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
