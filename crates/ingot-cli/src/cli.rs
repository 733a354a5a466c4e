use clap::{Args, Parser, Subcommand, ValueEnum};
use ingot_config::ImportSettings;
use ingot_core::Namespace;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Per-stage progress
    Info,
    /// Per-item details (default for verbose)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ingot")]
#[command(about = "ingot - import Obsidian-style vaults into a document store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, defaults to 'warn'. RUST_LOG takes precedence.
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (TOML), command-line flags override its values
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Level used when RUST_LOG is not set
    pub fn level(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a vault directory
    Import(ImportArgs),

    /// Print the identity derived for a path
    Id {
        /// Identity namespace (folder, journal, page)
        namespace: Namespace,

        /// Path below the vault root, e.g. "People/Alice.md"
        path: String,

        /// Sub-page name (page namespace only)
        #[arg(long)]
        sub_page: Option<String>,
    },

    /// Print the effective settings as TOML
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Vault directory
    pub vault: PathBuf,

    /// Output directory holding store.json and uploaded assets
    #[arg(short, long)]
    pub out: PathBuf,

    /// Name of the top-level container
    #[arg(long)]
    pub root_name: Option<String>,

    /// Merge the notes of each folder into one entry
    #[arg(long)]
    pub combine: bool,

    /// Only merge folders without sub-folders
    #[arg(long)]
    pub combine_leaves_only: bool,

    /// Upload attachments alongside notes
    #[arg(long)]
    pub import_assets: bool,

    /// Rewrite pages that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Reuse attachments already present in the output
    #[arg(long)]
    pub skip_duplicate_assets: bool,

    /// Make notes without visibility frontmatter public
    #[arg(long)]
    pub public: bool,

    /// Drop `> [!private]` callout blocks
    #[arg(long)]
    pub strip_annotations: bool,

    /// Write an Index entry linking every note
    #[arg(long)]
    pub index: bool,

    /// Do not append References sections
    #[arg(long)]
    pub no_backlinks: bool,
}

impl ImportArgs {
    /// Apply the flags given on the command line on top of `settings`
    pub fn apply_to(&self, settings: &mut ImportSettings) {
        settings.vault_path = Some(self.vault.clone());
        if let Some(name) = &self.root_name {
            settings.root_name = name.clone();
        }
        settings.combine_notes |= self.combine || self.combine_leaves_only;
        settings.combine_leaves_only |= self.combine_leaves_only;
        settings.import_non_markdown |= self.import_assets;
        settings.overwrite |= self.overwrite;
        settings.skip_duplicate_assets |= self.skip_duplicate_assets;
        settings.default_public |= self.public;
        settings.strip_annotations |= self.strip_annotations;
        settings.create_index |= self.index;
        if self.no_backlinks {
            settings.create_backlinks = false;
        }
    }
}
