//! CLI argument definitions using clap derive

use crate::query::EntryKind;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pkgcache - cached package queries
///
/// Answers package list and package size queries from a persistent cache,
/// running the toolchain only on a miss.
#[derive(Parser, Debug)]
#[command(name = "pkgcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PKGCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache location and validity overrides
    #[command(flatten)]
    pub overrides: CacheOverrides,
}

/// Flags that take precedence over the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct CacheOverrides {
    /// Cache root directory
    #[arg(long, global = true, env = "PKGCACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Source tree hash (skips git detection)
    #[arg(long, global = true)]
    pub tree_hash: Option<String>,

    /// Toolchain hash (skips toolchain detection)
    #[arg(long, global = true)]
    pub toolchain_hash: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show package metadata
    List(QueryArgs),

    /// Show built package size and function count
    Size(QueryArgs),

    /// Seed or override a cache entry
    Write(WriteArgs),

    /// Show cache location, token and entry count
    Status,

    /// Delete every cached entry
    Clear,

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the list and size commands
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Package identifiers to query
    #[arg(required = true)]
    pub identifiers: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the write command
#[derive(Parser, Debug)]
pub struct WriteArgs {
    /// Package identifier
    pub identifier: String,

    /// Entry kind
    pub kind: KindArg,

    /// File holding the entry content (stdin when omitted or "-")
    pub file: Option<PathBuf>,
}

/// Entry kind accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Package metadata (raw list output)
    List,
    /// Size payload ("<size> <funcs>")
    Build,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::List => EntryKind::List,
            KindArg::Build => EntryKind::Build,
        }
    }
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., toolchain.program)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for query commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
