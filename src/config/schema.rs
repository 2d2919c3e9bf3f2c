//! Configuration schema for pkgcache
//!
//! Configuration is stored at `~/.config/pkgcache/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache location
    pub cache: CacheConfig,

    /// Toolchain used on cache misses
    pub toolchain: ToolchainConfig,

    /// Validity token inputs
    pub fingerprint: FingerprintConfig,
}

impl Config {
    /// Effective cache root directory
    pub fn cache_dir(&self) -> PathBuf {
        self.cache.dir.clone().unwrap_or_else(default_cache_dir)
    }
}

/// Default cache root under the platform cache directory
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pkgcache")
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Verbosity level (0 = quiet, 3 = every hit and miss)
    pub verbose: u8,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            log_format: "text".to_string(),
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root directory (default: platform cache dir)
    pub dir: Option<PathBuf>,
}

/// Toolchain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain program
    pub program: String,

    /// Directory toolchain commands run in (default: current directory)
    pub workdir: Option<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: "go".to_string(),
            workdir: None,
        }
    }
}

/// Fingerprint settings
///
/// Explicit hashes skip the corresponding detection command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Source tree whose revision forms the tree hash (default: current directory)
    pub tree_dir: Option<PathBuf>,

    /// Fixed tree hash
    pub tree_hash: Option<String>,

    /// Fixed toolchain hash
    pub toolchain_hash: Option<String>,
}
