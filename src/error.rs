//! Error types for pkgcache
//!
//! All modules use `PkgCacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pkgcache operations
pub type PkgCacheResult<T> = Result<T, PkgCacheError>;

/// All errors that can occur in pkgcache
#[derive(Error, Debug)]
pub enum PkgCacheError {
    // Cache construction errors
    #[error("Unable to create cache {path}: {source}")]
    CacheCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Validity token errors
    #[error("Problems reading cache token {path}: {source}")]
    TokenRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rebuild cache {path}: {source}")]
    CacheReset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid hash {0:?}: hashes must be non-empty and contain no whitespace")]
    InvalidToken(String),

    // Disk entry errors
    #[error("Problems reading cache entry {path}: {source}")]
    EntryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache entry {path}: {source}")]
    EntryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode {kind} result for {identifier}: {reason}")]
    Decode {
        identifier: String,
        kind: String,
        reason: String,
    },

    // Toolchain errors
    #[error("Package list failed for {identifier}: {reason}")]
    ListFailed { identifier: String, reason: String },

    #[error("Build failed for {identifier}: {output}")]
    BuildFailed { identifier: String, output: String },

    #[error("Symbol inspection failed for {artifact}: {reason}")]
    InspectFailed { artifact: PathBuf, reason: String },

    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    #[error("Required tool not found: {name}. {hint}")]
    ToolNotFound { name: String, hint: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl PkgCacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a decode error for a stored or freshly fetched payload
    pub fn decode(
        identifier: impl Into<String>,
        kind: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Decode {
            identifier: identifier.into(),
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Check if error is retryable
    ///
    /// Toolchain failures leave nothing cached, so repeating the query runs
    /// the toolchain again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ListFailed { .. }
                | Self::BuildFailed { .. }
                | Self::InspectFailed { .. }
                | Self::CommandFailed { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolNotFound { .. } => {
                Some("Install the toolchain or set toolchain.program in the config")
            }
            Self::Decode { .. } => Some("The cache entry is corrupt. Run: pkgcache clear"),
            Self::ConfigInvalid { .. } => {
                Some("Check the file or run: pkgcache config init --force")
            }
            Self::InvalidToken(_) => {
                Some("Pass hashes without spaces via --tree-hash/--toolchain-hash")
            }
            _ => None,
        }
    }
}
