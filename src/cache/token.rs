//! Validity token for the disk cache
//!
//! The token records the source-tree hash and toolchain hash a cache
//! directory was populated under. Any mismatch invalidates the whole store.

use crate::error::{PkgCacheError, PkgCacheResult};
use std::fmt;

/// Reserved file name holding the token inside the cache root
pub const TOKEN_FILE: &str = ".validity";

/// Pair of environment hashes gating whether the disk cache is trusted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityToken {
    tree_hash: String,
    toolchain_hash: String,
}

impl ValidityToken {
    /// Create a token, rejecting hashes that would not survive the file format
    pub fn new(
        tree_hash: impl Into<String>,
        toolchain_hash: impl Into<String>,
    ) -> PkgCacheResult<Self> {
        let tree_hash = tree_hash.into();
        let toolchain_hash = toolchain_hash.into();

        for hash in [&tree_hash, &toolchain_hash] {
            if hash.is_empty() || hash.chars().any(char::is_whitespace) {
                return Err(PkgCacheError::InvalidToken(hash.clone()));
            }
        }

        Ok(Self {
            tree_hash,
            toolchain_hash,
        })
    }

    /// Source-tree identity
    pub fn tree_hash(&self) -> &str {
        &self.tree_hash
    }

    /// Toolchain identity
    pub fn toolchain_hash(&self) -> &str {
        &self.toolchain_hash
    }

    /// Check stored token content against this token
    ///
    /// Surrounding whitespace in the stored content is ignored.
    pub fn matches(&self, stored: &str) -> bool {
        stored.trim() == self.to_string()
    }

    /// File content written for this token
    pub fn file_contents(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for ValidityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tree_hash, self.toolchain_hash)
    }
}
