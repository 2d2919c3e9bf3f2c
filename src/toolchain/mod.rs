//! Toolchain collaborators consulted on a cache miss
//!
//! The cache never runs commands itself; it asks a [`Toolchain`] to list a
//! package, build it, or dump the symbol table of the built artifact.

pub mod fingerprint;
pub mod go;

pub use fingerprint::{toolchain_fingerprint, tree_fingerprint};
pub use go::GoToolchain;

use crate::error::PkgCacheResult;
use std::path::Path;

/// Abstract toolchain interface
///
/// Implementations must be deterministic for a given source tree and
/// toolchain: the cache stores the first answer and replays it.
pub trait Toolchain: Send + Sync {
    /// Return the raw serialized metadata for a package
    fn list(&self, identifier: &str) -> PkgCacheResult<Vec<u8>>;

    /// Build a package into `output`
    fn build(&self, identifier: &str, output: &Path) -> PkgCacheResult<()>;

    /// Return the symbol table of a built artifact as text
    fn symbols(&self, artifact: &Path) -> PkgCacheResult<String>;

    /// Human-readable toolchain name for display
    fn name(&self) -> &'static str;
}

/// Estimate the number of functions from symbol-table text
///
/// A line counts when it has three fields with a `T` marker in the middle,
/// or four fields with a `T` marker in third position.
pub fn count_functions(symbols: &str) -> u64 {
    symbols
        .lines()
        .filter(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            matches!(fields.as_slice(), [_, "T", _] | [_, _, "T", _])
        })
        .count() as u64
}
