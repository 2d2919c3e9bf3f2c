//! Opening the cache from configuration and command-line overrides

use crate::cache::Cache;
use crate::cli::args::CacheOverrides;
use crate::config::Config;
use crate::error::{PkgCacheError, PkgCacheResult};
use crate::toolchain::{toolchain_fingerprint, tree_fingerprint, GoToolchain};
use std::env;
use tracing::debug;

/// Resolve hashes and cache root, then open the cache
///
/// Flags win over the config file; hashes neither flag nor config supplies
/// are detected from the source tree and the toolchain.
pub fn open_cache(
    overrides: &CacheOverrides,
    config: &Config,
    verbosity: u8,
) -> PkgCacheResult<Cache> {
    let go = GoToolchain::new(&config.toolchain.program, config.toolchain.workdir.clone());

    let tree_hash = match overrides
        .tree_hash
        .clone()
        .or_else(|| config.fingerprint.tree_hash.clone())
    {
        Some(hash) => hash,
        None => {
            let dir = match config.fingerprint.tree_dir {
                Some(ref dir) => dir.clone(),
                None => env::current_dir()
                    .map_err(|e| PkgCacheError::io("getting current directory", e))?,
            };
            tree_fingerprint(&dir)?
        }
    };

    let toolchain_hash = match overrides
        .toolchain_hash
        .clone()
        .or_else(|| config.fingerprint.toolchain_hash.clone())
    {
        Some(hash) => hash,
        None => toolchain_fingerprint(&go)?,
    };

    let root = overrides
        .cache_dir
        .clone()
        .unwrap_or_else(|| config.cache_dir());
    debug!(
        "Opening cache {} for {} {}",
        root.display(),
        tree_hash,
        toolchain_hash
    );

    Cache::with_toolchain(&tree_hash, &toolchain_hash, root, verbosity, Box::new(go))
}
