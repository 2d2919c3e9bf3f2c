//! Two-tier cache for toolchain queries
//!
//! Lookups go memory, then disk (after a validity check), then toolchain.
//! A toolchain answer is written to disk and memoized before it is returned;
//! a failed toolchain call caches nothing.

use crate::cache::memo::Memo;
use crate::cache::store::{DiskStore, Validity};
use crate::cache::token::ValidityToken;
use crate::error::{PkgCacheError, PkgCacheResult};
use crate::query::{EntryKind, ListResult, SizeResult, UNMEASURED_IDENTIFIER, UNMEASURED_SIZE};
use crate::toolchain::{count_functions, GoToolchain, Toolchain};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Verbosity at which cache rebuilds, writes and builds are logged
const VERBOSE_DEBUG: u8 = 2;

/// Verbosity at which individual hits and misses are logged
const VERBOSE_TRACE: u8 = 3;

/// Memoizing cache in front of a [`Toolchain`]
///
/// Safe to share between threads. Two threads missing on the same
/// identifier may both run the toolchain; they produce the same answer and
/// the last write wins.
pub struct Cache {
    list_memo: Memo<Arc<ListResult>>,
    size_memo: Memo<SizeResult>,
    store: DiskStore,
    token: ValidityToken,
    toolchain: Box<dyn Toolchain>,
    verbosity: u8,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("list_memo", &self.list_memo)
            .field("size_memo", &self.size_memo)
            .field("store", &self.store)
            .field("token", &self.token)
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Open a cache at `root` backed by the default Go toolchain
    pub fn make(
        tree_hash: &str,
        toolchain_hash: &str,
        root: impl Into<PathBuf>,
        verbosity: u8,
    ) -> PkgCacheResult<Self> {
        Self::with_toolchain(
            tree_hash,
            toolchain_hash,
            root,
            verbosity,
            Box::new(GoToolchain::default()),
        )
    }

    /// Open a cache at `root` backed by `toolchain`
    ///
    /// Creates the root if needed and wipes it if it was populated under
    /// different hashes.
    pub fn with_toolchain(
        tree_hash: &str,
        toolchain_hash: &str,
        root: impl Into<PathBuf>,
        verbosity: u8,
        toolchain: Box<dyn Toolchain>,
    ) -> PkgCacheResult<Self> {
        let token = ValidityToken::new(tree_hash, toolchain_hash)?;
        let store = DiskStore::open(root)?;

        let cache = Self {
            list_memo: Memo::new(),
            size_memo: Memo::new(),
            store,
            token,
            toolchain,
            verbosity,
        };
        cache.check_valid()?;
        Ok(cache)
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// Token this cache was opened with
    pub fn token(&self) -> &ValidityToken {
        &self.token
    }

    /// Underlying disk store
    pub fn store(&self) -> &DiskStore {
        &self.store
    }

    /// Name of the toolchain answering misses
    pub fn toolchain_name(&self) -> &'static str {
        self.toolchain.name()
    }

    fn chatty(&self, level: u8) -> bool {
        self.verbosity >= level
    }

    fn check_valid(&self) -> PkgCacheResult<()> {
        if let Validity::Rebuilt { found } = self.store.ensure_valid(&self.token)? {
            if self.chatty(VERBOSE_DEBUG) {
                debug!(
                    "Cache mismatch in {}: got {:?}, want {:?}",
                    self.store.root().display(),
                    found,
                    self.token.to_string()
                );
            }
        }
        Ok(())
    }

    /// Validate the store, then read an entry
    fn try_cache(&self, identifier: &str, kind: EntryKind) -> PkgCacheResult<Option<Vec<u8>>> {
        self.check_valid()?;

        let contents = self.store.read_entry(identifier, kind)?;
        if self.chatty(VERBOSE_TRACE) {
            let outcome = if contents.is_some() { "hit" } else { "miss" };
            trace!("{} cache {} on {}", kind, outcome, identifier);
        }
        Ok(contents)
    }

    /// Create or replace the disk entry for an identifier
    ///
    /// Later queries for the identifier decode `content` instead of running
    /// the toolchain, unless the result is already memoized in this process.
    pub fn write_cache_entry(
        &self,
        identifier: &str,
        kind: EntryKind,
        content: &[u8],
    ) -> PkgCacheResult<()> {
        if self.chatty(VERBOSE_DEBUG) {
            debug!("{} cache write for {}", kind, identifier);
        }
        self.store.write_entry(identifier, kind, content)
    }

    /// Delete every disk entry regardless of the stored token
    pub fn clear(&self) -> PkgCacheResult<()> {
        if self.chatty(VERBOSE_DEBUG) {
            debug!("Clearing cache {}", self.store.root().display());
        }
        self.store.reset(&self.token)
    }

    /// Package metadata for `identifier`
    pub fn list(&self, identifier: &str) -> PkgCacheResult<Arc<ListResult>> {
        if let Some(pkg) = self.list_memo.get(identifier) {
            return Ok(pkg);
        }

        let pkg = match self.try_cache(identifier, EntryKind::List)? {
            Some(payload) => decode_list(identifier, &payload)?,
            None => {
                let payload = self.toolchain.list(identifier)?;
                let pkg = decode_list(identifier, &payload)?;
                self.write_cache_entry(identifier, EntryKind::List, &payload)?;
                pkg
            }
        };

        let pkg = Arc::new(pkg);
        self.list_memo.insert(identifier, Arc::clone(&pkg));
        Ok(pkg)
    }

    /// Approximate built size and function count for `identifier`
    pub fn size(&self, identifier: &str) -> PkgCacheResult<SizeResult> {
        if identifier == UNMEASURED_IDENTIFIER {
            return Ok(UNMEASURED_SIZE);
        }

        if let Some(info) = self.size_memo.get(identifier) {
            return Ok(info);
        }

        let info = match self.try_cache(identifier, EntryKind::Build)? {
            Some(payload) => decode_size(identifier, &payload)?,
            None => {
                let info = self.measure(identifier)?;
                self.write_cache_entry(identifier, EntryKind::Build, &info.encode())?;
                info
            }
        };

        self.size_memo.insert(identifier, info);
        Ok(info)
    }

    /// Build `identifier` into a scratch artifact and measure it
    ///
    /// The artifact is removed afterwards whether or not measuring succeeded.
    fn measure(&self, identifier: &str) -> PkgCacheResult<SizeResult> {
        let artifact = self.store.scratch_artifact(identifier)?;
        let path = artifact.to_path_buf();
        let result = self.measure_artifact(identifier, &path);

        match artifact.close() {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
        result
    }

    fn measure_artifact(&self, identifier: &str, artifact: &Path) -> PkgCacheResult<SizeResult> {
        if self.chatty(VERBOSE_DEBUG) {
            debug!(
                "Building {} into {} with {}",
                identifier,
                artifact.display(),
                self.toolchain.name()
            );
        }
        if let Err(e) = self.toolchain.build(identifier, artifact) {
            warn!("Failed build of {}: {}", identifier, e);
            return Err(e);
        }

        let size = fs::metadata(artifact)
            .map_err(|e| PkgCacheError::io(format!("stat on {}", artifact.display()), e))?
            .len();
        let symbols = self.toolchain.symbols(artifact)?;

        Ok(SizeResult {
            size,
            num_funcs: count_functions(&symbols),
        })
    }
}

fn decode_list(identifier: &str, payload: &[u8]) -> PkgCacheResult<ListResult> {
    ListResult::decode(payload)
        .map_err(|reason| PkgCacheError::decode(identifier, EntryKind::List.extension(), reason))
}

fn decode_size(identifier: &str, payload: &[u8]) -> PkgCacheResult<SizeResult> {
    SizeResult::decode(payload)
        .map_err(|reason| PkgCacheError::decode(identifier, EntryKind::Build.extension(), reason))
}
