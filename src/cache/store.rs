//! On-disk entry store
//!
//! One file per (identifier, kind) pair inside the cache root, plus the
//! validity token file. Entry writes go through a temporary file in the root
//! and are renamed into place, so readers never observe a partial entry.

use crate::cache::token::{ValidityToken, TOKEN_FILE};
use crate::error::{PkgCacheError, PkgCacheResult};
use crate::query::EntryKind;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile, TempPath};

/// Suffix of the scratch artifacts built while measuring a package
const SCRATCH_SUFFIX: &str = ".archive";

/// Character substituted for path separators in entry file names
const SEPARATOR_SUBSTITUTE: &str = "%";

/// Outcome of a validity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// Stored token matched; existing entries are trusted
    Trusted,
    /// Stored token differed; the store was wiped and the token rewritten
    Rebuilt {
        /// Token content found on disk (empty when absent)
        found: String,
    },
}

/// Map an identifier to the stem of its entry file names
pub fn encode_identifier(identifier: &str) -> String {
    identifier.replace(['/', '\\'], SEPARATOR_SUBSTITUTE)
}

/// Cache root directory and the files inside it
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Open a store, creating the root directory if it does not exist
    pub fn open(root: impl Into<PathBuf>) -> PkgCacheResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| PkgCacheError::CacheCreate {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// Cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the validity token file
    pub fn token_path(&self) -> PathBuf {
        self.root.join(TOKEN_FILE)
    }

    /// Path of the entry for an identifier and kind
    pub fn entry_path(&self, identifier: &str, kind: EntryKind) -> PathBuf {
        let name = format!("{}.{}", encode_identifier(identifier), kind.extension());
        self.root.join(name)
    }

    /// Reserve a fresh file for building a package before it is measured
    ///
    /// Every call gets its own `<id>.<random>.archive` file, so concurrent
    /// measurements of one identifier never share an artifact. The file is
    /// deleted when the returned path is dropped or closed.
    pub fn scratch_artifact(&self, identifier: &str) -> PkgCacheResult<TempPath> {
        let prefix = format!("{}.", encode_identifier(identifier));
        let file = Builder::new()
            .prefix(&prefix)
            .suffix(SCRATCH_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(|e| {
                PkgCacheError::io(
                    format!("creating scratch artifact in {}", self.root.display()),
                    e,
                )
            })?;
        Ok(file.into_temp_path())
    }

    /// Read the stored token, treating a missing file as empty
    pub fn read_token(&self) -> PkgCacheResult<String> {
        let path = self.token_path();
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(PkgCacheError::TokenRead { path, source: e }),
        }
    }

    /// Compare the stored token with `token`, wiping the store on mismatch
    pub fn ensure_valid(&self, token: &ValidityToken) -> PkgCacheResult<Validity> {
        let found = self.read_token()?;
        if token.matches(&found) {
            return Ok(Validity::Trusted);
        }

        self.reset(token)?;
        Ok(Validity::Rebuilt {
            found: found.trim().to_string(),
        })
    }

    /// Delete every entry and start over with `token`
    pub fn reset(&self, token: &ValidityToken) -> PkgCacheResult<()> {
        let reset_err = |source| PkgCacheError::CacheReset {
            path: self.root.clone(),
            source,
        };

        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(reset_err(e)),
        }
        fs::create_dir_all(&self.root).map_err(reset_err)?;
        fs::write(self.token_path(), token.file_contents()).map_err(reset_err)?;
        Ok(())
    }

    /// Read an entry; `None` when it has never been written
    pub fn read_entry(
        &self,
        identifier: &str,
        kind: EntryKind,
    ) -> PkgCacheResult<Option<Vec<u8>>> {
        let path = self.entry_path(identifier, kind);
        match fs::read(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PkgCacheError::EntryRead { path, source: e }),
        }
    }

    /// Create or replace an entry
    pub fn write_entry(
        &self,
        identifier: &str,
        kind: EntryKind,
        content: &[u8],
    ) -> PkgCacheResult<()> {
        let path = self.entry_path(identifier, kind);
        let write_err = |source| PkgCacheError::EntryWrite {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(write_err)?;
        tmp.write_all(content).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    /// Number of entry files currently stored
    pub fn entry_count(&self) -> PkgCacheResult<usize> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            PkgCacheError::io(
                format!("reading cache directory {}", self.root.display()),
                e,
            )
        })?;

        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| PkgCacheError::io("reading cache entry", e))?;
            let path = entry.path();
            let is_entry = path.extension().is_some_and(|ext| {
                EntryKind::all()
                    .iter()
                    .any(|kind| ext == kind.extension())
            });
            if is_entry {
                count += 1;
            }
        }
        Ok(count)
    }
}
