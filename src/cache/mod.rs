//! Persistent two-tier cache for toolchain queries
//!
//! Results live in memory for the life of a [`Cache`] and on disk across
//! runs. The disk layer is keyed by a validity token built from the
//! source-tree and toolchain hashes.
//!
//! # Invalidation
//!
//! - The token is checked when the cache is opened and before every disk read
//! - Any token mismatch deletes the whole cache root, not individual entries
//! - Memoized results are never evicted while the cache is alive
//!
//! # Disk Layout
//!
//! | File | Contents |
//! |------|----------|
//! | `.validity` | `<tree-hash> <toolchain-hash>` |
//! | `<id>.list` | Raw list query output |
//! | `<id>.build` | `<size> <funcs>` |
//! | `<id>.<random>.archive` | Scratch build artifact, one per measurement, removed after measuring |
//!
//! `<id>` is the identifier with path separators replaced by `%`.

pub mod facade;
pub mod memo;
pub mod store;
pub mod token;

pub use facade::Cache;
pub use memo::Memo;
pub use store::{encode_identifier, DiskStore, Validity};
pub use token::{ValidityToken, TOKEN_FILE};
