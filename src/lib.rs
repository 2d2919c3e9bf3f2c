//! pkgcache - cached toolchain package queries
//!
//! Memoizes package list and package size queries in memory and on disk,
//! invalidating the disk cache whenever the source tree or toolchain changes.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod toolchain;

pub use cache::Cache;
pub use error::{PkgCacheError, PkgCacheResult};
pub use query::{EntryKind, ListResult, SizeResult};
pub use toolchain::{GoToolchain, Toolchain};
