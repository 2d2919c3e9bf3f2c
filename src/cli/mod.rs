//! Command-line interface

pub mod args;
pub mod commands;
pub mod context;

pub use args::{CacheOverrides, Cli, Commands};
pub use context::open_cache;
