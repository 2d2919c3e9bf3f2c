//! Write command - seed or override a cache entry

use crate::cache::Cache;
use crate::cli::args::WriteArgs;
use crate::error::{PkgCacheError, PkgCacheResult};
use crate::query::EntryKind;
use console::style;
use std::fs;
use std::io::{self, Read};

/// Execute the write command
pub fn execute(args: WriteArgs, cache: &Cache) -> PkgCacheResult<()> {
    let content = match args.file {
        Some(ref path) if path.as_os_str() != "-" => fs::read(path)
            .map_err(|e| PkgCacheError::io(format!("reading {}", path.display()), e))?,
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| PkgCacheError::io("reading stdin", e))?;
            buf
        }
    };

    let kind = EntryKind::from(args.kind);
    cache.write_cache_entry(&args.identifier, kind, &content)?;

    println!(
        "{} Wrote {} entry for {} ({} bytes)",
        style("✓").green(),
        kind,
        args.identifier,
        content.len()
    );
    Ok(())
}
