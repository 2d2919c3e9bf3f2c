//! Status command - show cache location, token and entry count

use crate::cache::Cache;
use crate::error::PkgCacheResult;
use console::style;

/// Execute the status command
pub fn execute(cache: &Cache) -> PkgCacheResult<()> {
    let entries = cache.store().entry_count()?;

    println!("{}", style("Cache Status").bold());
    println!();
    print_row("Root", &cache.root().display().to_string());
    print_row("Tree hash", cache.token().tree_hash());
    print_row("Toolchain hash", cache.token().toolchain_hash());
    print_row("Toolchain", cache.toolchain_name());
    print_row("Entries", &entries.to_string());

    Ok(())
}

fn print_row(key: &str, value: &str) {
    println!("  {:<16} {}", style(format!("{}:", key)).dim(), value);
}
