//! Clear command - delete every cached entry

use crate::cache::Cache;
use crate::error::PkgCacheResult;
use console::style;

/// Execute the clear command
pub fn execute(cache: &Cache) -> PkgCacheResult<()> {
    let removed = cache.store().entry_count()?;
    cache.clear()?;

    println!(
        "{} Cleared {} entr{} from {}",
        style("✓").green(),
        removed,
        if removed == 1 { "y" } else { "ies" },
        cache.root().display()
    );
    Ok(())
}
