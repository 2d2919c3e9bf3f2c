//! List command - show package metadata

use crate::cache::Cache;
use crate::cli::args::{OutputFormat, QueryArgs};
use crate::error::PkgCacheResult;
use crate::query::ListResult;
use console::style;
use std::sync::Arc;

/// Execute the list command
pub fn execute(args: QueryArgs, cache: &Cache) -> PkgCacheResult<()> {
    let pkgs = args
        .identifiers
        .iter()
        .map(|id| cache.list(id))
        .collect::<PkgCacheResult<Vec<_>>>()?;

    match args.format {
        OutputFormat::Table => print_table(&pkgs),
        OutputFormat::Json => print_json(&pkgs)?,
        OutputFormat::Plain => print_plain(&pkgs),
    }

    Ok(())
}

fn print_table(pkgs: &[Arc<ListResult>]) {
    println!(
        "{:<40} {:<10} {:<8} {:<30}",
        style("IMPORT PATH").bold(),
        style("STANDARD").bold(),
        style("IMPORTS").bold(),
        style("ROOT").bold()
    );
    println!("{}", "-".repeat(90));

    for pkg in pkgs {
        let standard = if pkg.standard {
            style("yes").green()
        } else {
            style("no").dim()
        };

        println!(
            "{:<40} {:<10} {:<8} {:<30}",
            pkg.import_path,
            standard,
            pkg.imports.len(),
            pkg.root
        );
    }
}

fn print_json(pkgs: &[Arc<ListResult>]) -> PkgCacheResult<()> {
    let pkgs: Vec<&ListResult> = pkgs.iter().map(|p| p.as_ref()).collect();
    println!("{}", serde_json::to_string_pretty(&pkgs)?);
    Ok(())
}

fn print_plain(pkgs: &[Arc<ListResult>]) {
    for pkg in pkgs {
        if pkg.imports.is_empty() {
            println!("{}", pkg.import_path);
        } else {
            println!("{} {}", pkg.import_path, pkg.imports.join(" "));
        }
    }
}
