//! Size command - show built package size and function count

use crate::cache::Cache;
use crate::cli::args::{OutputFormat, QueryArgs};
use crate::error::PkgCacheResult;
use crate::query::SizeResult;
use console::style;
use serde::Serialize;

/// Format bytes as human-readable size (e.g., "1.5 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[derive(Serialize)]
struct SizeRow<'a> {
    identifier: &'a str,
    #[serde(flatten)]
    info: SizeResult,
}

/// Execute the size command
pub fn execute(args: QueryArgs, cache: &Cache) -> PkgCacheResult<()> {
    let mut rows = Vec::with_capacity(args.identifiers.len());
    for id in &args.identifiers {
        rows.push(SizeRow {
            identifier: id,
            info: cache.size(id)?,
        });
    }

    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => {
            for row in &rows {
                println!("{} {} {}", row.identifier, row.info.size, row.info.num_funcs);
            }
        }
    }

    Ok(())
}

fn print_table(rows: &[SizeRow<'_>]) {
    println!(
        "{:<40} {:>12} {:>8}",
        style("PACKAGE").bold(),
        style("SIZE").bold(),
        style("FUNCS").bold()
    );
    println!("{}", "-".repeat(62));

    for row in rows {
        println!(
            "{:<40} {:>12} {:>8}",
            row.identifier,
            format_bytes(row.info.size),
            row.info.num_funcs
        );
    }

    let total: u64 = rows.iter().map(|r| r.info.size).sum();
    println!();
    println!("Total: {}", format_bytes(total));
}
