//! pkgcache - cached toolchain package queries
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pkgcache::cli::{commands, open_cache, Cli, Commands};
use pkgcache::config::{Config, ConfigManager};
use pkgcache::error::PkgCacheResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8, config: &Config) {
    // 0 = warn, 1 = info, 2 = debug, 3+ = trace
    let filter = match verbosity {
        0 => EnvFilter::new("pkgcache=warn"),
        1 => EnvFilter::new("pkgcache=info"),
        2 => EnvFilter::new("pkgcache=debug"),
        _ => EnvFilter::new("pkgcache=trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run() -> PkgCacheResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load()?;

    let verbosity = cli.verbose.max(config.general.verbose);
    init_logging(verbosity, &config);
    debug!("Loaded config from {}", manager.path().display());

    // Config command doesn't need the cache
    let open = || open_cache(&cli.overrides, &config, verbosity);

    match cli.command {
        Commands::Config(args) => commands::config(args, &manager, &config),
        Commands::List(args) => commands::list(args, &open()?),
        Commands::Size(args) => commands::size(args, &open()?),
        Commands::Write(args) => commands::write(args, &open()?),
        Commands::Status => commands::status(&open()?),
        Commands::Clear => commands::clear(&open()?),
    }
}
