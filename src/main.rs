//! Route Docs - Command-line tool for building API documentation from a route table.
//!
//! Reads the routes a server has registered, merges them with hand-written
//! annotations and documentation fragments, and renders the result as HTML.
//!
//! # Usage
//!
//! ```bash
//! route-docs [OPTIONS] --routes <FILE>
//! ```
//!
//! # Examples
//!
//! Render documentation to a file:
//! ```bash
//! route-docs -r routes.yaml -a annotations.yaml -c docs.yaml -o api.html
//! ```
//!
//! Build once and serve it at `GET /docs`:
//! ```bash
//! route-docs -r routes.yaml -a annotations.yaml --serve --bind 0.0.0.0:8080
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! route-docs -r routes.yaml -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use route_docs::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Route Docs starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("API documentation build completed");

    Ok(())
}
