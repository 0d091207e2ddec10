// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = destination not reachable, 2 = error)
//
// Results go to stdout, progress and diagnostics to stderr, so the output of
// `domain-atlas path ... --json` can be piped straight into other tools.
// =============================================================================

mod cli;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, CrawlArgs};
use domain_atlas::{shortest_path, CrawlConfig, Crawler, Digraph, PathError};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl(args) => handle_crawl(args).await,
        Commands::Path { dump, from, to, json } => handle_path(&dump, &from, &to, json),
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    let config = CrawlConfig::default()
        .with_max_depth(args.max_depth)
        .with_fetch_timeout(Duration::from_secs(args.timeout_secs))
        .with_max_concurrency(args.max_concurrency);

    let crawler = Crawler::new(config).context("Failed to set up crawler")?;
    let report = crawler
        .crawl(&args.seed_url)
        .await
        .with_context(|| format!("Could not crawl from '{}'", args.seed_url))?;

    println!("🕸️  {}", report.graph);
    println!(
        "📄 Fetched {} page(s), {} failed, in {:.1?}",
        report.pages_fetched, report.fetch_failures, report.duration
    );

    report
        .graph
        .write_dump(&args.output)
        .context("Failed to write adjacency dump")?;
    println!("💾 Dump appended to {}", args.output.display());

    match (args.from, args.to) {
        (Some(from), Some(to)) => print_path(&report.graph, &from, &to, args.json),
        _ => Ok(0),
    }
}

// Handles the 'path' subcommand
fn handle_path(dump: &Path, from: &str, to: &str, json: bool) -> Result<i32> {
    let graph = Digraph::load_dump(dump).context("Failed to load adjacency dump")?;
    print_path(&graph, from, to, json)
}

// Runs the query and prints the outcome
//
// Not being able to reach the destination is an answer, not an error, so it
// is reported on stdout and mapped to exit code 1.
fn print_path(graph: &Digraph, from: &str, to: &str, json: bool) -> Result<i32> {
    match shortest_path(graph, from, to) {
        Ok(path) => {
            if json {
                println!("{}", serde_json::to_string(&path)?);
            } else {
                println!("{} ({} hop(s))", path, path.hops());
            }
            Ok(0)
        }
        Err(e @ PathError::NotReachable { .. }) => {
            if json {
                println!("null");
            } else {
                println!("❌ {}", e);
            }
            Ok(1)
        }
        Err(e @ PathError::UnknownSource(_)) => Err(e.into()),
    }
}
