// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: build the domain graph from a seed URL, dump it, optionally
//   answer one shortest-path query on the fresh graph
// - path: answer a shortest-path query against a dump from an earlier crawl
//
// Crawl settings can also come from DOMAIN_ATLAS_* environment variables;
// a flag on the command line always wins.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "domain-atlas",
    version,
    about = "Crawl the web and map which domains link to which",
    long_about = "domain-atlas crawls outwards from a seed URL, collapses every link to its \
                  registrable domain, and records a directed graph of domain-to-domain links. \
                  The graph is written as a text dump and can be queried for shortest paths."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a seed URL and write the domain graph
    ///
    /// Example: domain-atlas crawl https://example.com --max-depth 2 --from example.com --to iana.org
    Crawl(CrawlArgs),

    /// Find the shortest path between two domains in a saved dump
    ///
    /// Example: domain-atlas path graph.txt example.com iana.org
    Path {
        /// Dump file written by an earlier crawl
        dump: PathBuf,

        /// Domain to start from
        from: String,

        /// Domain to reach
        to: String,

        /// Print the path as a JSON array instead of "a -> b -> c"
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Absolute http(s) URL to start from
    pub seed_url: String,

    /// Depth at which crawling stops (the seed is depth 0)
    ///
    /// Depth 1 = only the seed page is fetched
    /// Depth 2 = the seed plus every domain it links to
    #[arg(long, env = "DOMAIN_ATLAS_MAX_DEPTH", default_value_t = 5)]
    pub max_depth: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "DOMAIN_ATLAS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Crawl tasks in flight at once (0 = no limit)
    #[arg(long, env = "DOMAIN_ATLAS_MAX_CONCURRENCY", default_value_t = 64)]
    pub max_concurrency: usize,

    /// File the adjacency dump is appended to
    #[arg(long, short, default_value = "graph.txt")]
    pub output: PathBuf,

    /// Source domain of a shortest-path query to run after the crawl
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Destination domain of the query
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Print the path as a JSON array
    #[arg(long)]
    pub json: bool,
}
