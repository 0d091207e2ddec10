// src/lib.rs
// =============================================================================
// domain-atlas: crawl the web from a seed URL and record which registrable
// domains link to which.
//
// The pieces, leaves first:
// - domain: URL -> registrable domain ("a.b.example.co.uk" -> "example.co.uk")
// - graph: concurrent directed graph of domains, its text dump, BFS paths
// - crawl: fetch -> extract -> normalize -> record -> fan out
// - config: crawl settings
// - error: typed errors for all of the above
//
// Quick start:
//
//   let crawler = Crawler::new(CrawlConfig::default().with_max_depth(2))?;
//   let report = crawler.crawl("https://example.com").await?;
//   let path = shortest_path(&report.graph, &report.root, "rust-lang.org");
// =============================================================================

pub mod config;
pub mod crawl;
pub mod domain;
pub mod error;
pub mod graph;

pub use config::CrawlConfig;
pub use crawl::{CrawlReport, Crawler, Fetcher, HttpFetcher};
pub use domain::{extract_origin, normalize};
pub use error::{CrawlError, DumpError, FetchError, NormalizeError, PathError};
pub use graph::{shortest_path, Digraph, DomainPath, Vertex};
