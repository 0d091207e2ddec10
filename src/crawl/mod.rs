// src/crawl/mod.rs
// =============================================================================
// This module turns a seed URL into a graph of linked domains.
//
// Submodules:
// - fetch: the Fetcher trait and the reqwest-backed HttpFetcher
// - html: pulls raw href values out of a page
// - queue: the crawl driver and the per-domain task
//
// Features:
// - One task per newly discovered domain, crawled concurrently
// - Depth limit measured in domain hops from the seed
// - Optional cap on tasks in flight (unbounded fan-out when off)
// - Best effort: failed fetches and odd links just shrink the result
// =============================================================================

mod fetch;
mod html;
mod queue;

pub use fetch::{Fetcher, HttpFetcher};
pub use html::extract_hrefs;
pub use queue::{CrawlReport, Crawler};
