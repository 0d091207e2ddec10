// src/error.rs
// =============================================================================
// Error types for the library side of domain-atlas.
//
// Every failure here is local to one URL, one fetch or one query. The crawler
// swallows NormalizeError and FetchError (the offending link or branch is
// simply dropped); only an unusable seed URL stops a crawl before it starts.
//
// The binary wraps these with anyhow for context, the library keeps them typed
// so callers can match on them.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

// Why a URL could not be reduced to a registrable domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The string is not an absolute URL (relative, scheme-less, garbage)
    #[error("could not parse URL '{url}': {reason}")]
    Parse { url: String, reason: String },

    /// Scheme is something other than http or https
    #[error("unsupported scheme '{scheme}' in '{url}'")]
    Scheme { url: String, scheme: String },

    /// Hostname has no label in front of its public suffix (e.g. "co.uk")
    #[error("no registrable domain in host '{host}'")]
    Format { host: String },
}

// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request did not finish within the configured timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Body was larger than the configured cap
    #[error("body of {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    /// Connection, DNS, TLS or body decoding failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// No page is known for this URL (used by in-memory fetchers)
    #[error("no page available for {url}")]
    NotFound { url: String },
}

// Problems reading or writing the adjacency dump
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line did not have the `domain;incoming;outgoing` shape
    #[error("malformed dump line {line}: '{content}'")]
    Malformed { line: usize, content: String },
}

// Outcome of a shortest-path query that did not produce a path.
// NotReachable is an ordinary answer, not a failure of the query itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{dst} is not reachable from {src}")]
    NotReachable { src: String, dst: String },

    #[error("{0} is not a vertex of the graph")]
    UnknownSource(String),
}

// Errors that stop a crawl before any task is spawned
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL: {0}")]
    InvalidSeed(#[from] NormalizeError),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
