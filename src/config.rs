// src/config.rs
// =============================================================================
// Knobs for one crawl.
//
// The CLI fills this in from flags (and DOMAIN_ATLAS_* environment variables);
// library users can start from CrawlConfig::default() and tweak fields.
// =============================================================================

use std::time::Duration;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("domain-atlas/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Depth at which tasks stop fetching. The seed sits at depth 0, so
    /// max_depth = 2 fetches the seed and the domains it links to.
    pub max_depth: usize,

    /// Wall-clock limit for one fetch, body included
    pub fetch_timeout: Duration,

    /// Crawl tasks allowed in flight at once; None means no cap
    pub max_concurrency: Option<usize>,

    pub user_agent: String,

    /// Bodies longer than this are abandoned
    pub max_body_bytes: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            fetch_timeout: Duration::from_secs(30),
            max_concurrency: Some(64),
            user_agent: USER_AGENT.to_string(),
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

impl CrawlConfig {
    // Builder-style helpers used by the CLI and tests

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    // 0 is read as "no cap", matching the CLI flag
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = (limit > 0).then_some(limit);
        self
    }
}
