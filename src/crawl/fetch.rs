// src/crawl/fetch.rs
// =============================================================================
// Getting a page's HTML off the network.
//
// The crawler only talks to the `Fetcher` trait, so tests can hand it an
// in-memory set of pages while the CLI uses `HttpFetcher`.
//
// HttpFetcher:
// - One shared reqwest Client (connection pooling across all tasks)
// - Fixed per-request timeout covering connect, headers and body
// - Follows up to 5 redirects
// - Anything other than 2xx counts as a failed fetch
// - Reads the body as a stream and gives up once it passes max_body_bytes
//
// Rust concepts:
// - async-trait: async fn in a trait object-safe way
// - Streams: bytes_stream() hands us the body chunk by chunk
// =============================================================================

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;

use crate::config::CrawlConfig;
use crate::error::FetchError;

// Anything that can turn a URL into an HTML document
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

// Fetcher backed by a real HTTP client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch_timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| categorize_error(url, e))?;
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                    limit: self.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        // Pages with broken encodings still yield whatever anchors survive
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

// Splits reqwest errors into "took too long" and everything else
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
