// src/crawl/queue.rs
// =============================================================================
// Builds the domain graph by crawling outwards from a seed URL.
//
// How it works:
// 1. Normalize the seed to its registrable domain and make it the root vertex
// 2. Put one crawl task (url, depth, vertex) for the root on the queue
// 3. Each task fetches its URL, pulls out the anchor hrefs and reduces each
//    one to a domain
// 4. A domain the graph has never seen becomes a new vertex, gets an edge
//    from the task's vertex, and a crawl task of its own at depth + 1
// 5. A domain that already exists only gets a back-edge (unless it is the
//    task's own domain), and is not crawled again
// 6. The crawl is over when the queue is empty and no task is running
//
// Each domain is crawled once, through the URL under which it was first
// discovered. Pages other than that one are never visited.
//
// Failures stay local: a URL that does not normalize is skipped, a fetch that
// fails ends its own task, and the rest of the crawl carries on.
//
// Rust concepts:
// - JoinSet: a set of spawned tasks we can await one at a time
// - VecDeque: FIFO queue of tasks waiting for a free slot
// - Arc: the graph and the fetcher are shared by every task
// =============================================================================

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::config::CrawlConfig;
use crate::domain::{extract_origin, normalize};
use crate::error::CrawlError;
use crate::graph::{Digraph, Vertex};

use super::fetch::{Fetcher, HttpFetcher};
use super::html::extract_hrefs;

// One unit of work: crawl `url`, attributing what it links to to `vertex`
#[derive(Debug)]
struct CrawlTask {
    url: String,
    depth: usize,
    vertex: Arc<Vertex>,
}

// What a finished task hands back to the driver loop
#[derive(Debug)]
enum TaskOutcome {
    /// Reached max depth, nothing fetched
    Terminal,
    /// Fetch failed, branch pruned
    FetchFailed,
    /// Page fetched; these newly discovered domains still need crawling
    Crawled(Vec<CrawlTask>),
}

// Summary of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The finished graph. No task holds it any more, so it no longer changes.
    pub graph: Arc<Digraph>,
    /// Registrable domain of the seed URL
    pub root: String,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    /// Tasks that stopped at the depth limit without fetching
    pub terminal_tasks: usize,
    pub duration: Duration,
}

// Crawls the web into a Digraph of domains
pub struct Crawler<F = HttpFetcher> {
    fetcher: Arc<F>,
    config: CrawlConfig,
}

impl Crawler<HttpFetcher> {
    // Crawler that goes over the network with reqwest
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config).map_err(CrawlError::Client)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn with_fetcher(fetcher: Arc<F>, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    // Crawls from `seed_url` until every spawned task has finished
    //
    // Only a seed that cannot be normalized is an error; everything that goes
    // wrong after that just makes the graph smaller.
    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlReport, CrawlError> {
        let started = Instant::now();
        let root_domain = normalize(seed_url)?;

        let graph = Arc::new(Digraph::new());
        let (root, _) = graph.get_or_insert(&root_domain);

        info!(
            seed = seed_url,
            root = %root_domain,
            max_depth = self.config.max_depth,
            max_concurrency = ?self.config.max_concurrency,
            "starting crawl"
        );

        let mut pending = VecDeque::from([CrawlTask {
            url: seed_url.to_string(),
            depth: 0,
            vertex: root,
        }]);
        let mut running = JoinSet::new();

        let mut pages_fetched = 0;
        let mut fetch_failures = 0;
        let mut terminal_tasks = 0;

        loop {
            // Fill free slots from the queue
            while self.has_free_slot(running.len()) {
                let Some(task) = pending.pop_front() else {
                    break;
                };
                running.spawn(crawl_domain(
                    Arc::clone(&self.fetcher),
                    Arc::clone(&graph),
                    task,
                    self.config.max_depth,
                ));
            }

            // Nothing running means nothing queued either: the crawl is quiescent
            let Some(joined) = running.join_next().await else {
                break;
            };

            match joined {
                Ok(TaskOutcome::Crawled(children)) => {
                    pages_fetched += 1;
                    pending.extend(children);
                }
                Ok(TaskOutcome::FetchFailed) => fetch_failures += 1,
                Ok(TaskOutcome::Terminal) => terminal_tasks += 1,
                Err(e) => warn!(error = %e, "crawl task did not complete"),
            }
        }

        let duration = started.elapsed();
        info!(
            vertices = graph.len(),
            edges = graph.edge_count(),
            pages_fetched,
            fetch_failures,
            elapsed = ?duration,
            "crawl finished"
        );

        Ok(CrawlReport {
            graph,
            root: root_domain,
            pages_fetched,
            fetch_failures,
            terminal_tasks,
            duration,
        })
    }

    fn has_free_slot(&self, running: usize) -> bool {
        match self.config.max_concurrency {
            Some(limit) => running < limit.max(1),
            None => true,
        }
    }
}

// Runs one crawl task: fetch, extract, normalize, record, report children
#[instrument(skip_all, fields(url = %task.url, depth = task.depth))]
async fn crawl_domain<F: Fetcher>(
    fetcher: Arc<F>,
    graph: Arc<Digraph>,
    task: CrawlTask,
    max_depth: usize,
) -> TaskOutcome {
    if task.depth >= max_depth {
        return TaskOutcome::Terminal;
    }

    let html = match fetcher.fetch(&task.url).await {
        Ok(html) => html,
        Err(e) => {
            debug!(error = %e, "fetch failed, pruning branch");
            return TaskOutcome::FetchFailed;
        }
    };

    let origins = collect_origins(html).await;

    let parent = &task.vertex;
    let mut children = Vec::new();

    for origin in origins {
        let domain = match normalize(&origin) {
            Ok(domain) => domain,
            Err(e) => {
                debug!(origin = %origin, error = %e, "skipping link");
                continue;
            }
        };

        let (vertex, inserted) = graph.get_or_insert(&domain);
        if inserted {
            parent.add_outgoing(&vertex);
            vertex.add_incoming(parent);
            children.push(CrawlTask {
                url: origin,
                depth: task.depth + 1,
                vertex,
            });
        } else if domain != parent.element() {
            vertex.add_incoming(parent);
        }
    }

    debug!(discovered = children.len(), "page crawled");
    TaskOutcome::Crawled(children)
}

// Distinct origins linked from a page, ordered so a page always yields its
// links the same way.
// HTML parsing is CPU-bound and pages can be megabytes, so it runs on the
// blocking pool instead of a runtime worker.
async fn collect_origins(html: String) -> BTreeSet<String> {
    let parsed = tokio::task::spawn_blocking(move || {
        extract_hrefs(&html)
            .iter()
            .filter_map(|href| extract_origin(href).ok())
            .collect::<BTreeSet<String>>()
    })
    .await;

    match parsed {
        Ok(origins) => origins,
        Err(e) => {
            warn!(error = %e, "link extraction did not complete");
            BTreeSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, NormalizeError};
    use crate::graph::shortest_path;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    // Serves canned pages and remembers every URL it was asked for
    #[derive(Default)]
    struct StaticFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn with_page(mut self, url: &str, links: &[&str]) -> Self {
            let body: String = links
                .iter()
                .map(|link| format!(r#"<a href="{}">link</a>"#, link))
                .collect();
            self.pages
                .insert(url.to_string(), format!("<html><body>{}</body></html>", body));
            self
        }

        fn requested(&self) -> Vec<String> {
            let mut urls = self.requested.lock().unwrap().clone();
            urls.sort();
            urls
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
        }
    }

    fn sorted(mut names: Vec<Arc<str>>) -> Vec<String> {
        names.sort();
        names.into_iter().map(|name| name.to_string()).collect()
    }

    fn small_web() -> StaticFetcher {
        StaticFetcher::default()
            .with_page(
                "https://root.test/",
                &["https://a.test/", "https://b.test/about", "/relative", "mailto:x@root.test"],
            )
            .with_page("https://a.test", &["https://root.test/", "https://c.test/"])
            .with_page("https://b.test", &[])
            .with_page("https://c.test", &["https://d.test/"])
    }

    #[tokio::test]
    async fn test_crawl_builds_domain_graph() {
        let fetcher = Arc::new(small_web());
        let config = CrawlConfig::default().with_max_depth(2);
        let crawler = Crawler::with_fetcher(Arc::clone(&fetcher), config);

        let report = crawler.crawl("https://root.test/").await.unwrap();
        let graph = &report.graph;

        assert_eq!(report.root, "root.test");
        let mut domains = graph.domains();
        domains.sort();
        assert_eq!(domains, vec!["a.test", "b.test", "c.test", "root.test"]);

        // c.test sits at the depth limit, root.test is never fetched twice
        assert_eq!(
            fetcher.requested(),
            vec!["https://a.test", "https://b.test", "https://root.test/"]
        );
        assert_eq!(report.pages_fetched, 3);
        assert_eq!(report.terminal_tasks, 1);

        let root = graph.lookup("root.test").unwrap();
        assert_eq!(sorted(root.outgoing()), vec!["a.test", "b.test"]);
        // Back-edge from a.test
        assert_eq!(sorted(root.incoming()), vec!["a.test"]);

        let a = graph.lookup("a.test").unwrap();
        assert_eq!(sorted(a.outgoing()), vec!["c.test"]);
        assert_eq!(sorted(a.incoming()), vec!["root.test"]);

        assert!(graph.lookup("d.test").is_none());
    }

    #[tokio::test]
    async fn test_every_vertex_reachable_from_root() {
        let fetcher = Arc::new(small_web());
        let crawler = Crawler::with_fetcher(fetcher, CrawlConfig::default().with_max_depth(3));
        let report = crawler.crawl("https://root.test/").await.unwrap();

        assert!(report.graph.contains("d.test"));
        for domain in report.graph.domains() {
            assert!(
                shortest_path(&report.graph, &report.root, &domain).is_ok(),
                "{} not reachable",
                domain
            );
        }
        assert_eq!(
            shortest_path(&report.graph, "root.test", "d.test").unwrap().hops(),
            3
        );
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_nothing() {
        let fetcher = Arc::new(small_web());
        let crawler = Crawler::with_fetcher(
            Arc::clone(&fetcher),
            CrawlConfig::default().with_max_depth(0),
        );
        let report = crawler.crawl("https://root.test/").await.unwrap();

        assert_eq!(report.graph.len(), 1);
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_links_to_own_domain_are_not_self_loops() {
        let fetcher = Arc::new(
            StaticFetcher::default()
                .with_page("https://root.test/", &["https://www.root.test/docs", "http://root.test"]),
        );
        let crawler = Crawler::with_fetcher(fetcher, CrawlConfig::default().with_max_depth(2));
        let report = crawler.crawl("https://root.test/").await.unwrap();

        let root = report.graph.lookup("root.test").unwrap();
        assert_eq!(root.in_degree(), 0);
        assert_eq!(root.out_degree(), 0);
        assert_eq!(report.graph.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_prunes_only_its_branch() {
        // b.test has no page: its fetch fails but a.test is still crawled
        let fetcher = Arc::new(
            StaticFetcher::default()
                .with_page("https://root.test/", &["https://a.test/", "https://b.test/"])
                .with_page("https://a.test", &["https://c.test/"]),
        );
        let crawler = Crawler::with_fetcher(fetcher, CrawlConfig::default().with_max_depth(3));
        let report = crawler.crawl("https://root.test/").await.unwrap();

        assert!(report.graph.contains("b.test"));
        assert!(report.graph.contains("c.test"));
        assert_eq!(report.graph.lookup("b.test").unwrap().out_degree(), 0);
        // b.test and c.test both fail (c.test has no page either)
        assert_eq!(report.fetch_failures, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_discovery_crawls_domain_once() {
        // Every first-level domain links to z.test; only one of them creates it
        let mut fetcher = StaticFetcher::default();
        let first_level: Vec<String> = (0..20).map(|i| format!("https://s{}.test/", i)).collect();
        let links: Vec<&str> = first_level.iter().map(String::as_str).collect();
        fetcher = fetcher.with_page("https://root.test/", &links);
        for i in 0..20 {
            fetcher = fetcher.with_page(&format!("https://s{}.test", i), &["https://z.test/"]);
        }
        let fetcher = Arc::new(fetcher.with_page("https://z.test", &[]));

        let crawler = Crawler::with_fetcher(
            Arc::clone(&fetcher),
            CrawlConfig::default().with_max_depth(3).with_max_concurrency(0),
        );
        let report = crawler.crawl("https://root.test/").await.unwrap();

        let z_fetches = fetcher
            .requested()
            .iter()
            .filter(|url| url.as_str() == "https://z.test")
            .count();
        assert_eq!(z_fetches, 1);

        let z = report.graph.lookup("z.test").unwrap();
        // One discovery edge plus nineteen back-edges
        assert_eq!(z.in_degree(), 20);
        assert_eq!(report.graph.len(), 22);
        assert_eq!(report.graph.edge_count(), 21);
    }

    #[tokio::test]
    async fn test_concurrency_cap_gives_same_graph() {
        let capped = Crawler::with_fetcher(
            Arc::new(small_web()),
            CrawlConfig::default().with_max_depth(3).with_max_concurrency(1),
        )
        .crawl("https://root.test/")
        .await
        .unwrap();

        let unbounded = Crawler::with_fetcher(
            Arc::new(small_web()),
            CrawlConfig::default().with_max_depth(3).with_max_concurrency(0),
        )
        .crawl("https://root.test/")
        .await
        .unwrap();

        let mut left = capped.graph.domains();
        let mut right = unbounded.graph.domains();
        left.sort();
        right.sort();
        assert_eq!(left, right);
        assert_eq!(capped.graph.edge_count(), unbounded.graph.edge_count());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_link_extraction_leaves_runtime_free() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

        // Big enough that parsing cannot finish before the first poll
        let html = r#"<p><a href="https://x.test/page">x</a></p>"#.repeat(20_000);
        let origins = collect_origins(html).await;

        // On a single-threaded runtime the other task only runs if we yielded
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(origins.into_iter().collect::<Vec<_>>(), vec!["https://x.test"]);
    }

    // io::Write into a shared buffer so log output can be inspected
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_finish_log_reports_elapsed_duration() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let crawler = Crawler::with_fetcher(Arc::new(small_web()), CrawlConfig::default().with_max_depth(1));
        crawler.crawl("https://root.test/").await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let finished = output
            .lines()
            .find(|line| line.contains("crawl finished"))
            .unwrap();
        assert!(finished.contains("elapsed="));
        assert!(!finished.contains("elapsed_ms"));
    }

    #[tokio::test]
    async fn test_invalid_seed_is_rejected() {
        let crawler = Crawler::with_fetcher(Arc::new(StaticFetcher::default()), CrawlConfig::default());
        let err = crawler.crawl("ftp://root.test/").await.unwrap_err();
        assert!(matches!(
            err,
            CrawlError::InvalidSeed(NormalizeError::Scheme { .. })
        ));
    }
}
