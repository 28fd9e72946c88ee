//! Depth-bounded breadth-first crawl engine: a shared work queue, a shared
//! visited set, and a pool of worker tasks feeding the index store.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};

use crate::core::config::SpiderConfig;
use crate::fetch::{is_valid_url, Fetcher};
use crate::html;
use crate::store::IndexWriter;

/// How long an idle worker waits for a queue notification before re-polling.
const IDLE_WAIT: Duration = Duration::from_millis(100);

/// One unit of crawl work: a URL and its hop distance from the seed.
#[derive(Debug, Clone)]
struct UrlTask {
    url: String,
    depth: usize,
}

/// Counters reported when a crawl finishes.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CrawlStats {
    pub processed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub visited: usize,
}

pub struct CrawlEngine {
    config: SpiderConfig,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn IndexWriter>,

    queue: Mutex<VecDeque<UrlTask>>,
    queue_notify: Notify,
    visited: Mutex<HashSet<String>>,

    running: AtomicBool,
    seeded: AtomicBool,
    idle_workers: AtomicUsize,
    processed: AtomicUsize,
    errors: AtomicUsize,
    skipped: AtomicUsize,
}

impl CrawlEngine {
    pub fn new(
        config: SpiderConfig,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn IndexWriter>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            fetcher,
            store,
            queue: Mutex::new(VecDeque::new()),
            queue_notify: Notify::new(),
            visited: Mutex::new(HashSet::new()),
            running: AtomicBool::new(true),
            seeded: AtomicBool::new(false),
            idle_workers: AtomicUsize::new(0),
            processed: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
        })
    }

    /// Run the crawl to completion: spawn the worker pool, enqueue the seed,
    /// and wait for the workers to drain the frontier and shut themselves down.
    pub async fn run(self: &Arc<Self>) -> CrawlStats {
        info!(
            "starting crawl of {} (max_depth: {}, workers: {}, delay: {}ms)",
            self.config.start_url,
            self.config.max_depth,
            self.config.thread_count,
            self.config.delay_between_requests
        );

        let workers: Vec<_> = (0..self.config.thread_count.max(1))
            .map(|n| {
                let engine = Arc::clone(self);
                tokio::spawn(async move { engine.worker_loop(n).await })
            })
            .collect();

        // Seed goes in once the pool is up. A rejected seed means there is
        // nothing to crawl; shut down instead of leaving the pool waiting.
        if !self.add_url_to_queue(&self.config.start_url, 0).await {
            warn!("seed url rejected: {}", self.config.start_url);
            self.shutdown();
        }
        self.seeded.store(true, Ordering::SeqCst);

        futures::future::join_all(workers).await;

        let stats = self.stats().await;
        info!(
            "crawl finished: {} processed, {} errors, {} skipped, {} urls visited",
            stats.processed, stats.errors, stats.skipped, stats.visited
        );
        stats
    }

    /// Ask the engine to stop. In-flight tasks run to completion.
    pub fn stop(&self) {
        info!("stopping crawl");
        self.shutdown();
    }

    pub async fn stats(&self) -> CrawlStats {
        CrawlStats {
            processed: self.processed.load(Ordering::SeqCst),
            errors: self.errors.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            visited: self.visited.lock().await.len(),
        }
    }

    /// Validate and enqueue a task. The visited set is only peeked here; the
    /// dequeuing worker does the authoritative test-and-insert, so a racing
    /// duplicate enqueue is harmless.
    pub async fn add_url_to_queue(&self, url: &str, depth: usize) -> bool {
        if !self.running.load(Ordering::SeqCst) || depth > self.config.max_depth {
            return false;
        }
        if !is_valid_url(url) {
            return false;
        }
        if self.visited.lock().await.contains(url) {
            return false;
        }

        self.queue.lock().await.push_back(UrlTask {
            url: url.to_string(),
            depth,
        });
        self.queue_notify.notify_one();
        true
    }

    fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.queue_notify.notify_waiters();
    }

    async fn worker_loop(&self, worker: usize) {
        debug!("worker {} started", worker);

        loop {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let task = self.queue.lock().await.pop_front();
            match task {
                Some(task) => self.process_url(&task.url, task.depth).await,
                None => {
                    let idle = self.idle_workers.fetch_add(1, Ordering::SeqCst) + 1;

                    // Natural completion: every worker is waiting on an empty
                    // queue after the seed went in, so no task can ever arrive.
                    // The last idler shuts the pool down.
                    if idle == self.config.thread_count.max(1)
                        && self.seeded.load(Ordering::SeqCst)
                        && self.queue.lock().await.is_empty()
                    {
                        self.idle_workers.fetch_sub(1, Ordering::SeqCst);
                        self.shutdown();
                        break;
                    }

                    let _ = tokio::time::timeout(IDLE_WAIT, self.queue_notify.notified()).await;
                    self.idle_workers.fetch_sub(1, Ordering::SeqCst);
                }
            }
        }

        debug!("worker {} finished", worker);
    }

    async fn process_url(&self, url: &str, depth: usize) {
        if depth > self.config.max_depth {
            return;
        }

        // Authoritative dedup: first dequeuer wins.
        {
            let mut visited = self.visited.lock().await;
            if !visited.insert(url.to_string()) {
                return;
            }
        }

        info!("processing {} (depth {})", url, depth);

        let page = self.fetcher.download(url).await;
        if page.status != 200 {
            warn!("download of {} failed with status {}", url, page.status);
            self.errors.fetch_add(1, Ordering::SeqCst);
            return;
        }
        if !page.content_type.contains("text/html") {
            debug!("skipping non-html content at {} ({})", url, page.content_type);
            self.skipped.fetch_add(1, Ordering::SeqCst);
            return;
        }

        let text = html::extract_text(&page.body);
        let words = html::extract_words(&text);
        let mut title = html::get_title(&page.body);
        if title.is_empty() {
            title = url.to_string();
        }

        if !self.index_page(url, &title, &text, &words).await {
            self.errors.fetch_add(1, Ordering::SeqCst);
            return;
        }
        self.processed.fetch_add(1, Ordering::SeqCst);

        if depth < self.config.max_depth {
            let links = html::extract_links(&page.body, url);
            debug!("found {} links on {}", links.len(), url);
            for link in links {
                self.add_url_to_queue(&link, depth + 1).await;
            }
        }

        if self.config.delay_between_requests > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_between_requests)).await;
        }
    }

    /// Store one page: upsert the document row, refresh its content on a
    /// re-crawl, and atomically rewrite its word map.
    async fn index_page(&self, url: &str, title: &str, text: &str, words: &[String]) -> bool {
        let existed = match self.store.document_exists(url).await {
            Ok(existed) => existed,
            Err(e) => {
                warn!("document lookup failed for {}: {}", url, e);
                return false;
            }
        };

        let doc_id = match self.store.add_document(url, title, text).await {
            Ok(id) => id,
            Err(e) => {
                warn!("failed to store document {}: {}", url, e);
                return false;
            }
        };

        if existed {
            if let Err(e) = self.store.update_document(url, title, text).await {
                warn!("failed to refresh document {}: {}", url, e);
                return false;
            }
        }

        let mut frequencies: HashMap<String, i32> = HashMap::new();
        for word in words {
            let len = word.chars().count();
            if (html::MIN_TOKEN_LEN..=html::MAX_TOKEN_LEN).contains(&len) {
                *frequencies.entry(word.clone()).or_insert(0) += 1;
            }
        }

        if let Err(e) = self.store.replace_document_words(doc_id, &frequencies).await {
            warn!("failed to index words of {}: {}", url, e);
            return false;
        }

        debug!("indexed {} ({} distinct terms)", url, frequencies.len());
        true
    }
}
