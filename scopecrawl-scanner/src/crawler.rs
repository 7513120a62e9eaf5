use crate::config::EngineConfig;
use crate::error::{Result, ScanError};
use crate::page::{LinkEnqueuer, Page};
use crate::result::CrawlStats;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

type WorkerQueues = Arc<Vec<Mutex<VecDeque<Url>>>>;

/// Called once for every successfully fetched HTML page.
///
/// Runs on the blocking pool under the handler timeout. Links the handler
/// passes to [`LinkEnqueuer::enqueue_links`] become new crawl tasks.
pub trait PageHandler: Send + Sync + 'static {
    fn handle_page(&self, page: &Page, links: &mut LinkEnqueuer<'_>);
}

/// Shared bookkeeping for one run.
#[derive(Default)]
struct RunState {
    visited: Mutex<HashSet<String>>,
    /// URLs queued or being visited. Children are counted before their
    /// parent is released, so zero means the crawl is finished.
    pending: AtomicUsize,
    requests: AtomicUsize,
    pages_handled: AtomicUsize,
    failed_requests: AtomicUsize,
    handler_timeouts: AtomicUsize,
    ceiling_reached: AtomicBool,
}

impl RunState {
    fn stats(&self) -> CrawlStats {
        CrawlStats {
            requests: self.requests.load(Ordering::SeqCst),
            pages_handled: self.pages_handled.load(Ordering::SeqCst),
            failed_requests: self.failed_requests.load(Ordering::SeqCst),
            handler_timeouts: self.handler_timeouts.load(Ordering::SeqCst),
            ceiling_reached: self.ceiling_reached.load(Ordering::SeqCst),
        }
    }

    /// Marks a URL as scheduled. Returns `false` if it already was.
    async fn mark_visited(&self, url: &Url) -> bool {
        self.visited.lock().await.insert(url.to_string())
    }

    /// Schedule `url` on `worker_queues[target]` unless it was seen before.
    async fn schedule(&self, worker_queues: &WorkerQueues, target: usize, url: Url) -> bool {
        if !self.mark_visited(&url).await {
            return false;
        }
        self.pending.fetch_add(1, Ordering::SeqCst);
        worker_queues[target].lock().await.push_back(url);
        true
    }

    fn finish_one(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct Crawler {
    client: Client,
    config: EngineConfig,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.navigation_timeout)
            .connect_timeout(config.navigation_timeout / 2)
            .pool_max_idle_per_host(config.max_concurrency.max(1))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            config,
            progress_callback: None,
        })
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl outward from `seeds`, calling `handler` for every HTML page.
    ///
    /// Returns once every scheduled URL has been visited, or once
    /// the request ceiling has been reached and in-flight pages finished.
    pub async fn run<H: PageHandler>(
        &self,
        seeds: &[Url],
        handler: Arc<H>,
    ) -> Result<CrawlStats> {
        if seeds.is_empty() {
            return Err(ScanError::NoSeeds);
        }

        let workers = self.config.max_concurrency.max(1);
        info!(
            "Starting crawl of {} seed(s) with {} workers (max requests {}, wait until {}, headless {})",
            seeds.len(),
            workers,
            self.config.max_requests,
            self.config.wait_until,
            self.config.headless
        );

        let state = Arc::new(RunState::default());
        let worker_queues: WorkerQueues =
            Arc::new((0..workers).map(|_| Mutex::new(VecDeque::new())).collect());

        // Seeds are spread round-robin like discovered links.
        let mut target_worker = 0;
        for seed in seeds {
            if state.schedule(&worker_queues, target_worker, seed.clone()).await {
                target_worker = (target_worker + 1) % workers;
            }
        }

        let mut worker_handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let client = self.client.clone();
            let config = self.config.clone();
            let progress_cb = self.progress_callback.clone();
            let handler = handler.clone();
            let state = state.clone();
            let worker_queues = worker_queues.clone();

            let handle = tokio::spawn(async move {
                debug!("Worker {} started", worker_id);

                loop {
                    if state.ceiling_reached.load(Ordering::SeqCst) {
                        break;
                    }

                    let Some(url) = Self::next_url(&worker_queues, worker_id).await else {
                        if state.pending.load(Ordering::SeqCst) == 0 {
                            break;
                        }
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        continue;
                    };

                    if state.requests.fetch_add(1, Ordering::SeqCst) >= config.max_requests {
                        state.requests.fetch_sub(1, Ordering::SeqCst);
                        if !state.ceiling_reached.swap(true, Ordering::SeqCst) {
                            info!("Request ceiling of {} reached, stopping", config.max_requests);
                        }
                        state.finish_one();
                        break;
                    }

                    if let Some(ref callback) = progress_cb {
                        callback(worker_id, url.to_string());
                    }

                    Self::visit(&client, &config, &url, handler.clone(), &state, &worker_queues)
                        .await;

                    state.finish_one();
                }

                debug!("Worker {} finished", worker_id);
            });

            worker_handles.push(handle);
        }

        for handle in worker_handles {
            handle.await?;
        }

        let stats = state.stats();
        info!(
            "Crawl complete. {} request(s), {} page(s) handled, {} failed",
            stats.requests, stats.pages_handled, stats.failed_requests
        );
        Ok(stats)
    }

    /// Fetch one page, run the handler and schedule the links it accepted.
    async fn visit<H: PageHandler>(
        client: &Client,
        config: &EngineConfig,
        url: &Url,
        handler: Arc<H>,
        state: &RunState,
        worker_queues: &WorkerQueues,
    ) {
        let fetch = Self::fetch_page(client, url);
        let page = match tokio::time::timeout(config.navigation_timeout, fetch).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!("Crawl error for {}: {}", url, e);
                state.failed_requests.fetch_add(1, Ordering::SeqCst);
                return;
            }
            Err(_) => {
                warn!(
                    "Crawl error for {}: {}",
                    url,
                    ScanError::NavigationTimeout(config.navigation_timeout)
                );
                state.failed_requests.fetch_add(1, Ordering::SeqCst);
                return;
            }
        };

        if page.loaded_url() != url {
            state.mark_visited(page.loaded_url()).await;
        }

        if !page.is_html() {
            debug!("Skipping non-HTML response from {} ({:?})", url, page.content_type());
            return;
        }

        let new_urls = match Self::dispatch_handler(handler, page, config.handler_timeout).await {
            Ok(urls) => urls,
            Err(ScanError::HandlerTimeout(limit)) => {
                warn!("Page handler for {} timed out after {:?}", url, limit);
                state.handler_timeouts.fetch_add(1, Ordering::SeqCst);
                return;
            }
            Err(e) => {
                warn!("Page handler for {} failed: {}", url, e);
                return;
            }
        };
        state.pages_handled.fetch_add(1, Ordering::SeqCst);

        // Distribute new URLs across all worker queues (round-robin)
        let num_workers = worker_queues.len();
        debug!("Distributing {} URLs from {} across {} workers", new_urls.len(), url, num_workers);
        let mut target_worker = 0;
        for new_url in new_urls {
            if state.schedule(worker_queues, target_worker, new_url).await {
                target_worker = (target_worker + 1) % num_workers;
            }
        }
    }

    async fn dispatch_handler<H: PageHandler>(
        handler: Arc<H>,
        page: Page,
        limit: Duration,
    ) -> Result<Vec<Url>> {
        let task = tokio::task::spawn_blocking(move || {
            let mut enqueuer = LinkEnqueuer::new(&page);
            handler.handle_page(&page, &mut enqueuer);
            enqueuer.into_accepted()
        });

        match tokio::time::timeout(limit, task).await {
            Ok(joined) => Ok(joined?),
            Err(_) => Err(ScanError::HandlerTimeout(limit)),
        }
    }

    async fn fetch_page(client: &Client, url: &Url) -> Result<Page> {
        debug!("Fetching {}", url);

        let response = client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status(status.as_u16()));
        }

        let loaded_url = response.url().clone();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;

        Ok(Page::new(url.clone(), loaded_url, status.as_u16(), content_type, body))
    }

    /// Pop from this worker's own queue, or steal from the back of another.
    async fn next_url(worker_queues: &WorkerQueues, worker_id: usize) -> Option<Url> {
        if let Some(url) = worker_queues[worker_id].lock().await.pop_front() {
            return Some(url);
        }
        let workers = worker_queues.len();
        for offset in 1..workers {
            let victim = (worker_id + offset) % workers;
            if let Some(url) = worker_queues[victim].lock().await.pop_back() {
                debug!("Worker {} stole work from worker {}", worker_id, victim);
                return Some(url);
            }
        }
        None
    }
}
