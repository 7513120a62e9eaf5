use indicatif::{ProgressBar, ProgressStyle};
use scopecrawl_core::{DiscoverySet, FrontierFilter, ScopePolicy, SeedError, normalize_href};
use scopecrawl_scanner::{CrawlStats, Crawler, EngineConfig, LinkEnqueuer, Page, PageHandler, ScanError};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Options for configuring a discovery run
pub struct RunOptions {
    pub seeds: Vec<String>,
    pub same_domain_only: bool,
    pub engine: EngineConfig,
    pub show_progress_bars: bool,
}

/// Callback for reporting run progress
pub type RunProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Seeds(#[from] SeedError),

    #[error("Crawl failed: {0}")]
    Scan(#[from] ScanError),
}

/// Everything a finished run produces.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seeds: Vec<String>,
    pub same_domain_only: bool,
    pub stats: CrawlStats,
    /// Discovery set snapshot, sorted ascending.
    pub urls: Vec<String>,
}

/// Page handler wiring the scope engine into the crawler.
///
/// Records every in-scope page and asset linked from a page, then asks the
/// engine to follow links through the [`FrontierFilter`]. Both paths decide
/// through the same [`ScopePolicy`].
pub struct DiscoveryHandler {
    policy: Arc<ScopePolicy>,
    frontier: FrontierFilter,
    discovered: Arc<DiscoverySet>,
}

impl DiscoveryHandler {
    pub fn new(policy: Arc<ScopePolicy>, discovered: Arc<DiscoverySet>) -> Self {
        let frontier = FrontierFilter::new(policy.clone());
        Self {
            policy,
            frontier,
            discovered,
        }
    }

    /// Normalize, classify and record a page's hrefs. Returns how many were new.
    pub fn record_links<S: AsRef<str>>(&self, hrefs: &[S], base: &Url) -> usize {
        let mut recorded = 0;
        for href in hrefs {
            let url = match normalize_href(href.as_ref(), base) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Dropped link {:?}: {}", href.as_ref(), e);
                    continue;
                }
            };
            if self.policy.classify(&url).is_recorded() && self.discovered.record(&url) {
                recorded += 1;
            }
        }
        recorded
    }
}

impl PageHandler for DiscoveryHandler {
    fn handle_page(&self, page: &Page, links: &mut LinkEnqueuer<'_>) {
        let recorded = self.record_links(page.anchor_hrefs(), page.base_url());
        let enqueued = links.enqueue_links(|candidate| self.frontier.accept(candidate));
        debug!(
            "{}: {} new result(s), {} link(s) enqueued",
            page.request_url(),
            recorded,
            enqueued
        );
    }
}

/// Execute a discovery run with the given options.
///
/// Fails before any request is made when no usable seed is supplied.
pub async fn execute_run(
    options: RunOptions,
    progress_callback: Option<RunProgressCallback>,
) -> Result<RunReport, RunError> {
    let RunOptions {
        seeds,
        same_domain_only,
        engine,
        show_progress_bars,
    } = options;

    let policy = Arc::new(ScopePolicy::from_seeds(&seeds, same_domain_only)?);
    let discovered = Arc::new(DiscoverySet::new());

    // In-scope seeds are results; only page seeds are navigated.
    let mut crawl_seeds = Vec::with_capacity(policy.seeds().len());
    for seed in policy.seeds() {
        let class = policy.classify(seed);
        if class.is_recorded() {
            discovered.record(seed);
        }
        if class.is_navigable() {
            crawl_seeds.push(seed.clone());
        } else {
            debug!("Seed {} is not navigable ({:?}), recorded only", seed, class);
        }
    }

    if let Some(ref callback) = progress_callback {
        callback(format!(
            "Crawling {} seed(s) across {} host(s)",
            policy.seeds().len(),
            policy.allowed_hosts().len()
        ));
    }

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let mut crawler = Crawler::new(engine)?;
    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        let processed = Arc::new(AtomicUsize::new(0));
        let discovered = discovered.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |_worker_id: usize, _url: String| {
            let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_message(format!(
                "Crawling... {} pages requested, {} URLs discovered",
                count,
                discovered.len()
            ));
        }));
    }

    let handler = Arc::new(DiscoveryHandler::new(policy.clone(), discovered.clone()));
    let result = if crawl_seeds.is_empty() {
        Ok(CrawlStats::default())
    } else {
        crawler.run(&crawl_seeds, handler).await
    };

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }
    let stats = result?;

    let urls = discovered.snapshot();
    if let Some(ref callback) = progress_callback {
        callback(format!(
            "Discovered {} URL(s) from {} page(s)",
            urls.len(),
            stats.pages_handled
        ));
    }

    Ok(RunReport {
        seeds: policy.seeds().iter().map(Url::to_string).collect(),
        same_domain_only,
        stats,
        urls,
    })
}
