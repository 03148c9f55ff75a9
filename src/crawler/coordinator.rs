//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that coordinates all aspects of
//! the crawling process, including:
//! - Admitting the seed and every newly discovered page
//! - Running a fixed number of fetch workers over the shared frontier
//! - Coordinating fetching, link extraction, normalization and exclusion
//! - Handling cancellation and the global time limit
//! - Reporting the final summary

use crate::config::{validate, Config};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::LinkExtractor;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlStats, CrawlSummary, PageSink, TextFileSink};
use crate::state::PageState;
use crate::url::{normalize_href, ExclusionPolicy, PageUrl};
use crate::CrawlError;
use chrono::Utc;
use scraper::Html;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Origin;

/// Log a progress line every this many fetched pages
const PROGRESS_INTERVAL: u64 = 100;

/// Everything the workers share for one crawl run
struct CrawlContext {
    origin: Origin,
    policy: ExclusionPolicy,
    extractor: LinkExtractor,
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn PageSink>,
    visited: VisitedSet,
    scheduler: Scheduler,
    stats: CrawlStats,
    shutdown: CancellationToken,
}

impl CrawlContext {
    /// Records a page that just won its visited-set slot and queues it
    fn admit(&self, url: PageUrl) -> Result<(), CrawlError> {
        self.sink.record_page(&url)?;
        let total = self.stats.record_discovered();
        tracing::trace!("[{}] {}", total, url);
        self.scheduler.enqueue(url);
        Ok(())
    }

    /// Runs extract -> normalize -> exclude -> dedup over a fetched body
    ///
    /// Returns the number of newly admitted pages. The parsed document never
    /// leaves this function, so no await point can observe it.
    fn process_links(&self, body: &str) -> Result<usize, CrawlError> {
        let document = Html::parse_document(body);
        let mut admitted = 0;

        for href in self.extractor.links(&document) {
            let url = match normalize_href(href, &self.origin) {
                Some(url) => url,
                None => continue,
            };

            if self.policy.is_excluded(&url) {
                self.stats.record_excluded();
                continue;
            }

            if self.visited.insert(&url) {
                self.admit(url)?;
                admitted += 1;
            }
        }

        Ok(admitted)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    seed: PageUrl,
    config: Config,
    ctx: Arc<CrawlContext>,
}

impl Coordinator {
    /// Creates a coordinator with the HTTP fetcher and a fresh text sink
    ///
    /// The seed is validated before the sink file is created; a sink that
    /// cannot be created aborts here, before any request is made.
    ///
    /// # Arguments
    ///
    /// * `seed` - The absolute URL to start from; its origin bounds the crawl
    /// * `config` - The crawler configuration
    pub fn new(seed: &str, config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;
        let seed = PageUrl::from_seed(seed)?;
        let fetcher = HttpFetcher::from_config(&config.crawler)?;
        let sink = TextFileSink::create(Path::new(&config.output.pages_path))?;

        Self::assemble(seed, config, Arc::new(fetcher), Arc::new(sink))
    }

    /// Creates a coordinator with caller-supplied transport and sink
    pub fn with_parts(
        seed: &str,
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        sink: Arc<dyn PageSink>,
    ) -> Result<Self, CrawlError> {
        validate(&config)?;
        let seed = PageUrl::from_seed(seed)?;

        Self::assemble(seed, config, fetcher, sink)
    }

    fn assemble(
        seed: PageUrl,
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        sink: Arc<dyn PageSink>,
    ) -> Result<Self, CrawlError> {
        let origin = seed.origin();
        let shutdown = CancellationToken::new();

        let ctx = CrawlContext {
            policy: ExclusionPolicy::new(&config.exclusion),
            extractor: LinkExtractor::new(&origin)?,
            origin,
            fetcher,
            sink,
            visited: VisitedSet::new(),
            scheduler: Scheduler::new(shutdown.clone()),
            stats: CrawlStats::new(),
            shutdown,
        };

        Ok(Self {
            seed,
            config,
            ctx: Arc::new(ctx),
        })
    }

    /// Token that stops the crawl when cancelled
    ///
    /// In-flight fetches are abandoned and workers exit without taking new
    /// work; pages already written to the sink stay valid.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.ctx.shutdown.clone()
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// 1. Admits the seed (trusted: never checked against the exclusion policy)
    /// 2. Spawns `concurrency` workers over the shared frontier
    /// 3. Waits until the frontier drains or the crawl is stopped
    /// 4. Flushes the sink on every exit path
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Crawl finished or was cancelled
    /// * `Err(CrawlError)` - The sink failed or a worker died
    pub async fn run(self) -> Result<CrawlSummary, CrawlError> {
        let Coordinator { seed, config, ctx } = self;
        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!(
            "Start crawling {} with {} workers",
            seed,
            config.crawler.concurrency
        );

        ctx.visited.insert(&seed);
        if let Err(e) = ctx.admit(seed.clone()) {
            if let Err(flush) = ctx.sink.finalize() {
                tracing::warn!("Failed to flush page list: {}", flush);
            }
            return Err(e);
        }

        let watchdog = config.crawler.max_duration().map(|limit| {
            let shutdown = ctx.shutdown.clone();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                tracing::warn!("Time limit of {:?} reached, stopping crawl", limit);
                shutdown.cancel();
            })
        });

        let mut workers = JoinSet::new();
        for worker_id in 0..config.crawler.concurrency {
            workers.spawn(run_worker(Arc::clone(&ctx), worker_id));
        }

        let mut failure = None;
        while let Some(joined) = workers.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    ctx.shutdown.cancel();
                    Err(CrawlError::Worker(e.to_string()))
                }
            };

            if let Err(e) = result {
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }

        if let Some(watchdog) = watchdog {
            watchdog.abort();
        }

        // Abandoned URLs never complete, so a stopped run cannot look drained
        let cancelled = !ctx.scheduler.is_drained();
        let finalized = ctx.sink.finalize();

        if let Some(e) = failure {
            tracing::error!("Crawl aborted: {}", e);
            return Err(e);
        }
        finalized?;

        let summary = CrawlSummary::from_stats(
            seed.to_string(),
            started_at,
            start_time.elapsed(),
            &ctx.stats,
            cancelled,
        );

        if cancelled {
            tracing::warn!(
                "Crawl stopped early with {} URLs still pending",
                ctx.scheduler.pending()
            );
        }
        tracing::debug!("Visited set holds {} URLs", ctx.visited.len());
        tracing::info!("End. Count: {}; Time: {:.2?};", summary.pages, summary.elapsed);

        Ok(summary)
    }
}

/// One member of the fetch worker pool
async fn run_worker(ctx: Arc<CrawlContext>, worker_id: usize) -> Result<(), CrawlError> {
    tracing::trace!("Worker {} started", worker_id);

    while let Some(url) = ctx.scheduler.next_url().await {
        match process_url(&ctx, &url).await {
            Ok(state) if state.is_terminal() => {
                ctx.scheduler.complete();

                let fetched = ctx.stats.fetched();
                if state == PageState::Done && fetched % PROGRESS_INTERVAL == 0 {
                    tracing::info!(
                        "Progress: {} pages fetched, {} discovered, {} pending",
                        fetched,
                        ctx.stats.discovered(),
                        ctx.scheduler.pending()
                    );
                }
            }
            // Abandoned mid-fetch: the URL stays pending
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Worker {} stopping: {}", worker_id, e);
                ctx.shutdown.cancel();
                return Err(e);
            }
        }
    }

    tracing::trace!("Worker {} finished", worker_id);
    Ok(())
}

/// Processes a single URL and returns the state it ended in
///
/// Fetch failures are logged and end in `Failed`. A fetch abandoned on
/// shutdown stays in `Fetching`. Only sink errors and broken state
/// transitions propagate.
async fn process_url(ctx: &CrawlContext, url: &PageUrl) -> Result<PageState, CrawlError> {
    let state = PageState::Discovered.transition(PageState::Fetching)?;
    tracing::debug!("Fetching {}", url);

    let fetched = tokio::select! {
        biased;
        _ = ctx.shutdown.cancelled() => None,
        result = ctx.fetcher.fetch(url) => Some(result),
    };

    let body = match fetched {
        Some(Ok(body)) => body,
        Some(Err(e)) => {
            tracing::warn!("[FAIL] {}: {}", url, e);
            let state = state.transition(PageState::Failed)?;
            ctx.stats.record_outcome(state);
            return Ok(state);
        }
        None => {
            tracing::debug!("Abandoned in-flight fetch of {}", url);
            ctx.stats.record_abandoned();
            return Ok(state);
        }
    };

    let state = state.transition(PageState::Extracted)?;
    let admitted = ctx.process_links(&body)?;
    tracing::trace!("{} yielded {} new pages", url, admitted);

    let state = state.transition(PageState::Done)?;
    ctx.stats.record_outcome(state);
    Ok(state)
}
