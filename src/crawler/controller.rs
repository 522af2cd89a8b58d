//! Crawl controller - main crawl orchestration logic
//!
//! This module contains the batch loop that coordinates the crawl:
//! - Seeding the frontier from the budget's seed URL
//! - Dispatching bounded batches of fetches concurrently
//! - Collecting pages and feeding discovered links back into the frontier
//! - Applying the politeness delay between batches
//! - Deciding termination

use crate::config::CrawlBudget;
use crate::crawler::fetcher::{build_http_client, FetchWorker};
use crate::crawler::frontier::{EnqueueOutcome, Frontier, FrontierEntry};
use crate::crawler::outcome::{FetchError, FetchOutcome, Page, SkipReason};
use crate::crawler::stats::CrawlStats;
use crate::url::CanonicalUrl;
use crate::HarvestError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Lifecycle of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Pages collected by a finished crawl plus its statistics
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages in collection order (roughly breadth-first)
    pub pages: Vec<Page>,

    pub stats: CrawlStats,
}

/// Main crawler structure
pub struct Crawler {
    budget: CrawlBudget,
    worker: Arc<FetchWorker>,
    /// Fetch slots shared by every batch of the run
    permits: Arc<Semaphore>,
    phase: CrawlPhase,
}

impl Crawler {
    /// Creates a new crawler for one budget
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run, in the `Idle` phase
    /// * `Err(HarvestError)` - The budget is invalid or the HTTP client could not be built
    pub fn new(budget: CrawlBudget) -> Result<Self, HarvestError> {
        budget.validate()?;

        let client = build_http_client(&budget)?;
        let worker = FetchWorker::new(client, &budget)?;

        Ok(Self {
            permits: Arc::new(Semaphore::new(budget.concurrency)),
            budget,
            worker: Arc::new(worker),
            phase: CrawlPhase::Idle,
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the crawl to completion
    ///
    /// Each iteration:
    /// 1. Stops if the frontier is empty or the page budget is spent
    /// 2. Dequeues `min(concurrency, frontier length, pages remaining)` entries
    /// 3. Fetches them concurrently and waits for the whole batch
    /// 4. Appends successful pages in completion order and enqueues their
    ///    links one level deeper while the depth limit allows
    /// 5. Sleeps the politeness delay if another batch will follow
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Collected pages and statistics
    /// * `Err(HarvestError::InvalidSeed)` - The seed URL is malformed
    pub async fn run(&mut self) -> Result<CrawlReport, HarvestError> {
        let seed = match CanonicalUrl::parse(&self.budget.seed_url) {
            Ok(seed) => seed,
            Err(reason) => {
                self.phase = CrawlPhase::Failed;
                tracing::error!("Invalid seed URL '{}': {}", self.budget.seed_url, reason);
                return Err(HarvestError::InvalidSeed {
                    url: self.budget.seed_url.clone(),
                    reason,
                });
            }
        };

        self.phase = CrawlPhase::Running;
        tracing::info!(
            "Starting crawl of {} (depth {}, max {} pages, concurrency {})",
            seed,
            self.budget.max_depth,
            self.budget.max_pages,
            self.budget.concurrency
        );

        let start_time = Instant::now();
        let max_pages = self.budget.max_pages;
        let mut frontier = Frontier::new(self.budget.frontier_cap());
        let mut pages: Vec<Page> = Vec::new();
        let mut stats = CrawlStats::default();
        // URLs refused at the frontier cap, so each is counted once
        let mut capped: HashSet<CanonicalUrl> = HashSet::new();

        frontier.enqueue(seed, 0, 0);

        loop {
            if frontier.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }
            if pages.len() >= max_pages {
                tracing::info!("Page budget of {} reached, crawl complete", max_pages);
                break;
            }

            let remaining = max_pages - pages.len();
            let batch = frontier.dequeue_batch(self.budget.concurrency.min(remaining));
            stats.record_batch();
            tracing::debug!("Dispatching batch of {} URLs", batch.len());

            for outcome in self.dispatch(batch, &mut stats).await {
                match outcome {
                    FetchOutcome::Success(page) => {
                        if pages.len() >= max_pages {
                            stats.record_over_budget();
                            continue;
                        }

                        if page.depth < self.budget.max_depth {
                            for link in &page.links {
                                let queued =
                                    frontier.enqueue(link.clone(), page.depth + 1, pages.len() + 1);
                                if queued == EnqueueOutcome::CapReached
                                    && capped.insert(link.clone())
                                {
                                    tracing::debug!("Frontier full, dropping {}", link);
                                    stats.record_skip(&SkipReason::QueueCapExceeded);
                                }
                            }
                        }

                        stats.record_success();
                        pages.push(page);
                    }
                    FetchOutcome::Skipped { url, reason } => {
                        tracing::debug!("Skipped {}: {}", url, reason);
                        stats.record_skip(&reason);
                    }
                    FetchOutcome::Failed { url, error } => {
                        tracing::warn!("Failed {}: {}", url, error);
                        stats.record_failure();
                    }
                }
            }

            tracing::info!(
                "Progress: {}/{} pages collected, {} in frontier",
                pages.len(),
                max_pages,
                frontier.len()
            );

            let more_to_do = !frontier.is_empty() && pages.len() < max_pages;
            if more_to_do && !self.budget.politeness_delay.is_zero() {
                tokio::time::sleep(self.budget.politeness_delay).await;
            }
        }

        stats.robots_fetches = self.worker.robots_fetches();
        stats.elapsed = start_time.elapsed();
        self.phase = CrawlPhase::Completed;

        Ok(CrawlReport { pages, stats })
    }

    /// Fetches one batch concurrently and returns outcomes in completion order
    ///
    /// A task that panics is counted as a failure and does not disturb the
    /// rest of the batch.
    async fn dispatch(
        &self,
        batch: Vec<FrontierEntry>,
        stats: &mut CrawlStats,
    ) -> Vec<FetchOutcome> {
        let mut tasks = JoinSet::new();

        for entry in batch {
            let worker = Arc::clone(&self.worker);
            let semaphore = Arc::clone(&self.permits);

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return FetchOutcome::Failed {
                            url: entry.url,
                            error: FetchError::Worker(e.to_string()),
                        }
                    }
                };
                worker.fetch(entry).await
            });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!("Fetch task aborted: {}", e);
                    stats.record_failure();
                }
            }
        }

        outcomes
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for crawling. It will:
/// 1. Validate the budget and build the HTTP client
/// 2. Seed the frontier with the seed URL at depth 0
/// 3. Fetch, extract and follow same-host links batch by batch
/// 4. Log a statistics summary
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::{CrawlBudget, Settings};
/// use site_harvest::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let budget = CrawlBudget::from_settings("https://example.com", 2, 50, &Settings::default());
/// let report = crawl(budget).await?;
/// println!("collected {} pages", report.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(budget: CrawlBudget) -> Result<CrawlReport, HarvestError> {
    let mut crawler = Crawler::new(budget)?;
    let report = crawler.run().await?;
    report.stats.log_summary();
    Ok(report)
}
