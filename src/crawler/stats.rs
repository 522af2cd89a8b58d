//! Crawl statistics
//!
//! Counters accumulated by the controller while a crawl runs, and the
//! summary logged when it finishes.

use crate::crawler::outcome::SkipReason;
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages collected into the result
    pub successful: usize,

    /// Skipped URLs keyed by [`SkipReason::label`]
    pub skipped: BTreeMap<&'static str, usize>,

    /// URLs that failed with a transport error
    pub failed: usize,

    /// Pages fetched successfully but dropped because the budget was already spent
    pub over_budget: usize,

    /// Number of batches dispatched
    pub batches: usize,

    /// robots.txt requests issued
    pub robots_fetches: usize,

    /// Wall time of the crawl
    pub elapsed: Duration,
}

impl CrawlStats {
    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.label()).or_insert(0) += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn record_over_budget(&mut self) {
        self.over_budget += 1;
    }

    pub fn record_batch(&mut self) {
        self.batches += 1;
    }

    /// Count of skips for one reason kind
    pub fn skipped_for(&self, reason: &SkipReason) -> usize {
        self.skipped.get(reason.label()).copied().unwrap_or(0)
    }

    /// Total skips over all reason kinds
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Every URL the crawl reached a verdict on
    pub fn total_processed(&self) -> usize {
        self.successful + self.total_skipped() + self.failed + self.over_budget
    }

    /// Success rate over processed URLs, in percent
    pub fn success_rate(&self) -> f64 {
        let processed = self.total_processed();
        if processed == 0 {
            0.0
        } else {
            (self.successful as f64 / processed as f64) * 100.0
        }
    }

    /// Logs the statistics at info level
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl completed: {} pages collected in {:.2?} ({} batches)",
            self.successful,
            self.elapsed,
            self.batches
        );

        if !self.skipped.is_empty() {
            let breakdown: Vec<String> = self
                .skipped
                .iter()
                .map(|(label, count)| format!("{}={}", label, count))
                .collect();
            tracing::info!(
                "Skipped: {} ({})",
                self.total_skipped(),
                breakdown.join(", ")
            );
        }

        if self.failed > 0 {
            tracing::info!("Failed: {}", self.failed);
        }

        if self.over_budget > 0 {
            tracing::info!("Dropped over budget: {}", self.over_budget);
        }

        tracing::info!(
            "robots.txt fetches: {}, success rate: {:.1}%",
            self.robots_fetches,
            self.success_rate()
        );
    }
}
