use crate::config::types::Settings;
use crate::config::validation::validate_budget;
use crate::ConfigError;
use std::time::Duration;

/// Immutable configuration for one crawl run
///
/// Built once before the crawl starts and shared read-only with every
/// fetch worker.
#[derive(Debug, Clone)]
pub struct CrawlBudget {
    /// Seed URL the crawl starts from (depth 0)
    pub seed_url: String,

    /// Maximum link depth from the seed (1-10)
    pub max_depth: u32,

    /// Maximum number of pages collected (1-1000)
    pub max_pages: usize,

    /// Maximum fetches in flight per batch
    pub concurrency: usize,

    /// Pause between batches
    pub politeness_delay: Duration,

    /// User-Agent header and robots.txt agent
    pub user_agent: String,

    /// Exclude patterns (`*.ext` or substrings)
    pub exclude_patterns: Vec<String>,

    /// Whether robots.txt rules are enforced
    pub respect_robots: bool,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Maximum redirects followed per request
    pub max_redirects: usize,

    /// Frontier soft cap multiplier
    pub queue_growth_factor: usize,

    /// CSS selectors of noise regions removed before text extraction
    pub noise_selectors: Vec<String>,

    /// Whether extracted text gets whitespace normalization
    pub clean_whitespace: bool,
}

impl CrawlBudget {
    /// Builds a budget from the settings file plus the per-run limits
    ///
    /// # Arguments
    ///
    /// * `seed_url` - Where the crawl starts
    /// * `max_depth` - Maximum link depth
    /// * `max_pages` - Maximum pages collected
    /// * `settings` - Loaded (or default) settings
    pub fn from_settings(
        seed_url: impl Into<String>,
        max_depth: u32,
        max_pages: usize,
        settings: &Settings,
    ) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_depth,
            max_pages,
            concurrency: settings.crawler.concurrent,
            politeness_delay: Duration::try_from_secs_f64(settings.crawler.delay)
                .unwrap_or(Duration::ZERO),
            user_agent: settings.scraping.user_agent.clone(),
            exclude_patterns: settings.scraping.exclude_patterns.clone(),
            respect_robots: settings.scraping.respect_robots_txt,
            request_timeout: Duration::from_secs(settings.scraping.timeout),
            max_redirects: settings.scraping.max_redirects,
            queue_growth_factor: settings.crawler.queue_growth_factor,
            noise_selectors: settings.parsing.remove_elements.clone(),
            clean_whitespace: settings.parsing.clean_whitespace,
        }
    }

    /// Overrides the politeness delay, given in seconds
    ///
    /// Negative, non-finite, or overflowing values are a validation error.
    pub fn with_delay_secs(mut self, seconds: f64) -> Result<Self, ConfigError> {
        self.politeness_delay = Duration::try_from_secs_f64(seconds).map_err(|_| {
            ConfigError::Validation(format!(
                "delay must be a non-negative number of seconds, got {}",
                seconds
            ))
        })?;
        Ok(self)
    }

    /// Overrides the per-batch concurrency
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Frontier soft cap: pending plus collected pages stay below this
    pub fn frontier_cap(&self) -> usize {
        self.queue_growth_factor.saturating_mul(self.max_pages)
    }

    /// Validates the budget limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_budget(self)
    }
}
