//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent, timeout and redirect limit
//! - robots.txt and exclude-pattern gating before any request goes out
//! - Status and Content-Type checks on the response
//! - Error classification into skips and transport failures

use crate::config::CrawlBudget;
use crate::crawler::extractor::Extractor;
use crate::crawler::frontier::FrontierEntry;
use crate::crawler::outcome::{FetchError, FetchOutcome, Page, SkipReason};
use crate::robots::RobotsCache;
use crate::url::UrlFilter;
use crate::ConfigError;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client, StatusCode};

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `budget` - The crawl budget (user agent, timeout, redirect limit)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::{CrawlBudget, Settings};
/// use site_harvest::crawler::build_http_client;
///
/// let budget = CrawlBudget::from_settings("https://example.com", 2, 50, &Settings::default());
/// let client = build_http_client(&budget).unwrap();
/// ```
pub fn build_http_client(budget: &CrawlBudget) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(budget.user_agent.as_str())
        .timeout(budget.request_timeout)
        .connect_timeout(budget.request_timeout)
        .redirect(Policy::limited(budget.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches and extracts single pages
///
/// One worker is shared (behind an `Arc`) by every task of a crawl. It holds
/// only read-only state plus the robots cache, which coalesces its own
/// lookups.
#[derive(Debug)]
pub struct FetchWorker {
    client: Client,
    robots: Option<RobotsCache>,
    filter: UrlFilter,
    extractor: Extractor,
    user_agent: String,
}

impl FetchWorker {
    /// Creates a worker for the given budget
    ///
    /// robots.txt lookups are disabled entirely when the budget does not
    /// respect robots.
    pub fn new(client: Client, budget: &CrawlBudget) -> Result<Self, ConfigError> {
        let robots = budget
            .respect_robots
            .then(|| RobotsCache::new(client.clone()));

        Ok(Self {
            client,
            robots,
            filter: UrlFilter::new(&budget.exclude_patterns),
            extractor: Extractor::new(&budget.noise_selectors, budget.clean_whitespace)?,
            user_agent: budget.user_agent.clone(),
        })
    }

    /// Number of robots.txt requests issued so far
    pub fn robots_fetches(&self) -> usize {
        self.robots.as_ref().map_or(0, RobotsCache::fetch_count)
    }

    /// Fetches a frontier entry
    ///
    /// # Request Flow
    ///
    /// | Step | Failure |
    /// |------|---------|
    /// | robots.txt check (when enabled) | Skipped: RobotsDisallowed |
    /// | Exclude-pattern check | Skipped: PatternExcluded |
    /// | GET request | Failed: Timeout / Connection / Transport |
    /// | Status is 200 | Skipped: HttpStatus |
    /// | Content-Type is text/html | Skipped: NotHtml |
    /// | Body decodes as text | Failed: Decode |
    ///
    /// Never panics on network input and never returns an error: every
    /// problem is folded into the outcome.
    pub async fn fetch(&self, entry: FrontierEntry) -> FetchOutcome {
        let FrontierEntry { url, depth } = entry;

        if let Some(robots) = &self.robots {
            if !robots.is_allowed(url.as_url(), &self.user_agent).await {
                tracing::debug!("Disallowed by robots.txt: {}", url);
                return FetchOutcome::Skipped {
                    url,
                    reason: SkipReason::RobotsDisallowed,
                };
            }
        }

        if !self.filter.is_allowed(url.as_str()) {
            tracing::debug!("Excluded by pattern: {}", url);
            return FetchOutcome::Skipped {
                url,
                reason: SkipReason::PatternExcluded,
            };
        }

        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = FetchError::from_reqwest(&e);
                tracing::warn!("Failed to fetch {}: {}", url, error);
                return FetchOutcome::Failed { url, error };
            }
        };

        let fetched_at = Utc::now();
        let status = response.status();

        if status != StatusCode::OK {
            tracing::warn!("HTTP {} for {}", status.as_u16(), url);
            return FetchOutcome::Skipped {
                url,
                reason: SkipReason::HttpStatus(status.as_u16()),
            };
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            tracing::debug!("Non-HTML content at {}: {:?}", url, content_type);
            return FetchOutcome::Skipped {
                url,
                reason: SkipReason::NotHtml(content_type),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let error = FetchError::Decode(e.to_string());
                tracing::warn!("Failed to read body of {}: {}", url, error);
                return FetchOutcome::Failed { url, error };
            }
        };

        let extracted = self.extractor.extract(&body, url.as_url());
        tracing::debug!(
            "Fetched {} (depth {}, {} chars, {} links)",
            url,
            depth,
            extracted.text.len(),
            extracted.links.len()
        );

        FetchOutcome::Success(Page {
            url,
            title: extracted.title,
            content: extracted.text,
            status_code: status.as_u16(),
            fetched_at,
            depth,
            links: extracted.links,
        })
    }
}

fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}
