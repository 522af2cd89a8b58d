use crate::url::CanonicalUrl;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// A successfully fetched and extracted page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Canonical URL the page was requested under
    pub url: CanonicalUrl,

    /// Page title (may be empty)
    pub title: String,

    /// Extracted visible text
    pub content: String,

    /// HTTP status of the final response
    pub status_code: u16,

    /// When the response was received
    pub fetched_at: DateTime<Utc>,

    /// Link depth from the seed
    pub depth: u32,

    /// Same-host links discovered on the page
    pub links: Vec<CanonicalUrl>,
}

/// Why a URL was not turned into a page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// robots.txt disallows the path for our agent
    RobotsDisallowed,

    /// URL matched an exclude pattern
    PatternExcluded,

    /// Response status was not 200
    HttpStatus(u16),

    /// Response Content-Type was not HTML
    NotHtml(String),

    /// Link dropped because the frontier hit its soft cap
    QueueCapExceeded,
}

impl SkipReason {
    /// Short stable label used in logs and statistics
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::RobotsDisallowed => "robots_disallowed",
            SkipReason::PatternExcluded => "pattern_excluded",
            SkipReason::HttpStatus(_) => "http_status",
            SkipReason::NotHtml(_) => "not_html",
            SkipReason::QueueCapExceeded => "queue_cap_exceeded",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RobotsDisallowed => write!(f, "disallowed by robots.txt"),
            SkipReason::PatternExcluded => write!(f, "matched exclude pattern"),
            SkipReason::HttpStatus(code) => write!(f, "HTTP status {}", code),
            SkipReason::NotHtml(content_type) if content_type.is_empty() => {
                write!(f, "missing content type")
            }
            SkipReason::NotHtml(content_type) => write!(f, "non-HTML content ({})", content_type),
            SkipReason::QueueCapExceeded => write!(f, "frontier cap reached"),
        }
    }
}

/// Transport-level failure while fetching a page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("fetch task aborted: {0}")]
    Worker(String),
}

impl FetchError {
    /// Classifies a reqwest error
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connection(error.to_string())
        } else if error.is_decode() || error.is_body() {
            FetchError::Decode(error.to_string())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

/// Result of fetching a single frontier entry
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Page fetched and extracted
    Success(Page),

    /// URL deliberately not turned into a page
    Skipped { url: CanonicalUrl, reason: SkipReason },

    /// Fetch failed at the transport level
    Failed { url: CanonicalUrl, error: FetchError },
}

impl FetchOutcome {
    /// URL this outcome is about
    pub fn url(&self) -> &CanonicalUrl {
        match self {
            FetchOutcome::Success(page) => &page.url,
            FetchOutcome::Skipped { url, .. } => url,
            FetchOutcome::Failed { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}
