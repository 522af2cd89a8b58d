//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier of pending URLs with dedup and a soft growth cap
//! - HTTP fetching gated by robots.txt and exclude patterns
//! - HTML content and link extraction
//! - Batch coordination and crawl statistics

mod controller;
mod extractor;
mod fetcher;
mod frontier;
mod outcome;
mod stats;

pub use controller::{crawl, CrawlPhase, CrawlReport, Crawler};
pub use extractor::{normalize_whitespace, ExtractedContent, Extractor};
pub use fetcher::{build_http_client, FetchWorker};
pub use frontier::{EnqueueOutcome, Frontier, FrontierEntry};
pub use outcome::{FetchError, FetchOutcome, Page, SkipReason};
pub use stats::CrawlStats;
