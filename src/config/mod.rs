//! Configuration module for Site-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! settings file, and assembling the per-run [`CrawlBudget`].
//!
//! # Example
//!
//! ```no_run
//! use site_harvest::config::{load_settings, CrawlBudget};
//! use std::path::Path;
//!
//! let settings = load_settings(Path::new("harvest.toml")).unwrap();
//! let budget = CrawlBudget::from_settings("https://example.com/", 2, 100, &settings);
//! budget.validate().unwrap();
//! ```

mod budget;
mod parser;
mod types;
mod validation;

pub use budget::CrawlBudget;
pub use types::{CrawlerConfig, OutputConfig, ParsingConfig, ScrapingConfig, Settings};

pub use parser::{compute_config_hash, load_settings, load_settings_with_hash, parse_settings};
pub use validation::{validate, CONCURRENCY_RANGE, DEPTH_RANGE, MAX_PAGES_RANGE};
