//! URL handling module for Site-Harvest
//!
//! This module provides URL canonicalization (the crawl's identity for
//! deduplication), origin derivation for robots.txt scoping, and the static
//! exclude-pattern filter.

mod canonical;
mod filter;
mod origin;

pub use canonical::CanonicalUrl;
pub use filter::UrlFilter;
pub use origin::{origin_of, same_host, site_name};
