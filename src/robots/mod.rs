//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Robots handling is fail-open: anything other than a readable 200 response
//! is treated as "no rules".

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::RobotsPolicy;

use reqwest::{Client, StatusCode};

/// Fetches and parses robots.txt for an origin
///
/// # Arguments
///
/// * `client` - The HTTP client (carries the crawler's user agent and timeout)
/// * `origin` - The origin, e.g. `"https://example.com"`
///
/// # Returns
///
/// The parsed policy, or [`RobotsPolicy::AllowAll`] on any failure
pub async fn fetch_robots(client: &Client, origin: &str) -> RobotsPolicy {
    let robots_url = format!("{}/robots.txt", origin.trim_end_matches('/'));

    let response = match client.get(&robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt fetch failed for {}: {}", robots_url, e);
            return RobotsPolicy::AllowAll;
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(
            "robots.txt at {} returned HTTP {}, allowing all",
            robots_url,
            response.status().as_u16()
        );
        return RobotsPolicy::AllowAll;
    }

    match response.text().await {
        Ok(body) => RobotsPolicy::from_content(&body),
        Err(e) => {
            tracing::debug!("robots.txt body unreadable at {}: {}", robots_url, e);
            RobotsPolicy::AllowAll
        }
    }
}
