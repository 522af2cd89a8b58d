//! Per-origin robots.txt cache
//!
//! Each origin gets one [`OnceCell`] slot. The first worker that needs an
//! origin's policy runs the fetch inside the cell; concurrent workers asking
//! for the same origin await that same initialization instead of issuing a
//! second request.

use crate::robots::{fetch_robots, RobotsPolicy};
use crate::url::origin_of;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use url::Url;

type PolicySlot = Arc<OnceCell<RobotsPolicy>>;

/// Robots.txt policy cache shared by all fetch workers of one crawl
#[derive(Debug)]
pub struct RobotsCache {
    client: Client,
    entries: Mutex<HashMap<String, PolicySlot>>,
    fetches: AtomicUsize,
}

impl RobotsCache {
    /// Creates an empty cache that fetches robots.txt with the given client
    pub fn new(client: Client) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Checks if a URL is allowed according to its origin's robots.txt
    ///
    /// The origin's robots.txt is fetched at most once per crawl. Any failure
    /// along the way (opaque origin, network error, non-200, undecodable body)
    /// resolves to allow.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to check
    /// * `user_agent` - The user agent string
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub async fn is_allowed(&self, url: &Url, user_agent: &str) -> bool {
        let Some(origin) = origin_of(url) else {
            return true;
        };

        let policy = self.policy_for(&origin).await;
        policy.is_allowed(url.as_str(), user_agent)
    }

    /// Returns the cached policy for an origin, fetching it on first use
    pub async fn policy_for(&self, origin: &str) -> RobotsPolicy {
        let slot = self.slot(origin);

        slot.get_or_init(|| async {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Fetching robots.txt for origin: {}", origin);
            fetch_robots(&self.client, origin).await
        })
        .await
        .clone()
    }

    /// Number of robots.txt fetches issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Number of origins with a cache slot
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Returns true if no origin has been looked up yet
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    fn slot(&self, origin: &str) -> PolicySlot {
        let mut entries = self.lock_entries();
        entries.entry(origin.to_string()).or_default().clone()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, PolicySlot>> {
        // The map holds no invariant a panicking holder could break
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
