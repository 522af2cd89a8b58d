//! Crawl frontier
//!
//! This module handles:
//! - FIFO queue of pending (url, depth) entries
//! - At-most-once scheduling of each canonical URL
//! - Soft cap on queue growth relative to the page budget

use crate::url::CanonicalUrl;
use std::collections::{HashSet, VecDeque};

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL to fetch
    pub url: CanonicalUrl,

    /// Link depth from the seed (seed is 0)
    pub depth: u32,
}

/// What happened to an enqueue request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Entry added to the queue
    Queued,

    /// URL was scheduled earlier in this crawl
    AlreadyScheduled,

    /// Queue is at its soft cap; URL was not marked as scheduled
    CapReached,
}

/// Pending work queue plus the set of URLs ever scheduled
///
/// Owned by the crawl controller; workers never touch it, so no locking is
/// needed around the dedup-then-insert sequence.
#[derive(Debug)]
pub struct Frontier {
    /// Pending entries in insertion order
    queue: VecDeque<FrontierEntry>,

    /// Every URL that has been placed in the queue
    scheduled: HashSet<CanonicalUrl>,

    /// Upper bound for pending plus collected
    cap: usize,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `cap` - Pending entries plus collected pages must stay below this
    pub fn new(cap: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            scheduled: HashSet::new(),
            cap,
        }
    }

    /// Adds a URL unless it was already scheduled or the queue is full
    ///
    /// # Arguments
    ///
    /// * `url` - Canonical URL to schedule
    /// * `depth` - Its link depth
    /// * `collected` - Pages collected so far, counted against the cap
    pub fn enqueue(&mut self, url: CanonicalUrl, depth: u32, collected: usize) -> EnqueueOutcome {
        if self.scheduled.contains(&url) {
            return EnqueueOutcome::AlreadyScheduled;
        }

        if self.queue.len().saturating_add(collected) >= self.cap {
            return EnqueueOutcome::CapReached;
        }

        self.scheduled.insert(url.clone());
        self.queue.push_back(FrontierEntry { url, depth });
        EnqueueOutcome::Queued
    }

    /// Removes up to `n` entries from the front of the queue
    pub fn dequeue_batch(&mut self, n: usize) -> Vec<FrontierEntry> {
        let n = n.min(self.queue.len());
        self.queue.drain(..n).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Number of distinct URLs ever scheduled
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.len()
    }

    /// Whether the URL has been scheduled in this crawl
    pub fn was_scheduled(&self, url: &CanonicalUrl) -> bool {
        self.scheduled.contains(url)
    }
}
