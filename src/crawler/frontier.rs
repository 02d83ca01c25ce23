//! Breadth-first crawl frontier
//!
//! The frontier owns both the FIFO queue and the visited set, so the
//! check-then-insert that guards against double enqueues is a single method
//! call on a value with exactly one owner.

use crate::url::CanonicalUrl;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched, with its link depth from the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    pub url: CanonicalUrl,
    pub depth: u32,
}

/// FIFO queue plus visited set for one crawl run
///
/// A URL enters the visited set when it is enqueued, not when it is dequeued.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    visited: HashSet<CanonicalUrl>,
}

impl Frontier {
    /// Creates a frontier seeded with the base URL at depth 0
    pub fn seeded(base: CanonicalUrl) -> Self {
        let mut frontier = Self::default();
        frontier.push_new(base, 0);
        frontier
    }

    /// Enqueues `url` at `depth` unless it was ever enqueued before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now queued
    /// * `false` - The URL was already visited; nothing changed
    pub fn push_new(&mut self, url: CanonicalUrl, depth: u32) -> bool {
        if !self.visited.insert(url.clone()) {
            return false;
        }
        self.queue.push_back(QueuedUrl { url, depth });
        true
    }

    /// Removes the oldest queued URL
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    /// Returns the number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns whether a URL was ever enqueued
    pub fn was_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }
}
