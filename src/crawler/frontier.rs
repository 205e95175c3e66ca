//! Crawl frontier
//!
//! An explicit FIFO worklist, so a crawl is breadth-first from the seed:
//! pages are fetched in the order their links were first discovered.
//!
//! Invariants:
//! - a URL is never both visited and pending
//! - a URL is pending at most once
//! - the visited set never grows past `max_pages`

use std::collections::{BTreeSet, HashSet, VecDeque};

/// Visited and pending URLs of one crawl invocation
#[derive(Debug)]
pub struct CrawlFrontier {
    visited: BTreeSet<String>,
    pending: VecDeque<String>,
    queued: HashSet<String>,
    max_pages: usize,
}

impl CrawlFrontier {
    /// Creates a frontier seeded with a single URL
    pub fn new(seed: impl Into<String>, max_pages: usize) -> Self {
        let mut frontier = Self {
            visited: BTreeSet::new(),
            pending: VecDeque::new(),
            queued: HashSet::new(),
            max_pages,
        };
        frontier.enqueue(seed);
        frontier
    }

    /// Adds a URL to the back of the worklist
    ///
    /// Returns false if it was already visited or already pending.
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Takes the oldest pending URL, or None when the crawl must stop
    ///
    /// The crawl stops when nothing is pending or the page budget is spent.
    pub fn next(&mut self) -> Option<String> {
        if self.is_full() {
            return None;
        }
        let url = self.pending.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records a URL as visited; it counts against the page budget
    ///
    /// Returns false if the URL had already been visited.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Returns true once `max_pages` URLs have been visited
    pub fn is_full(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Consumes the frontier, returning the visited set (sorted)
    pub fn into_visited(self) -> BTreeSet<String> {
        self.visited
    }
}
