//! Walks the FRED category tree collecting every series.

use std::collections::HashSet;

use almanac_types::{Category, Result, SeriesMetadata};
use async_trait::async_trait;
use tracing::{info, warn};

/// Checkpoint interval used by the CLI when none is given.
pub const DEFAULT_CHECKPOINT_EVERY: usize = 10_000;

/// Source of category tree data. Implemented by [`FredClient`](crate::FredClient).
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Series attached directly to a category.
    async fn category_series(&self, category_id: u64) -> Result<Vec<SeriesMetadata>>;

    /// Direct children of a category.
    async fn category_children(&self, category_id: u64) -> Result<Vec<Category>>;
}

/// Outcome of visiting one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStep {
    /// The category that was visited.
    pub category_id: u64,
    /// New (previously unseen) series found in this category.
    pub added: usize,
    /// Total distinct series collected so far.
    pub total: usize,
    /// Subcategories queued for a visit.
    pub children: Vec<Category>,
    /// Requests for this category that failed and were skipped.
    pub failed: usize,
    /// True when the total crossed a checkpoint boundary at this step.
    pub checkpoint: bool,
}

/// Summary of a finished crawl.
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Every distinct series found, in discovery order.
    pub series: Vec<SeriesMetadata>,
    /// Number of categories visited.
    pub categories_visited: usize,
    /// Number of requests that failed and were skipped.
    pub requests_failed: usize,
}

/// Depth-first crawler over the category tree.
///
/// Driven one category at a time through [`step`](Self::step) so callers can
/// report progress and persist checkpoints between requests. Request spacing
/// is handled by the underlying HTTP client.
#[derive(Debug)]
pub struct Crawler<'a, S> {
    source: &'a S,
    pending: Vec<u64>,
    visited: HashSet<u64>,
    seen_series: HashSet<String>,
    series: Vec<SeriesMetadata>,
    requests_failed: usize,
    checkpoint_every: usize,
    checkpoints_passed: usize,
}

impl<'a, S: CategorySource> Crawler<'a, S> {
    /// Creates a crawler starting at `root` (`0` is the FRED root category).
    #[must_use]
    pub fn new(source: &'a S, root: u64) -> Self {
        Self {
            source,
            pending: vec![root],
            visited: HashSet::new(),
            seen_series: HashSet::new(),
            series: Vec::new(),
            requests_failed: 0,
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            checkpoints_passed: 0,
        }
    }

    /// Sets how many series are collected between checkpoints.
    #[must_use]
    pub fn with_checkpoint_every(mut self, every: usize) -> Self {
        self.checkpoint_every = every.max(1);
        self
    }

    /// Series collected so far.
    #[must_use]
    pub fn series(&self) -> &[SeriesMetadata] {
        &self.series
    }

    /// Number of categories waiting to be visited.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Visits the next category, or returns `None` once the tree is exhausted.
    ///
    /// Failed requests are logged and counted; they never stop the crawl.
    pub async fn step(&mut self) -> Option<CrawlStep> {
        let category_id = loop {
            let id = self.pending.pop()?;
            if self.visited.insert(id) {
                break id;
            }
        };

        let mut added = 0;
        let mut failed = 0;

        match self.source.category_series(category_id).await {
            Ok(found) => {
                for meta in found {
                    if self.seen_series.insert(meta.id.clone()) {
                        self.series.push(meta);
                        added += 1;
                    }
                }
                if added > 0 {
                    info!(category_id, added, total = self.series.len(), "Collected series");
                }
            }
            Err(e) => {
                warn!(category_id, error = %e, "Skipping series of category");
                failed += 1;
            }
        }

        let children = match self.source.category_children(category_id).await {
            Ok(children) => children,
            Err(e) => {
                warn!(category_id, error = %e, "Skipping subcategories");
                failed += 1;
                Vec::new()
            }
        };
        // Reverse so the first child is visited next (pre-order).
        for child in children.iter().rev() {
            if !self.visited.contains(&child.id) {
                self.pending.push(child.id);
            }
        }

        self.requests_failed += failed;

        let passed = self.series.len() / self.checkpoint_every;
        let checkpoint = passed > self.checkpoints_passed;
        self.checkpoints_passed = passed;

        Some(CrawlStep {
            category_id,
            added,
            total: self.series.len(),
            children,
            failed,
            checkpoint,
        })
    }

    /// Runs the crawl to completion.
    pub async fn run(mut self) -> CrawlReport {
        while self.step().await.is_some() {}
        self.into_report()
    }

    /// Consumes the crawler and returns what was collected.
    #[must_use]
    pub fn into_report(self) -> CrawlReport {
        CrawlReport {
            series: self.series,
            categories_visited: self.visited.len(),
            requests_failed: self.requests_failed,
        }
    }
}
