//! Crawl configuration types.
//!
//! These structs define the configurable behavior of a review crawl: batch
//! sizes, optional caps and every wait the crawler makes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Crawl behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlSettings {
    /// Maximum records harvested before keyword re-queries begin.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Only re-query this many candidate terms (vocabulary order).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_terms: Option<usize>,

    /// Stop paginating a re-query after this many pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages_per_term: Option<usize>,

    /// Read the product name and main image before crawling reviews.
    #[serde(default = "default_true")]
    pub fetch_product: bool,

    #[serde(default)]
    pub timings: CrawlTimings,
}

fn default_batch_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_terms: None,
            max_pages_per_term: None,
            fetch_product: true,
            timings: CrawlTimings::default(),
        }
    }
}

/// Every wait the crawler makes, in milliseconds.
///
/// Fixed settle delays follow navigations and submissions; bounded waits poll
/// the page for a marker every `poll_interval_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlTimings {
    /// Settle delay after navigation, clicks and search submission.
    pub settle_ms: u64,
    /// Settle delay after submitting the password form.
    pub sign_in_settle_ms: u64,
    /// Pause between scroll steps while the page grows.
    pub scroll_pause_ms: u64,
    /// Upper bound on scroll steps per page.
    pub max_scroll_rounds: usize,
    /// Bounded wait for sign-in form fields.
    pub element_wait_ms: u64,
    /// Bounded wait for the review list to render.
    pub review_wait_ms: u64,
    /// Bounded wait for a bot challenge to be cleared.
    pub challenge_wait_ms: u64,
    /// Bounded wait for an image overlay to open.
    pub modal_wait_ms: u64,
    /// Delay after an overlay opens or closes.
    pub modal_settle_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for CrawlTimings {
    fn default() -> Self {
        Self {
            settle_ms: 3_000,
            sign_in_settle_ms: 5_000,
            scroll_pause_ms: 2_000,
            max_scroll_rounds: 10,
            element_wait_ms: 30_000,
            review_wait_ms: 30_000,
            challenge_wait_ms: 60_000,
            modal_wait_ms: 10_000,
            modal_settle_ms: 2_000,
            poll_interval_ms: 500,
        }
    }
}

impl CrawlTimings {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn sign_in_settle(&self) -> Duration {
        Duration::from_millis(self.sign_in_settle_ms)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn element_wait(&self) -> Duration {
        Duration::from_millis(self.element_wait_ms)
    }

    pub fn review_wait(&self) -> Duration {
        Duration::from_millis(self.review_wait_ms)
    }

    pub fn challenge_wait(&self) -> Duration {
        Duration::from_millis(self.challenge_wait_ms)
    }

    pub fn modal_wait(&self) -> Duration {
        Duration::from_millis(self.modal_wait_ms)
    }

    pub fn modal_settle(&self) -> Duration {
        Duration::from_millis(self.modal_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Near-zero waits for driving scripted pages in tests.
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            settle_ms: 0,
            sign_in_settle_ms: 0,
            scroll_pause_ms: 0,
            max_scroll_rounds: 3,
            element_wait_ms: 20,
            review_wait_ms: 20,
            challenge_wait_ms: 20,
            modal_wait_ms: 20,
            modal_settle_ms: 0,
            poll_interval_ms: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_timings_keep_defaults() {
        let settings: CrawlSettings =
            toml::from_str("batch_size = 20\n[timings]\nsettle_ms = 10\n").unwrap();
        assert_eq!(settings.batch_size, 20);
        assert_eq!(settings.timings.settle(), Duration::from_millis(10));
        assert_eq!(settings.timings.challenge_wait(), Duration::from_secs(60));
        assert!(settings.fetch_product);
    }
}
