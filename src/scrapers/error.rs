//! Error and warning types for crawling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the browser automation layer.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser support not compiled; rebuild with --features browser")]
    NotAvailable,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("browser protocol error: {0}")]
    Protocol(String),
}

/// Sign-in could not be completed. Fatal for a crawl.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign-in form unavailable: {0} did not appear in time")]
    FormUnavailable(&'static str),

    #[error("credentials rejected: {0}")]
    Rejected(String),

    #[error("bot challenge still present after retrying submission")]
    ChallengeUnresolved,

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// The product URL cannot be turned into a review listing.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid product URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no product identifier found in '{0}'")]
    MissingProductId(String),
}

/// Errors that abort a crawl before any review is harvested.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}

/// Non-fatal problem absorbed during a crawl and kept on the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrawlWarning {
    #[error("review {index} on {page}: no {field} found")]
    Extraction {
        page: String,
        index: usize,
        field: String,
    },

    #[error("all URL variants failed for image {url}")]
    ImageFetch { url: String },

    #[error("no review search control for '{term}', filtered initial batch instead")]
    SearchControlNotFound { term: String },

    #[error("re-query for '{term}' aborted: {reason}")]
    TermAborted { term: String, reason: String },
}
