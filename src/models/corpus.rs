//! Deduplicated review corpus.
//!
//! Records are keyed by a SHA-256 fingerprint of their normalized body. The
//! fingerprint set only ever grows, so admitting the same body twice is a
//! no-op. Records with an empty body carry no fingerprint and never take part
//! in deduplication.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{ProductInfo, ReviewRecord};
use crate::scrapers::CrawlWarning;

/// Fingerprint of a review body: trimmed, inner whitespace collapsed, hashed.
///
/// Returns `None` for bodies that are empty after trimming.
pub fn fingerprint(body: &str) -> Option<String> {
    let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    Some(hex::encode(hasher.finalize()))
}

/// Outcome of admitting a record that came from a keyword re-query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// New fingerprint, record appended with the term attached.
    Admitted,
    /// Fingerprint already present on an untagged record, which now carries the term.
    Tagged,
    /// Fingerprint already present on a record tagged by an earlier term.
    Duplicate,
    /// Empty body, nothing to key on.
    Unkeyed,
}

/// Ordered collection of reviews for one crawl.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub product: Option<ProductInfo>,
    pub records: Vec<ReviewRecord>,
    /// Candidate terms re-queried after the initial harvest, in search order.
    #[serde(default)]
    pub search_terms: Vec<String>,
    /// Number of records harvested before keyword re-queries began.
    #[serde(default)]
    pub initial_batch: usize,
    #[serde(default)]
    pub warnings: Vec<CrawlWarning>,
    #[serde(skip)]
    fingerprints: HashSet<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from records, dropping fingerprint duplicates and
    /// keeping empty-body records as-is.
    pub fn from_records(records: impl IntoIterator<Item = ReviewRecord>) -> Self {
        let mut corpus = Self::new();
        for record in records {
            if record.has_body() {
                corpus.admit(record);
            } else {
                corpus.keep_unkeyed(record);
            }
        }
        corpus
    }

    /// Admit a record if its body fingerprint is new.
    ///
    /// Returns `false` for empty bodies and for already-seen fingerprints; in
    /// both cases the corpus is left untouched.
    pub fn admit(&mut self, mut record: ReviewRecord) -> bool {
        let Some(key) = fingerprint(&record.body) else {
            return false;
        };
        if !self.fingerprints.insert(key.clone()) {
            return false;
        }
        record.fingerprint = Some(key);
        self.records.push(record);
        true
    }

    /// Admit a record surfaced by a keyword re-query and attach the term.
    ///
    /// A duplicate of an untagged record hands the term to the existing
    /// record instead, so every term that matched something leaves a trace.
    pub fn admit_tagged(&mut self, mut record: ReviewRecord, term: &str) -> Admission {
        let Some(key) = fingerprint(&record.body) else {
            return Admission::Unkeyed;
        };
        if self.fingerprints.contains(&key) {
            let existing = self
                .records
                .iter_mut()
                .find(|r| r.fingerprint.as_deref() == Some(key.as_str()));
            return match existing {
                Some(r) if r.search_term.is_none() => {
                    r.search_term = Some(term.to_string());
                    Admission::Tagged
                }
                _ => Admission::Duplicate,
            };
        }
        record.search_term = Some(term.to_string());
        self.admit(record);
        Admission::Admitted
    }

    /// Keep a record that has no fingerprint (empty body).
    pub fn keep_unkeyed(&mut self, mut record: ReviewRecord) {
        record.fingerprint = None;
        self.records.push(record);
    }

    pub fn contains_body(&self, body: &str) -> bool {
        fingerprint(body).is_some_and(|k| self.contains_fingerprint(&k))
    }

    pub fn contains_fingerprint(&self, key: &str) -> bool {
        self.fingerprints.contains(key)
    }

    pub fn fingerprint_count(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuild the fingerprint index after deserializing.
    pub fn reindex(&mut self) {
        self.fingerprints = self
            .records
            .iter_mut()
            .filter_map(|r| {
                r.fingerprint = fingerprint(&r.body);
                r.fingerprint.clone()
            })
            .collect();
    }

    /// Parse a corpus previously written as JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut corpus: Corpus = serde_json::from_str(json)?;
        corpus.reindex();
        Ok(corpus)
    }
}
