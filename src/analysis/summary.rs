//! Summary statistics over a finished corpus.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tokens::{mentions, mentions_any, tokenize};
use super::vocabulary::DomainVocabulary;
use crate::models::{Corpus, ReviewRecord, Sentiment};

/// Packaging confidence at or above which a review counts as high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.7;
/// Packaging confidence below which a review counts as low confidence.
pub const LOW_CONFIDENCE: f64 = 0.5;
/// Share (percent) one polarity needs before it becomes the overall sentiment.
pub const OVERALL_SENTIMENT_SHARE: f64 = 60.0;

const ISSUE_CATEGORIES: &[(&str, &[&str])] = &[
    ("damage", &["damage", "broken", "crack", "crushed", "dent"]),
    ("leakage", &["leak", "spill", "mess"]),
    ("packaging_quality", &["poor", "cheap", "flimsy", "weak", "thin"]),
    ("arrival_condition", &["arrived", "delivery", "shipping", "package"]),
    ("seal_issues", &["seal", "unsealed", "open"]),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    fn tally<'a>(records: impl IntoIterator<Item = &'a ReviewRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Neutral => counts.neutral += 1,
                Sentiment::Negative => counts.negative += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Positive if more than 60% positive, negative if more than 60% negative.
    pub fn overall(&self) -> Sentiment {
        let total = self.total();
        if total == 0 {
            return Sentiment::Neutral;
        }
        if percentage(self.positive, total) > OVERALL_SENTIMENT_SHARE {
            Sentiment::Positive
        } else if percentage(self.negative, total) > OVERALL_SENTIMENT_SHARE {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCount {
    pub issue: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoOccurrence {
    pub component: String,
    pub condition: String,
    pub count: usize,
}

/// Aggregate statistics for a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_reviews: usize,
    pub packaging_reviews: usize,
    pub non_packaging_reviews: usize,
    pub packaging_percentage: f64,
    pub sentiment: SentimentCounts,
    pub overall_sentiment: Sentiment,
    pub packaging_sentiment: SentimentCounts,
    pub avg_packaging_confidence: f64,
    pub avg_non_packaging_confidence: f64,
    pub high_confidence_packaging: usize,
    pub low_confidence_packaging: usize,
    /// Issue categories among packaging reviews, most frequent first.
    pub common_issues: Vec<IssueCount>,
    /// Distinct search terms that surfaced packaging reviews.
    pub keywords_found: Vec<String>,
    /// Search term to the images of the reviews it surfaced.
    pub keyword_images: BTreeMap<String, Vec<String>>,
    /// Component and condition pairs mentioned together in packaging reviews.
    pub co_occurrence: Vec<CoOccurrence>,
}

/// Summarize a corpus. Total: an empty corpus yields all-zero statistics.
pub fn summarize(corpus: &Corpus, vocabulary: &DomainVocabulary) -> CorpusSummary {
    summarize_records(&corpus.records, vocabulary)
}

pub fn summarize_records(records: &[ReviewRecord], vocabulary: &DomainVocabulary) -> CorpusSummary {
    let (packaging, other): (Vec<&ReviewRecord>, Vec<&ReviewRecord>) =
        records.iter().partition(|r| r.is_packaging);

    let packaging_confidences: Vec<f64> =
        packaging.iter().map(|r| r.packaging_confidence).collect();
    let sentiment = SentimentCounts::tally(records);

    let mut keywords_found: Vec<String> = Vec::new();
    let mut keyword_images: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in &packaging {
        if let Some(term) = &record.search_term {
            if !keywords_found.contains(term) {
                keywords_found.push(term.clone());
            }
            if !record.images.is_empty() {
                keyword_images
                    .entry(term.clone())
                    .or_default()
                    .extend(record.images.iter().cloned());
            }
        }
    }

    CorpusSummary {
        total_reviews: records.len(),
        packaging_reviews: packaging.len(),
        non_packaging_reviews: other.len(),
        packaging_percentage: percentage(packaging.len(), records.len()),
        sentiment,
        overall_sentiment: sentiment.overall(),
        packaging_sentiment: SentimentCounts::tally(packaging.iter().copied()),
        avg_packaging_confidence: mean(&packaging_confidences),
        avg_non_packaging_confidence: mean(
            &other.iter().map(|r| r.packaging_confidence).collect::<Vec<_>>(),
        ),
        high_confidence_packaging: packaging_confidences
            .iter()
            .filter(|c| **c >= HIGH_CONFIDENCE)
            .count(),
        low_confidence_packaging: packaging_confidences
            .iter()
            .filter(|c| **c < LOW_CONFIDENCE)
            .count(),
        common_issues: common_issues(&packaging),
        keywords_found,
        keyword_images,
        co_occurrence: co_occurrence(&packaging, vocabulary),
    }
}

fn common_issues(packaging: &[&ReviewRecord]) -> Vec<IssueCount> {
    let token_sets: Vec<Vec<String>> = packaging.iter().map(|r| tokenize(&r.body)).collect();
    let mut issues: Vec<IssueCount> = ISSUE_CATEGORIES
        .iter()
        .map(|(issue, keywords)| IssueCount {
            issue: issue.to_string(),
            count: token_sets
                .iter()
                .filter(|tokens| mentions_any(tokens, keywords))
                .count(),
        })
        .filter(|i| i.count > 0)
        .collect();
    // Stable sort keeps category order for ties.
    issues.sort_by(|a, b| b.count.cmp(&a.count));
    issues
}

fn co_occurrence(packaging: &[&ReviewRecord], vocabulary: &DomainVocabulary) -> Vec<CoOccurrence> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for record in packaging {
        let tokens = tokenize(&record.full_text());
        let components: Vec<&String> = vocabulary
            .components
            .iter()
            .filter(|c| mentions(&tokens, &c.to_lowercase()))
            .collect();
        let conditions: Vec<&String> = vocabulary
            .conditions
            .iter()
            .filter(|c| mentions(&tokens, &c.to_lowercase()))
            .collect();
        for component in &components {
            for condition in &conditions {
                if component != condition {
                    *counts
                        .entry(((*component).clone(), (*condition).clone()))
                        .or_insert(0) += 1;
                }
            }
        }
    }

    let mut pairs: Vec<CoOccurrence> = counts
        .into_iter()
        .map(|((component, condition), count)| CoOccurrence {
            component,
            condition,
            count,
        })
        .collect();
    pairs.sort_by(|a, b| b.count.cmp(&a.count));
    pairs
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
