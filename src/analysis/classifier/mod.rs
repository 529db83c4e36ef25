//! Packaging relevance classifier.
//!
//! Four independent signals, each in `[0, 1]`, are weighted into a single
//! score:
//!
//! - keyword: vocabulary tokens present, with repeat and salience bonuses
//! - phrase: curated multi-word phrases with fixed weights
//! - structure: short packaging titles, shipping patterns, complaint framing
//! - sentiment context: polarity combined with packaging terms
//!
//! A review is packaging-related when the score reaches the table threshold.
//! Classification is pure: the same text, title, sentiment and table always
//! produce the same result.

mod table;

pub use table::{
    ClassifierTable, KeywordRules, SentimentContextRules, SignalWeights, StructureRules,
    TABLE_VERSION,
};

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::tokens::{mentions, tokenize};
use super::vocabulary::DomainVocabulary;
use crate::models::{ReviewRecord, Sentiment, SignalBreakdown};

/// Outcome of classifying one review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub is_packaging: bool,
    pub score: f64,
    pub confidence: f64,
    pub signals: SignalBreakdown,
    /// Vocabulary tokens found in the review, in order of first appearance.
    pub matched_terms: Vec<String>,
}

/// Weighted multi-signal packaging classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: ClassifierTable,
    vocabulary: HashSet<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierTable::default(), &DomainVocabulary::default())
    }
}

impl Classifier {
    /// Build a classifier whose keyword vocabulary is the domain terms, their
    /// synonym expansions and the table's extra packaging words.
    pub fn new(table: ClassifierTable, domain: &DomainVocabulary) -> Self {
        let mut vocabulary: HashSet<String> = HashSet::new();
        for term in domain.terms() {
            if let Some(expansions) = table.keyword.synonyms.get(&term) {
                vocabulary.extend(expansions.iter().map(|s| s.to_lowercase()));
            }
            vocabulary.insert(term);
        }
        vocabulary.extend(table.keyword.extra_terms.iter().map(|s| s.to_lowercase()));
        vocabulary.retain(|t| !t.is_empty() && !t.contains(char::is_whitespace));

        Self { table, vocabulary }
    }

    pub fn table(&self) -> &ClassifierTable {
        &self.table
    }

    pub fn classify_record(&self, record: &ReviewRecord) -> ClassificationResult {
        self.classify(&record.title, &record.body, record.sentiment)
    }

    pub fn classify(&self, title: &str, body: &str, sentiment: Sentiment) -> ClassificationResult {
        let full_text = format!("{} {}", title, body);
        let all_tokens = tokenize(&full_text);
        let title_tokens = tokenize(title);
        let body_tokens = tokenize(body);

        let (keyword, matched_terms) = self.keyword_score(&all_tokens);
        let signals = SignalBreakdown {
            keyword,
            phrase: self.phrase_score(&full_text),
            structure: self.structure_score(&title_tokens, &body_tokens),
            sentiment_context: self.sentiment_context_score(&body_tokens, sentiment),
        };

        let w = &self.table.weights;
        let score = (w.keyword * signals.keyword
            + w.phrase * signals.phrase
            + w.structure * signals.structure
            + w.sentiment_context * signals.sentiment_context)
            .clamp(0.0, 1.0);

        ClassificationResult {
            is_packaging: score >= self.table.threshold,
            score,
            confidence: score.min(1.0),
            signals,
            matched_terms,
        }
    }

    fn keyword_score(&self, tokens: &[String]) -> (f64, Vec<String>) {
        let rules = &self.table.keyword;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut matched: Vec<String> = Vec::new();
        for token in tokens.iter().filter(|t| self.vocabulary.contains(*t)) {
            let count = counts.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                matched.push(token.clone());
            }
            *count += 1;
        }

        let score: f64 = matched
            .iter()
            .map(|term| {
                let extra = counts[term.as_str()].saturating_sub(1) as f64;
                let mut s = rules.base + (extra * rules.per_extra_occurrence).min(rules.max_repeat_bonus);
                if rules.salient.iter().any(|t| t == term) {
                    s += rules.salient_bonus;
                }
                s
            })
            .sum();

        (score.min(1.0), matched)
    }

    fn phrase_score(&self, full_text: &str) -> f64 {
        let normalized = full_text
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let score: f64 = self
            .table
            .phrases
            .iter()
            .filter(|(phrase, _)| normalized.contains(phrase.as_str()))
            .map(|(_, weight)| weight)
            .sum();
        score.min(1.0)
    }

    fn structure_score(&self, title_tokens: &[String], body_tokens: &[String]) -> f64 {
        let rules = &self.table.structure;
        let mut score = 0.0;

        if !title_tokens.is_empty()
            && title_tokens.len() <= rules.short_title_max_tokens
            && rules.title_terms.iter().any(|t| mentions(title_tokens, t))
        {
            score += rules.title_bonus;
        }

        let patterns = rules
            .patterns
            .iter()
            .filter(|p| mentions(body_tokens, p))
            .count();
        score += patterns as f64 * rules.pattern_bonus;

        let complaint = rules
            .connectives
            .iter()
            .any(|c| body_tokens.iter().any(|t| t == c));
        if complaint && rules.complaint_terms.iter().any(|t| mentions(body_tokens, t)) {
            score += rules.complaint_bonus;
        }

        score.min(1.0)
    }

    fn sentiment_context_score(&self, body_tokens: &[String], sentiment: Sentiment) -> f64 {
        let rules = &self.table.sentiment_context;
        let (terms, bonus) = match sentiment {
            Sentiment::Negative => (&rules.negative_terms, rules.negative_bonus),
            Sentiment::Positive => (&rules.positive_terms, rules.positive_bonus),
            Sentiment::Neutral => return 0.0,
        };
        if terms.iter().any(|t| mentions(body_tokens, t)) {
            bonus.min(1.0)
        } else {
            0.0
        }
    }
}
