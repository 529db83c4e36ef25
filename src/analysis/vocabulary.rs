//! Domain vocabulary of packaging components and conditions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::tokens::tokenize;

const DEFAULT_COMPONENTS: &[&str] = &[
    "bottle",
    "box",
    "design",
    "container",
    "seal",
    "cap",
    "lid",
    "package",
    "packaging",
    "paper",
    "plastic",
    "glass",
    "pack",
    "tape",
    "logo",
    "label",
    "protective",
    "bag",
    "envelope",
    "mold",
    "padding",
    "recyclable",
    "tin",
    "sachet",
    "jar",
    "pouch",
];

const DEFAULT_CONDITIONS: &[&str] = &[
    "mess",
    "damage",
    "expiration",
    "loose",
    "moldy",
    "crushed",
    "broken",
    "crack",
    "broke",
    "leak",
    "spill",
    "dent",
    "mold",
    "puncture",
];

/// Which list a vocabulary term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCategory {
    Component,
    Condition,
}

/// Flat component and condition term lists supplied at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainVocabulary {
    #[serde(default = "default_components")]
    pub components: Vec<String>,
    #[serde(default = "default_conditions")]
    pub conditions: Vec<String>,
}

fn default_components() -> Vec<String> {
    DEFAULT_COMPONENTS.iter().map(|s| s.to_string()).collect()
}

fn default_conditions() -> Vec<String> {
    DEFAULT_CONDITIONS.iter().map(|s| s.to_string()).collect()
}

impl Default for DomainVocabulary {
    fn default() -> Self {
        Self {
            components: default_components(),
            conditions: default_conditions(),
        }
    }
}

impl DomainVocabulary {
    /// Components then conditions, lowercased, first occurrence wins.
    pub fn terms(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.components
            .iter()
            .chain(self.conditions.iter())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect()
    }

    /// Category of a term; a term listed in both counts as a component.
    pub fn category(&self, term: &str) -> Option<TermCategory> {
        let term = term.to_lowercase();
        if self.components.iter().any(|c| c.eq_ignore_ascii_case(&term)) {
            Some(TermCategory::Component)
        } else if self.conditions.iter().any(|c| c.eq_ignore_ascii_case(&term)) {
            Some(TermCategory::Condition)
        } else {
            None
        }
    }

    /// Vocabulary terms that occur as whole tokens in `texts`, in vocabulary order.
    pub fn candidate_terms<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let observed: HashSet<String> = texts.into_iter().flat_map(tokenize).collect();
        self.terms()
            .into_iter()
            .filter(|t| observed.contains(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_terms_keep_order_and_drop_repeats() {
        let vocab = DomainVocabulary::default();
        let terms = vocab.terms();
        assert_eq!(terms.first().map(String::as_str), Some("bottle"));
        assert_eq!(terms.iter().filter(|t| *t == "mold").count(), 1);
        assert_eq!(terms.len(), 26 + 14 - 1);
    }

    #[test]
    fn test_category_prefers_component() {
        let vocab = DomainVocabulary::default();
        assert_eq!(vocab.category("Bottle"), Some(TermCategory::Component));
        assert_eq!(vocab.category("leak"), Some(TermCategory::Condition));
        assert_eq!(vocab.category("mold"), Some(TermCategory::Component));
        assert_eq!(vocab.category("detergent"), None);
    }

    #[test]
    fn test_candidate_terms_require_whole_tokens() {
        let vocab = DomainVocabulary::default();
        let terms = vocab.candidate_terms([
            "The box was crushed and it leaked",
            "Great LID design",
        ]);
        assert_eq!(terms, vec!["box", "design", "lid", "crushed"]);
    }

    #[test]
    fn test_candidate_terms_empty_batch() {
        assert!(DomainVocabulary::default()
            .candidate_terms(Vec::<&str>::new())
            .is_empty());
    }
}
