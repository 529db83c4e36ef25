//! Lexicon-based sentiment labeling.
//!
//! Computes a VADER-style compound polarity in `[-1, 1]` and maps it onto a
//! three-way label. Any packaging-failure word forces a negative label no
//! matter how glowing the rest of the review is.

mod lexicon;

use serde::{Deserialize, Serialize};

use super::tokens::{mentions_any, tokenize};
use crate::models::Sentiment;
use lexicon::{valence, BOOSTERS_DOWN, BOOSTERS_UP, NEGATIONS};

const BOOST: f64 = 0.293;
const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZATION_ALPHA: f64 = 15.0;
const BOOST_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];

fn default_negative_override() -> Vec<String> {
    ["mess", "leak", "broken", "crack", "damage", "spill", "disappointed"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_positive_threshold() -> f64 {
    0.05
}

fn default_negative_threshold() -> f64 {
    -0.05
}

/// Polarity result for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    pub compound: f64,
    /// Whether a negative-override word decided the label.
    pub overridden: bool,
}

/// Three-way sentiment labeler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentLabeler {
    /// Words (and their inflections) that force a negative label.
    #[serde(default = "default_negative_override")]
    pub negative_override: Vec<String>,
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,
}

impl Default for SentimentLabeler {
    fn default() -> Self {
        Self {
            negative_override: default_negative_override(),
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
        }
    }
}

impl SentimentLabeler {
    pub fn label(&self, text: &str) -> Sentiment {
        self.analyze(text).label
    }

    pub fn analyze(&self, text: &str) -> SentimentScore {
        let tokens = sentiment_tokens(text);
        if tokens.is_empty() {
            return SentimentScore {
                label: Sentiment::Neutral,
                compound: 0.0,
                overridden: false,
            };
        }

        let compound = compound(&tokens);
        let overrides: Vec<&str> = self.negative_override.iter().map(String::as_str).collect();
        if mentions_any(&tokens, &overrides) {
            return SentimentScore {
                label: Sentiment::Negative,
                compound,
                overridden: true,
            };
        }

        let label = if compound >= self.positive_threshold {
            Sentiment::Positive
        } else if compound <= self.negative_threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        SentimentScore {
            label,
            compound,
            overridden: false,
        }
    }
}

/// Tokens with apostrophes folded so contractions stay whole (`didn't` -> `didnt`).
fn sentiment_tokens(text: &str) -> Vec<String> {
    tokenize(&text.replace(['\'', '\u{2019}'], ""))
}

fn compound(tokens: &[String]) -> f64 {
    let mut valences = vec![0.0; tokens.len()];

    for (i, token) in tokens.iter().enumerate() {
        let Some(mut v) = valence(token) else {
            continue;
        };

        for (dist, damping) in BOOST_DAMPING.iter().enumerate().map(|(d, f)| (d + 1, f)) {
            let Some(prev) = i.checked_sub(dist).map(|j| tokens[j].as_str()) else {
                break;
            };
            let mut scalar = if BOOSTERS_UP.contains(&prev) {
                BOOST
            } else if BOOSTERS_DOWN.contains(&prev) {
                -BOOST
            } else {
                0.0
            };
            if v < 0.0 {
                scalar = -scalar;
            }
            v += scalar * damping;
        }

        let negated = (1..=3)
            .filter_map(|d| i.checked_sub(d))
            .any(|j| NEGATIONS.contains(&tokens[j].as_str()));
        if negated {
            v *= NEGATION_SCALAR;
        }

        valences[i] = v;
    }

    if let Some(pivot) = tokens.iter().position(|t| t == "but") {
        for (i, v) in valences.iter_mut().enumerate() {
            if i < pivot {
                *v *= 0.5;
            } else if i > pivot {
                *v *= 1.5;
            }
        }
    }

    let sum: f64 = valences.iter().sum();
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
