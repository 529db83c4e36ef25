//! Review records harvested from a product's review pages.

use serde::{Deserialize, Serialize};

/// Polarity label attached to every review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-signal sub-scores behind a packaging classification, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub keyword: f64,
    pub phrase: f64,
    pub structure: f64,
    pub sentiment_context: f64,
}

/// A single customer review.
///
/// Created by the page extractor with only the harvested fields populated,
/// admitted into a [`Corpus`](super::Corpus), then annotated with sentiment
/// and packaging classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub title: String,
    pub body: String,
    /// Star rating in `[0, 5]`, absent when the page showed none.
    pub rating: Option<f32>,
    pub reviewer: String,
    pub date: String,
    pub verified: bool,
    /// Local filenames of downloaded review images, in discovery order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Keyword whose re-query surfaced this review.
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub is_packaging: bool,
    #[serde(default)]
    pub packaging_score: f64,
    #[serde(default)]
    pub packaging_confidence: f64,
    #[serde(default)]
    pub sentiment: Sentiment,
    /// Content fingerprint of the normalized body; absent for empty bodies.
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<SignalBreakdown>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_terms: Vec<String>,
}

impl ReviewRecord {
    /// Title and body joined for whole-review analysis.
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// Product the reviews belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Ten character catalogue identifier taken from the product URL.
    pub product_id: String,
    pub name: String,
    /// Local path of the downloaded main product image.
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductInfo {
    pub const UNKNOWN_NAME: &'static str = "Unknown_Product";

    pub fn unknown(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            name: Self::UNKNOWN_NAME.to_string(),
            image: None,
        }
    }
}
