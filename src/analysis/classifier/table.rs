//! Versioned constant table for the packaging classifier.
//!
//! The built-in table is version 1. Alternate tables can be loaded from TOML,
//! YAML or JSON; any field left out falls back to the built-in value.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

pub const TABLE_VERSION: u32 = 1;

/// Relative weight of each signal; the four are summed into the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub keyword: f64,
    pub phrase: f64,
    pub structure: f64,
    pub sentiment_context: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            keyword: 0.4,
            phrase: 0.3,
            structure: 0.2,
            sentiment_context: 0.1,
        }
    }
}

/// Keyword signal constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub base: f64,
    pub per_extra_occurrence: f64,
    pub max_repeat_bonus: f64,
    pub salient_bonus: f64,
    pub salient: Vec<String>,
    /// Inflections added to the vocabulary for a base term.
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Packaging words counted as vocabulary even when not in the domain lists.
    pub extra_terms: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            base: 0.1,
            per_extra_occurrence: 0.05,
            max_repeat_bonus: 0.2,
            salient_bonus: 0.1,
            salient: strings(&[
                "leak",
                "damage",
                "broken",
                "spill",
                "mess",
                "packaging",
                "container",
            ]),
            synonyms: default_synonyms(),
            extra_terms: strings(&[
                "packaging", "package", "container", "bottle", "box", "bag", "can", "jar", "tube",
                "pouch", "leak", "leaking", "leaked", "broken", "break", "broke", "damage",
                "damaged", "crack", "cracked", "seal", "sealed", "cap", "lid", "top", "cover",
                "plastic", "glass", "metal", "paper", "cardboard", "label", "labeled", "wrapped",
                "wrap", "protective", "protection", "secure", "secured", "spill", "spilled",
                "mess", "dirty", "clean", "hygienic", "safe", "unsafe", "dangerous", "tin",
                "aluminum", "steel", "foil", "bubble", "cushion", "padding", "tape", "adhesive",
                "transparent", "clear", "opaque", "color", "colored", "design", "shape", "size",
                "large", "small", "shipping", "delivery", "arrived", "crushed", "dented", "torn",
                "ripped", "defective", "mold", "expired", "loose", "tight", "fragile", "handle",
                "grip", "drip", "dripping", "overflow", "overflowing", "splash", "splashing",
                "spray", "spraying",
            ]),
        }
    }
}

fn default_synonyms() -> BTreeMap<String, Vec<String>> {
    let pairs: &[(&str, &[&str])] = &[
        ("bottle", &["bottles", "bottling", "bottled"]),
        ("package", &["packages", "packaging", "packaged"]),
        ("container", &["containers", "containing"]),
        ("leak", &["leaks", "leaking", "leaked", "leakage"]),
        ("damage", &["damages", "damaged", "damaging"]),
        ("break", &["breaks", "breaking", "broken", "broke"]),
        ("spill", &["spills", "spilling", "spilled"]),
        ("mess", &["messy", "messes"]),
        ("clean", &["cleans", "cleaning", "cleaned"]),
        ("secure", &["secures", "securing", "secured", "security"]),
        ("protective", &["protects", "protecting", "protected", "protection"]),
        ("plastic", &["plastics"]),
        ("glass", &["glasses"]),
        ("metal", &["metals", "metallic"]),
        ("cardboard", &["cardboards"]),
        ("tape", &["tapes", "taping", "taped"]),
        ("label", &["labels", "labeling", "labeled"]),
        ("seal", &["seals", "sealing", "sealed"]),
        ("cap", &["caps", "capping", "capped"]),
        ("lid", &["lids"]),
        ("box", &["boxes", "boxing", "boxed"]),
        ("bag", &["bags", "bagging", "bagged"]),
        ("can", &["cans", "canning", "canned"]),
        ("jar", &["jars"]),
        ("tube", &["tubes", "tubing", "tubed"]),
        ("pouch", &["pouches"]),
        ("tin", &["tins"]),
        ("sachet", &["sachets"]),
        ("envelope", &["envelopes"]),
        ("mold", &["molds", "molding", "molded"]),
        ("padding", &["pads", "padded"]),
        ("bubble", &["bubbles", "bubbling", "bubbled"]),
        ("cushion", &["cushions", "cushioning", "cushioned"]),
        ("wrap", &["wraps", "wrapping", "wrapped"]),
        ("color", &["colors", "coloring", "colored"]),
        ("design", &["designs", "designing", "designed"]),
        ("size", &["sizes", "sizing", "sized"]),
        ("shape", &["shapes", "shaping", "shaped"]),
    ];
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), strings(v)))
        .collect()
}

/// Structure signal constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureRules {
    pub short_title_max_tokens: usize,
    pub title_bonus: f64,
    pub title_terms: Vec<String>,
    pub pattern_bonus: f64,
    pub patterns: Vec<String>,
    pub complaint_bonus: f64,
    pub connectives: Vec<String>,
    pub complaint_terms: Vec<String>,
}

impl Default for StructureRules {
    fn default() -> Self {
        Self {
            short_title_max_tokens: 5,
            title_bonus: 0.3,
            title_terms: strings(&[
                "packaging",
                "bottle",
                "container",
                "damaged",
                "leak",
                "broken",
                "arrived",
            ]),
            pattern_bonus: 0.1,
            patterns: strings(&[
                "arrived",
                "shipping",
                "delivery",
                "packaged",
                "wrapped",
                "damaged",
                "broken",
                "leaked",
                "spilled",
                "mess",
                "container",
                "bottle",
                "box",
                "package",
                "packaging",
            ]),
            complaint_bonus: 0.2,
            connectives: strings(&[
                "but",
                "however",
                "unfortunately",
                "disappointed",
                "problem",
                "issue",
            ]),
            complaint_terms: strings(&[
                "packaging",
                "container",
                "bottle",
                "damage",
                "leak",
                "broken",
            ]),
        }
    }
}

/// Sentiment-context signal constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentContextRules {
    pub negative_bonus: f64,
    pub negative_terms: Vec<String>,
    pub positive_bonus: f64,
    pub positive_terms: Vec<String>,
}

impl Default for SentimentContextRules {
    fn default() -> Self {
        Self {
            negative_bonus: 0.4,
            negative_terms: strings(&[
                "packaging",
                "container",
                "bottle",
                "damage",
                "leak",
                "broken",
                "spill",
                "mess",
            ]),
            positive_bonus: 0.2,
            positive_terms: strings(&[
                "packaging",
                "container",
                "bottle",
                "design",
                "easy",
                "convenient",
                "secure",
            ]),
        }
    }
}

/// All classifier constants in one versioned table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierTable {
    pub version: u32,
    pub threshold: f64,
    pub weights: SignalWeights,
    pub keyword: KeywordRules,
    /// Phrase to weight; matched as a substring of the lowercased review.
    pub phrases: BTreeMap<String, f64>,
    pub structure: StructureRules,
    pub sentiment_context: SentimentContextRules,
}

impl Default for ClassifierTable {
    fn default() -> Self {
        Self {
            version: TABLE_VERSION,
            threshold: 0.3,
            weights: SignalWeights::default(),
            keyword: KeywordRules::default(),
            phrases: default_phrases(),
            structure: StructureRules::default(),
            sentiment_context: SentimentContextRules::default(),
        }
    }
}

fn default_phrases() -> BTreeMap<String, f64> {
    [
        ("damaged during shipping", 0.8),
        ("arrived damaged", 0.8),
        ("packaging was", 0.7),
        ("container was", 0.7),
        ("bottle was", 0.7),
        ("box was", 0.7),
        ("leaked out", 0.8),
        ("spilled out", 0.8),
        ("came broken", 0.8),
        ("was broken", 0.7),
        ("got damaged", 0.7),
        ("easy to pour", 0.6),
        ("hard to open", 0.6),
        ("difficult to open", 0.6),
        ("messy to use", 0.7),
        ("clean to use", 0.5),
        ("secure packaging", 0.6),
        ("protective packaging", 0.6),
        ("well packaged", 0.5),
        ("poorly packaged", 0.7),
        ("packaging design", 0.6),
        ("container design", 0.6),
        ("bottle design", 0.6),
        ("cap was loose", 0.8),
        ("lid was loose", 0.8),
        ("seal was broken", 0.8),
        ("tape was", 0.6),
        ("label was", 0.6),
        ("plastic container", 0.6),
        ("glass bottle", 0.6),
        ("cardboard box", 0.6),
        ("metal can", 0.6),
    ]
    .into_iter()
    .map(|(p, w)| (p.to_string(), w))
    .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ClassifierTable {
    /// Load a table from a file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };
        let table: ClassifierTable = match ext {
            "json" => serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?
            }
            _ => toml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
        };
        if table.version != TABLE_VERSION {
            return Err(parse_err(format!(
                "unsupported classifier table version {} (expected {})",
                table.version, TABLE_VERSION
            )));
        }
        Ok(table)
    }
}
