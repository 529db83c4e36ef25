//! Image download settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A URL rewrite tried after the original URL fails: every occurrence of
/// `from` is replaced with `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRule {
    pub from: String,
    pub to: String,
}

impl VariantRule {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Configuration for review image downloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// None uses the built-in desktop Chrome agent; "impersonate" picks a
    /// random real browser agent.
    pub user_agent: Option<String>,
    pub referer: String,
    /// Rewrite rules apply only to URLs containing this marker; `None`
    /// applies them to every URL.
    pub host_marker: Option<String>,
    pub variant_rules: Vec<VariantRule>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: None,
            referer: "https://www.amazon.com/".to_string(),
            host_marker: Some("amazon.com".to_string()),
            variant_rules: default_variant_rules(),
        }
    }
}

impl ImageSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Larger renditions first, then the alternate CDN host.
pub fn default_variant_rules() -> Vec<VariantRule> {
    vec![
        VariantRule::new("_SY88", "_AC_SL1500"),
        VariantRule::new("_SY88", "_AC_SL1000"),
        VariantRule::new("_SY88", "_AC_UL1500"),
        VariantRule::new("_AC_SL1500", "_AC_SL1000"),
        VariantRule::new("_AC_SL1500", "_AC_UL1500"),
        VariantRule::new("images-na.ssl-images-amazon.com", "m.media-amazon.com"),
        VariantRule::new("m.media-amazon.com", "images-na.ssl-images-amazon.com"),
    ]
}
