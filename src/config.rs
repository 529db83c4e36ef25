//! Configuration management for packscope using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{Classifier, ClassifierTable, DomainVocabulary, SentimentLabeler};
use crate::scrapers::{BrowserEngineConfig, CrawlSettings, SiteProfile};
use crate::services::ImageSettings;

/// Default folder that per-crawl output folders are created in.
pub const DEFAULT_OUTPUT_DIR: &str = "reviews";

/// Configuration or classifier table could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Browser engine settings.
    #[serde(default)]
    pub browser: BrowserEngineConfig,
    /// Batch size, caps and timings.
    #[serde(default)]
    pub crawl: CrawlSettings,
    /// Storefront selectors, URL templates and markers.
    #[serde(default)]
    pub site: SiteProfile,
    /// Image download headers, timeout and URL variant rules.
    #[serde(default)]
    pub images: ImageSettings,
    #[serde(default)]
    pub vocabulary: DomainVocabulary,
    #[serde(default)]
    pub sentiment: SentimentLabeler,
    /// Classifier table file (TOML, JSON or YAML). Built-in table when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Parent folder for crawl output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no packscope config file is found.
    pub async fn load() -> Self {
        match prefer::load("packscope").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config file: {}", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| parse_err(e.to_string())),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| parse_err(e.to_string())),
            _ => serde_json::from_str(contents).map_err(|e| parse_err(e.to_string())),
        }
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise the CWD.
    pub fn base_dir(&self) -> PathBuf {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved against [`Config::base_dir`]
    pub fn resolve_path(&self, path_str: &str) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// Folder that per-crawl output folders are created in.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    /// The configured classifier table, or the built-in one.
    pub fn classifier_table(&self) -> Result<ClassifierTable, ConfigError> {
        match &self.classifier {
            Some(path) => ClassifierTable::load(&self.resolve_path(path)),
            None => Ok(ClassifierTable::default()),
        }
    }

    /// Classifier over this config's vocabulary and table.
    pub fn classifier(&self) -> Result<Classifier, ConfigError> {
        Ok(Classifier::new(self.classifier_table()?, &self.vocabulary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_toml_with_partial_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("packscope.toml");
        fs::write(
            &path,
            r#"
output_dir = "out"

[crawl]
batch_size = 40
max_terms = 5
max_pages_per_term = 3

[crawl.timings]
settle_ms = 10

[vocabulary]
components = ["jar", "lid"]
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.crawl.batch_size, 40);
        assert_eq!(config.crawl.max_terms, Some(5));
        assert_eq!(config.crawl.max_pages_per_term, Some(3));
        assert_eq!(config.crawl.timings.settle_ms, 10);
        assert_eq!(config.crawl.timings.poll_interval_ms, 500);
        assert!(config.crawl.fetch_product);
        assert_eq!(config.vocabulary.components, vec!["jar", "lid"]);
        assert!(!config.vocabulary.conditions.is_empty());
        assert_eq!(config.site, SiteProfile::default());
        assert_eq!(config.output_dir(), dir.path().join("out"));
    }

    #[tokio::test]
    async fn test_load_json_and_yaml() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("packscope.json");
        fs::write(&json, r#"{"browser": {"headless": false}}"#).unwrap();
        assert!(!Config::load_from_path(&json).await.unwrap().browser.headless);

        let yaml = dir.path().join("packscope.yaml");
        fs::write(&yaml, "site:\n  origin: https://www.amazon.co.uk\n").unwrap();
        let config = Config::load_from_path(&yaml).await.unwrap();
        assert_eq!(config.site.origin, "https://www.amazon.co.uk");
        assert_eq!(config.site.email_field, "#ap_email");
    }

    #[tokio::test]
    async fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load_from_path(&missing).await,
            Err(ConfigError::Read { .. })
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "crawl = 3").unwrap();
        assert!(matches!(
            Config::load_from_path(&bad).await,
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_resolve_path() {
        let config = Config {
            source_path: Some(PathBuf::from("/etc/packscope/packscope.toml")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_path("tables/v1.toml"),
            PathBuf::from("/etc/packscope/tables/v1.toml")
        );
        assert_eq!(config.resolve_path("/tmp/x"), PathBuf::from("/tmp/x"));
        assert!(!config.resolve_path("~/x").starts_with("~"));
    }

    #[test]
    fn test_default_classifier_table() {
        let config = Config::default();
        assert_eq!(config.classifier_table().unwrap(), ClassifierTable::default());
    }
}
