//! Summarize command.

use std::path::Path;

use anyhow::Context;

use crate::analysis::summarize;
use crate::config::Config;
use crate::models::Corpus;

/// Print summary statistics for a corpus file as JSON.
pub async fn cmd_summarize(config: &Config, path: &Path) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;
    let corpus = Corpus::from_json(&json)
        .with_context(|| format!("{} is not a corpus file", path.display()))?;
    let summary = summarize(&corpus, &config.vocabulary);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
