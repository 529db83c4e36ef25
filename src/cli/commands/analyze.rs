//! One-off text analysis commands.

use serde::Serialize;

use crate::analysis::ClassificationResult;
use crate::config::Config;
use crate::models::Sentiment;

#[derive(Serialize)]
struct ClassifyOutput {
    sentiment: Sentiment,
    #[serde(flatten)]
    result: ClassificationResult,
}

/// Classify a single review and print the result as JSON.
pub fn cmd_classify(config: &Config, title: &str, text: &str) -> anyhow::Result<()> {
    let classifier = config.classifier()?;
    let sentiment = config.sentiment.label(text);
    let result = classifier.classify(title, text, sentiment);
    println!(
        "{}",
        serde_json::to_string_pretty(&ClassifyOutput { sentiment, result })?
    );
    Ok(())
}

/// Label a text and print the label with its compound polarity.
pub fn cmd_sentiment(config: &Config, text: &str) -> anyhow::Result<()> {
    let score = config.sentiment.analyze(text);
    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(())
}
