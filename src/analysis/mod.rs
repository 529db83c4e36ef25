//! Text analysis: sentiment labeling, packaging classification and summaries.

pub mod classifier;
pub mod sentiment;
pub mod summary;
pub mod tokens;
pub mod vocabulary;

pub use classifier::{ClassificationResult, Classifier, ClassifierTable};
pub use sentiment::{SentimentLabeler, SentimentScore};
pub use summary::{summarize, summarize_records, CorpusSummary};
pub use vocabulary::{DomainVocabulary, TermCategory};

use tracing::info;

use crate::models::ReviewRecord;

/// Label sentiment, then classify, every record in place.
///
/// Sentiment is computed from the review body and feeds the classifier's
/// sentiment-context signal.
pub fn annotate(records: &mut [ReviewRecord], labeler: &SentimentLabeler, classifier: &Classifier) {
    let mut packaging = 0usize;
    for record in records.iter_mut() {
        record.sentiment = labeler.label(&record.body);
        let result = classifier.classify_record(record);
        record.is_packaging = result.is_packaging;
        record.packaging_score = result.score;
        record.packaging_confidence = result.confidence;
        record.signals = Some(result.signals);
        record.matched_terms = result.matched_terms;
        if record.is_packaging {
            packaging += 1;
        }
    }
    info!(
        "Classified {} reviews: {} packaging-related, {} not",
        records.len(),
        packaging,
        records.len() - packaging
    );
}
