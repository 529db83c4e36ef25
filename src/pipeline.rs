//! Crawl-then-annotate entry point.

use std::path::Path;

use tracing::info;

use crate::analysis::{annotate, Classifier, DomainVocabulary, SentimentLabeler};
use crate::models::Corpus;
use crate::scrapers::{CrawlError, CrawlSettings, Credentials, Driver, ReviewCrawler, SiteProfile};
use crate::services::ImageFetch;

/// Collaborators a crawl is run with.
pub struct CrawlDeps<'a> {
    pub settings: &'a CrawlSettings,
    pub profile: &'a SiteProfile,
    pub vocabulary: &'a DomainVocabulary,
    pub labeler: &'a SentimentLabeler,
    pub classifier: &'a Classifier,
    pub images: &'a dyn ImageFetch,
    /// Destination folder for downloaded images.
    pub image_dir: &'a Path,
}

/// Crawl the reviews of `product_url`, then label sentiment and classify
/// every harvested record.
pub async fn run_crawl(
    driver: &mut dyn Driver,
    product_url: &str,
    credentials: &Credentials,
    deps: &CrawlDeps<'_>,
) -> Result<Corpus, CrawlError> {
    let crawler = ReviewCrawler::new(
        deps.settings,
        deps.profile,
        deps.vocabulary,
        credentials,
        deps.images,
        deps.image_dir,
    );
    let mut corpus = crawler.run(driver, product_url).await?;
    info!("Annotating {} records", corpus.len());
    annotate(&mut corpus.records, deps.labeler, deps.classifier);
    Ok(corpus)
}
