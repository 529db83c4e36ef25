//! Review extraction from the currently loaded listing page.
//!
//! The page is scrolled until it stops growing, snapshotted, and parsed into
//! owned values (see [`parse`]). Image downloads and overlay clicks happen
//! afterwards, against the live page.

mod images;
mod parse;
mod selectors;

pub use images::{collect_image_urls, modal_image_urls, Strategy, STRATEGIES};
pub use parse::{parse_page, ParsedPage, ParsedReview};

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};
use url::Url;

use super::browser::{first_present, scroll_until_stable, wait_for, wait_for_any, Driver, ElementLocator};
use super::config::CrawlTimings;
use super::error::{CrawlWarning, DriverError};
use super::site::SiteProfile;
use crate::models::ReviewRecord;
use crate::services::ImageFetch;
use crate::utils::{modal_image_name, review_image_name, safe_reviewer};
use selectors::DEFAULT_REVIEWER;

const ESCAPE_SCRIPT: &str = r#"
    (() => {
        const opts = { key: 'Escape', code: 'Escape', keyCode: 27, which: 27, bubbles: true };
        document.dispatchEvent(new KeyboardEvent('keydown', opts));
        if (document.body) document.body.dispatchEvent(new KeyboardEvent('keydown', opts));
        return true;
    })()
"#;

/// Records harvested from one page plus the problems absorbed along the way.
#[derive(Debug, Default)]
pub struct PageHarvest {
    pub records: Vec<ReviewRecord>,
    pub warnings: Vec<CrawlWarning>,
}

/// Where a review sits in the crawl and whether its images are fetched.
struct RecordSlot<'p> {
    index: usize,
    page: &'p str,
    page_url: Option<&'p Url>,
    fetch_images: bool,
}

/// Turns the loaded listing page into [`ReviewRecord`]s.
pub struct PageExtractor<'a> {
    profile: &'a SiteProfile,
    timings: &'a CrawlTimings,
    images: &'a dyn ImageFetch,
    image_dir: &'a Path,
}

impl<'a> PageExtractor<'a> {
    pub fn new(
        profile: &'a SiteProfile,
        timings: &'a CrawlTimings,
        images: &'a dyn ImageFetch,
        image_dir: &'a Path,
    ) -> Self {
        Self {
            profile,
            timings,
            images,
            image_dir,
        }
    }

    /// Extract every review on the current page.
    ///
    /// `offset` numbers reviews globally for image file names; `seen` holds
    /// image URLs already handled during this crawl and is extended here.
    /// `wanted` is asked once per review, in page order, with its body text;
    /// reviews it turns down come back without images and leave no files.
    pub async fn extract(
        &self,
        driver: &mut dyn Driver,
        seen: &mut HashSet<String>,
        offset: usize,
        wanted: &mut (dyn FnMut(&str) -> bool + Send),
    ) -> Result<PageHarvest, DriverError> {
        scroll_until_stable(driver, self.timings.scroll_pause(), self.timings.max_scroll_rounds)
            .await?;
        let listed = wait_for(
            driver,
            &self.profile.review_list,
            self.timings.review_wait(),
            self.timings.poll_interval(),
        )
        .await?;
        if !listed {
            debug!("Review list did not appear; parsing the page as-is");
        }

        let page = driver.current_url().await?;
        let page_url = Url::parse(&page).ok();
        let html = driver.page_source().await?;
        let parsed = parse_page(&html, self.profile, page_url.as_ref());
        if parsed.used_fallback && !parsed.reviews.is_empty() {
            debug!("Using fallback review locator on {}", page);
        }
        info!("Found {} review(s) on {}", parsed.reviews.len(), page);

        let mut harvest = PageHarvest::default();
        for (idx, review) in parsed.reviews.into_iter().enumerate() {
            let index = offset + idx;
            let fetch_images = wanted(review.body.as_deref().unwrap_or_default());
            if !fetch_images {
                debug!("Review {} on {} will not be kept; skipping its images", index, page);
            }
            let record = self
                .build_record(
                    driver,
                    review,
                    RecordSlot {
                        index,
                        page: &page,
                        page_url: page_url.as_ref(),
                        fetch_images,
                    },
                    seen,
                    &mut harvest.warnings,
                )
                .await;
            harvest.records.push(record);
        }
        Ok(harvest)
    }

    async fn build_record(
        &self,
        driver: &mut dyn Driver,
        review: ParsedReview,
        slot: RecordSlot<'_>,
        seen: &mut HashSet<String>,
        warnings: &mut Vec<CrawlWarning>,
    ) -> ReviewRecord {
        let RecordSlot { index, page, page_url, fetch_images } = slot;
        let mut missing = |field: &str, present: bool| {
            if !present {
                debug!("Review {} on {}: no {}", index, page, field);
                warnings.push(CrawlWarning::Extraction {
                    page: page.to_string(),
                    index,
                    field: field.to_string(),
                });
            }
        };
        missing("title", review.title.is_some());
        missing("body", review.body.is_some());
        missing("rating", review.rating.is_some());
        missing("reviewer", review.reviewer.is_some());
        missing("date", review.date.is_some());

        let reviewer = review
            .reviewer
            .unwrap_or_else(|| DEFAULT_REVIEWER.to_string());
        let safe = safe_reviewer(&reviewer);

        let mut saved = Vec::new();
        let (images, galleries) = if fetch_images {
            (review.images, review.galleries)
        } else {
            (Vec::new(), Vec::new())
        };
        for (position, src) in images.into_iter().enumerate() {
            let Some(src) = src else { continue };
            let name = review_image_name(&safe, index, position);
            self.download(src, name, seen, &mut saved, warnings).await;
        }

        let mut modal_position = 0;
        for link in &galleries {
            let sources = match self.open_gallery(driver, link, page_url).await {
                Ok(sources) => sources,
                Err(e) => {
                    warn!("Image overlay for review {} failed: {}", index, e);
                    continue;
                }
            };
            for src in sources {
                let name = modal_image_name(&safe, index, modal_position);
                modal_position += 1;
                if let Some(src) = src {
                    self.download(src, name, seen, &mut saved, warnings).await;
                }
            }
        }

        ReviewRecord {
            title: review.title.unwrap_or_default(),
            body: review.body.unwrap_or_default(),
            rating: review.rating,
            reviewer,
            date: review.date.unwrap_or_default(),
            verified: review.verified,
            images: saved,
            ..Default::default()
        }
    }

    async fn download(
        &self,
        src: String,
        name: String,
        seen: &mut HashSet<String>,
        saved: &mut Vec<String>,
        warnings: &mut Vec<CrawlWarning>,
    ) {
        if !seen.insert(src.clone()) {
            debug!("Skipping already-seen image {}", src);
            return;
        }
        match self.images.fetch(&src, self.image_dir, &name).await {
            Some(_) => saved.push(name),
            None => warnings.push(CrawlWarning::ImageFetch { url: src }),
        }
    }

    /// Click an overlay link, read the overlay's images and close it again.
    async fn open_gallery(
        &self,
        driver: &mut dyn Driver,
        link: &ElementLocator,
        page_url: Option<&Url>,
    ) -> Result<Vec<Option<String>>, DriverError> {
        if !driver.click(link).await? {
            return Ok(Vec::new());
        }
        let opened = wait_for_any(
            driver,
            &self.profile.modal_containers,
            self.timings.modal_wait(),
            self.timings.poll_interval(),
        )
        .await?;
        if !opened {
            debug!("No image overlay appeared after clicking {:?}", link);
            return Ok(Vec::new());
        }
        tokio::time::sleep(self.timings.modal_settle()).await;

        let html = driver.page_source().await?;
        let sources = modal_image_urls(&html, &self.profile.modal_containers, page_url);
        debug!("Overlay holds {} image(s)", sources.len());

        let closed = match first_present(&html, &self.profile.modal_close_buttons) {
            Some(button) => driver.click(&button).await?,
            None => false,
        };
        if !closed {
            driver.execute_script(ESCAPE_SCRIPT).await?;
        }
        tokio::time::sleep(self.timings.modal_settle()).await;
        Ok(sources)
    }
}
