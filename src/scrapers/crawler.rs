//! Keyword-driven review crawl.
//!
//! 1. Sign in and harvest an unfiltered batch of reviews page by page.
//! 2. Pick the domain vocabulary terms that occur in that batch.
//! 3. Re-query the listing's review search for each term and harvest the
//!    results, tagging records with the term that surfaced them.
//!
//! Only sign-in failures (and an unusable product URL) abort the crawl;
//! everything else is logged, recorded as a warning and skipped.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};

use super::browser::Driver;
use super::config::CrawlSettings;
use super::error::{CrawlError, CrawlWarning, DriverError};
use super::pagination::{PageTurn, Paginator, StopReason};
use super::product::ProductProbe;
use super::reviews::PageExtractor;
use super::search::locate_review_search;
use super::session::{Credentials, SessionContext, SessionManager};
use super::site::{ReviewTarget, SiteProfile};
use crate::analysis::DomainVocabulary;
use crate::models::{fingerprint, Admission, Corpus, ProductInfo, ReviewRecord};
use crate::services::ImageFetch;

/// Everything a crawl needs besides the browser.
pub struct ReviewCrawler<'a> {
    settings: &'a CrawlSettings,
    profile: &'a SiteProfile,
    vocabulary: &'a DomainVocabulary,
    credentials: &'a Credentials,
    images: &'a dyn ImageFetch,
    image_dir: &'a Path,
}

/// Mutable state owned by one crawl invocation.
struct CrawlState {
    corpus: Corpus,
    session: SessionContext,
    seen_images: HashSet<String>,
    /// Reviews extracted so far, duplicates included; numbers image files.
    extracted: usize,
    /// The unfiltered batch as extracted, duplicates included; kept for the
    /// in-memory term fallback.
    initial: Vec<ReviewRecord>,
}

/// Per-term harvest counts.
#[derive(Debug, Default)]
struct TermCounts {
    pages: usize,
    admitted: usize,
    tagged: usize,
}

impl<'a> ReviewCrawler<'a> {
    pub fn new(
        settings: &'a CrawlSettings,
        profile: &'a SiteProfile,
        vocabulary: &'a DomainVocabulary,
        credentials: &'a Credentials,
        images: &'a dyn ImageFetch,
        image_dir: &'a Path,
    ) -> Self {
        Self {
            settings,
            profile,
            vocabulary,
            credentials,
            images,
            image_dir,
        }
    }

    fn session(&self) -> SessionManager<'_> {
        SessionManager::new(self.credentials, self.profile, &self.settings.timings)
    }

    fn extractor(&self) -> PageExtractor<'_> {
        PageExtractor::new(self.profile, &self.settings.timings, self.images, self.image_dir)
    }

    fn paginator(&self) -> Paginator<'_> {
        Paginator::new(self.profile, &self.settings.timings)
    }

    /// Run all three phases against `product_url` and return the corpus.
    pub async fn run(
        &self,
        driver: &mut dyn Driver,
        product_url: &str,
    ) -> Result<Corpus, CrawlError> {
        let target = self.profile.target(product_url)?;
        info!("Crawling reviews for {}", target.product_id);

        let session = self
            .session()
            .establish(driver, &target.origin, &target.reviews_url)
            .await?;

        let mut state = CrawlState {
            corpus: Corpus::new(),
            session,
            seen_images: HashSet::new(),
            extracted: 0,
            initial: Vec::new(),
        };

        state.corpus.product = Some(if self.settings.fetch_product {
            ProductProbe::new(self.profile, &self.settings.timings, self.images, self.image_dir)
                .probe(driver, &target)
                .await
        } else {
            ProductInfo::unknown(&target.product_id)
        });

        if let Err(e) = self.harvest_initial(driver, &target, &mut state).await {
            warn!("Initial harvest stopped early: {}", e);
        }
        state.corpus.initial_batch = state.initial.len();
        info!("Initial batch: {} review(s)", state.initial.len());

        let mut terms = self
            .vocabulary
            .candidate_terms(state.initial.iter().map(|r| r.body.as_str()));
        if let Some(max) = self.settings.max_terms {
            terms.truncate(max);
        }
        info!("Candidate terms: {:?}", terms);
        state.corpus.search_terms = terms.clone();

        for term in &terms {
            if let Err(e) = self.query_term(driver, &target, term, &mut state).await {
                warn!("Re-query for '{}' aborted: {}", term, e);
                state.corpus.warnings.push(CrawlWarning::TermAborted {
                    term: term.clone(),
                    reason: e.to_string(),
                });
            }
        }

        info!(
            "Crawl finished: {} record(s), {} warning(s), {} re-authentication(s)",
            state.corpus.len(),
            state.corpus.warnings.len(),
            state.session.reauthentications
        );
        Ok(state.corpus)
    }

    /// Phase 1: unfiltered pages until the batch is full or pages run out.
    ///
    /// Every extracted record counts toward the batch, so pages that only
    /// repeat earlier reviews still use it up.
    async fn harvest_initial(
        &self,
        driver: &mut dyn Driver,
        target: &ReviewTarget,
        state: &mut CrawlState,
    ) -> Result<(), DriverError> {
        driver.navigate(&target.reviews_url).await?;
        tokio::time::sleep(self.settings.timings.settle()).await;

        let batch_size = self.settings.batch_size;
        let mut page = 0;
        while state.initial.len() < batch_size {
            page += 1;
            self.ensure_session(driver, target, state).await?;
            let room = batch_size - state.initial.len();
            let mut wanted = image_gate(&state.corpus, room, true);
            let harvest = self
                .extractor()
                .extract(driver, &mut state.seen_images, state.extracted, &mut wanted)
                .await?;
            drop(wanted);
            state.extracted += harvest.records.len();
            state.corpus.warnings.extend(harvest.warnings);
            if harvest.records.is_empty() {
                debug!("Initial page {}: {}", page, StopReason::EmptyPage);
                break;
            }

            let mut fresh = 0;
            for record in harvest.records.into_iter().take(room) {
                if !record.has_body() {
                    state.corpus.keep_unkeyed(record.clone());
                } else if state.corpus.admit(record.clone()) {
                    fresh += 1;
                } else {
                    debug!("Duplicate review on initial page {}", page);
                }
                state.initial.push(record);
            }
            info!(
                "Initial page {}: {} review(s) so far, {} new",
                page,
                state.initial.len(),
                fresh
            );

            if state.initial.len() >= batch_size {
                break;
            }
            if fresh == 0 {
                debug!("Initial harvest ends: {}", StopReason::NoNewReviews);
                break;
            }
            if let PageTurn::Stop(reason) = self.paginator().next_page(driver).await? {
                debug!("Initial harvest ends: {}", reason);
                break;
            }
        }
        Ok(())
    }

    /// Phase 3 for one term: search, then paginate through the results.
    async fn query_term(
        &self,
        driver: &mut dyn Driver,
        target: &ReviewTarget,
        term: &str,
        state: &mut CrawlState,
    ) -> Result<(), DriverError> {
        info!("Re-querying reviews for '{}'", term);
        driver.navigate(&target.reviews_url).await?;
        tokio::time::sleep(self.settings.timings.settle()).await;
        self.ensure_session(driver, target, state).await?;

        let html = driver.page_source().await?;
        let Some(search_box) = locate_review_search(&html, &self.profile.search_inputs) else {
            warn!("No review search box for '{}'; filtering the initial batch", term);
            state
                .corpus
                .warnings
                .push(CrawlWarning::SearchControlNotFound {
                    term: term.to_string(),
                });
            self.filter_initial(term, state);
            return Ok(());
        };

        driver.type_and_submit(&search_box, term).await?;
        tokio::time::sleep(self.settings.timings.settle()).await;

        let mut counts = TermCounts::default();
        let mut visited = HashSet::new();
        loop {
            self.ensure_session(driver, target, state).await?;
            if !visited.insert(driver.current_url().await?) {
                debug!("'{}': {}", term, StopReason::Revisited);
                break;
            }
            counts.pages += 1;
            let mut wanted = image_gate(&state.corpus, usize::MAX, false);
            let harvest = self
                .extractor()
                .extract(driver, &mut state.seen_images, state.extracted, &mut wanted)
                .await?;
            drop(wanted);
            state.extracted += harvest.records.len();
            state.corpus.warnings.extend(harvest.warnings);
            if harvest.records.is_empty() {
                debug!("'{}' page {}: {}", term, counts.pages, StopReason::EmptyPage);
                break;
            }

            for record in harvest.records {
                if !record.has_body() {
                    debug!("Dropping empty review from '{}' results", term);
                    continue;
                }
                match state.corpus.admit_tagged(record, term) {
                    Admission::Admitted => counts.admitted += 1,
                    Admission::Tagged => counts.tagged += 1,
                    Admission::Duplicate | Admission::Unkeyed => {}
                }
            }

            if self
                .settings
                .max_pages_per_term
                .is_some_and(|max| counts.pages >= max)
            {
                debug!("'{}': {}", term, StopReason::PageLimit);
                break;
            }
            if let PageTurn::Stop(reason) = self.paginator().next_page(driver).await? {
                debug!("'{}' ends: {}", term, reason);
                break;
            }
        }

        info!(
            "'{}': {} new review(s), {} tagged, {} page(s)",
            term, counts.admitted, counts.tagged, counts.pages
        );
        Ok(())
    }

    /// Fallback when the listing has no review search: tag initial-batch
    /// records whose body contains the term (case-insensitive substring).
    fn filter_initial(&self, term: &str, state: &mut CrawlState) {
        let needle = term.to_lowercase();
        let matches: Vec<ReviewRecord> = state
            .initial
            .iter()
            .filter(|r| r.body.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let mut tagged = 0;
        for record in matches {
            if matches!(
                state.corpus.admit_tagged(record, term),
                Admission::Admitted | Admission::Tagged
            ) {
                tagged += 1;
            }
        }
        info!("'{}': {} initial review(s) tagged in memory", term, tagged);
    }

    /// Re-authenticate if needed, returning to the page we were on.
    async fn ensure_session(
        &self,
        driver: &mut dyn Driver,
        target: &ReviewTarget,
        state: &mut CrawlState,
    ) -> Result<(), DriverError> {
        let here = driver.current_url().await?;
        let resume = if here.is_empty() || here.contains(&self.profile.sign_in_path) {
            target.reviews_url.as_str()
        } else {
            here.as_str()
        };
        self.session()
            .ensure(driver, &mut state.session, resume)
            .await;
        Ok(())
    }
}

/// Decides which reviews of a page get their images fetched: the first
/// `room` reviews that will actually be stored. A body already in the corpus
/// or earlier on the same page will not be, and neither will an empty one
/// unless `keep_empty` is set.
fn image_gate(
    corpus: &Corpus,
    mut room: usize,
    keep_empty: bool,
) -> impl FnMut(&str) -> bool + Send + '_ {
    let mut on_page = HashSet::new();
    move |body| {
        if room == 0 {
            return false;
        }
        room -= 1;
        match fingerprint(body) {
            Some(key) => !corpus.contains_fingerprint(&key) && on_page.insert(key),
            None => keep_empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::browser::fake::FakeDriver;
    use crate::scrapers::config::CrawlTimings;
    use crate::scrapers::error::AuthError;
    use crate::services::download::stub::StubFetch;

    const PRODUCT_URL: &str = "https://www.amazon.com/Gentle-Detergent/dp/B07XJ8C8F5/ref=cm_cr";
    const REVIEWS_1: &str = "https://www.amazon.com/product-reviews/B07XJ8C8F5/?reviewerType=all_reviews&filterByStar=all_stars&pageNumber=1";
    const REVIEWS_2: &str = "https://www.amazon.com/product-reviews/B07XJ8C8F5/?pageNumber=2";
    const PRODUCT: &str = "https://www.amazon.com/dp/B07XJ8C8F5";
    const SIGN_IN: &str = "https://www.amazon.com/ap/signin";
    const PASSWORD: &str = "https://www.amazon.com/ap/password";
    const SEARCH_BOTTLE: &str = "https://www.amazon.com/product-reviews/B07XJ8C8F5/?filterByKeyword=bottle";
    const SEARCH_BOX: &str = "https://www.amazon.com/product-reviews/B07XJ8C8F5/?filterByKeyword=box";

    const NEXT: &str = "ul.a-pagination li.a-last a";
    const SEARCH_BOX_HTML: &str =
        r#"<div class="reviews-filter"><input type="text" placeholder="Search customer reviews"></div>"#;

    fn review(title: &str, body: &str, img: Option<&str>) -> String {
        let img = img
            .map(|src| format!(r#"<img class="review-image-tile" src="{src}">"#))
            .unwrap_or_default();
        format!(
            r#"<div data-hook="review"><span data-hook="review-title">{title}</span>
               <span data-hook="review-body">{body}</span>{img}</div>"#
        )
    }

    fn listing(extra: &str, reviews: &[String], next: Option<bool>) -> String {
        let pagination = match next {
            Some(true) => r##"<ul class="a-pagination"><li class="a-last"><a href="#">Next page</a></li></ul>"##,
            Some(false) => r#"<ul class="a-pagination"><li class="a-last a-disabled">Next page</li></ul>"#,
            None => "",
        };
        format!(
            r#"<html><body>{extra}<div id="cm_cr-review_list">{}</div>{pagination}</body></html>"#,
            reviews.concat()
        )
    }

    const PHOTO: &str = "https://m.media-amazon.com/images/I/leak._SY88.jpg";
    const R1: &str = "The bottle was leaking and the cap was loose.";
    const R2: &str = "Great scent, cleans well.";
    const R3: &str = "Arrived with a crushed box.";
    const R5: &str = "Bottle arrived cracked open.";

    fn signed_in(driver: FakeDriver) -> FakeDriver {
        driver
            .page(SIGN_IN, r#"<input id="ap_email"><input id="continue">"#)
            .page(PASSWORD, r#"<input id="ap_password"><input id="signInSubmit">"#)
            .on_click("*", "#continue", PASSWORD)
            .on_click("*", "#signInSubmit", REVIEWS_1)
            .page(PRODUCT, r#"<span id="productTitle">Gentle Detergent</span>"#)
    }

    fn initial_pages(driver: FakeDriver, search: &str) -> FakeDriver {
        driver
            .page(
                REVIEWS_1,
                &listing(
                    search,
                    &[review("Leaky", R1, Some(PHOTO)), review("Nice", R2, None)],
                    Some(true),
                ),
            )
            .page(
                REVIEWS_2,
                &listing(
                    search,
                    &[review("Squashed", R3, None), review("Stars only", "", None)],
                    Some(false),
                ),
            )
            .on_click(REVIEWS_1, NEXT, REVIEWS_2)
    }

    fn settings(max_terms: Option<usize>) -> CrawlSettings {
        CrawlSettings {
            max_terms,
            timings: CrawlTimings::instant(),
            ..CrawlSettings::default()
        }
    }

    fn by_body<'c>(corpus: &'c Corpus, body: &str) -> &'c ReviewRecord {
        corpus.records.iter().find(|r| r.body == body).unwrap()
    }

    #[tokio::test]
    async fn test_full_crawl_requeries_terms_without_duplicates() {
        let mut driver = initial_pages(signed_in(FakeDriver::new()), SEARCH_BOX_HTML)
            .page(
                SEARCH_BOTTLE,
                &listing(
                    "",
                    &[
                        review("Leaky", R1, Some(PHOTO)),
                        review("Cracked", R5, Some(PHOTO)),
                        review("", "", None),
                    ],
                    None,
                ),
            )
            .page(
                SEARCH_BOX,
                &listing("", &[review("Squashed", R3, None), review("Leaky", R1, None)], None),
            )
            .on_search("bottle", SEARCH_BOTTLE)
            .on_search("box", SEARCH_BOX);
        let settings = settings(Some(2));
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let corpus = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, PRODUCT_URL)
            .await
            .unwrap();

        assert_eq!(corpus.product.as_ref().unwrap().name, "Gentle Detergent");
        assert_eq!(corpus.initial_batch, 4);
        assert_eq!(corpus.search_terms, vec!["bottle", "box"]);
        assert_eq!(corpus.len(), 5);
        assert_eq!(corpus.fingerprint_count(), 4);

        assert_eq!(by_body(&corpus, R1).search_term.as_deref(), Some("bottle"));
        assert_eq!(by_body(&corpus, R2).search_term, None);
        assert_eq!(by_body(&corpus, R3).search_term.as_deref(), Some("box"));
        let r5 = by_body(&corpus, R5);
        assert_eq!(r5.search_term.as_deref(), Some("bottle"));
        // same photo already downloaded for the initial batch
        assert!(r5.images.is_empty());
        assert_eq!(by_body(&corpus, R1).images, vec!["anonymous_review0_0.jpg"]);
        assert_eq!(
            driver.submitted,
            vec![
                ("input[placeholder='Search customer reviews']".to_string(), "bottle".to_string()),
                ("input[placeholder='Search customer reviews']".to_string(), "box".to_string()),
            ]
        );
        assert!(!corpus
            .warnings
            .iter()
            .any(|w| matches!(w, CrawlWarning::SearchControlNotFound { .. })));
    }

    #[tokio::test]
    async fn test_missing_search_box_falls_back_to_initial_batch() {
        let mut driver = initial_pages(signed_in(FakeDriver::new()), "");
        let settings = settings(None);
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let corpus = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, PRODUCT_URL)
            .await
            .unwrap();

        assert_eq!(
            corpus.search_terms,
            vec!["bottle", "box", "cap", "loose", "crushed"]
        );
        assert_eq!(corpus.len(), 4);
        assert_eq!(by_body(&corpus, R1).search_term.as_deref(), Some("bottle"));
        assert_eq!(by_body(&corpus, R3).search_term.as_deref(), Some("box"));
        let fallbacks = corpus
            .warnings
            .iter()
            .filter(|w| matches!(w, CrawlWarning::SearchControlNotFound { .. }))
            .count();
        assert_eq!(fallbacks, 5);
        assert!(driver.submitted.is_empty());
    }

    #[tokio::test]
    async fn test_driver_failure_aborts_only_that_term() {
        let failing = "https://www.amazon.com/product-reviews/B07XJ8C8F5/?filterByKeyword=broken";
        let mut driver = initial_pages(signed_in(FakeDriver::new()), SEARCH_BOX_HTML)
            .page(SEARCH_BOX, &listing("", &[review("Squashed", R3, None)], None))
            .on_search("bottle", failing)
            .failing(failing)
            .on_search("box", SEARCH_BOX);
        let settings = settings(Some(2));
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let corpus = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, PRODUCT_URL)
            .await
            .unwrap();

        assert!(corpus.warnings.iter().any(|w| matches!(
            w,
            CrawlWarning::TermAborted { term, .. } if term == "bottle"
        )));
        assert_eq!(by_body(&corpus, R3).search_term.as_deref(), Some("box"));
        assert_eq!(by_body(&corpus, R1).search_term, None);
    }

    #[tokio::test]
    async fn test_sign_in_failure_is_fatal() {
        let mut driver = FakeDriver::new().page(SIGN_IN, "<p>Temporarily unavailable</p>");
        let settings = settings(None);
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let err = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, PRODUCT_URL)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CrawlError::Auth(AuthError::FormUnavailable("email field"))
        ));
    }

    #[tokio::test]
    async fn test_bad_product_url_is_rejected_before_browsing() {
        let mut driver = FakeDriver::new();
        let settings = settings(None);
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let err = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, "https://www.amazon.com/s?k=detergent")
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Target(_)));
        assert!(driver.navigations.is_empty());
    }

    #[tokio::test]
    async fn test_pages_repeating_seen_reviews_end_the_initial_harvest() {
        let mut driver = signed_in(FakeDriver::new())
            .page(REVIEWS_1, &listing("", &[review("Nice", R2, None)], Some(true)))
            .page(REVIEWS_2, &listing("", &[review("Nice", R2, None)], Some(true)))
            .on_click(REVIEWS_1, NEXT, REVIEWS_2)
            .on_click(REVIEWS_2, NEXT, REVIEWS_1);
        let settings = settings(None);
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let corpus = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, PRODUCT_URL)
            .await
            .unwrap();

        assert_eq!(corpus.initial_batch, 2);
        assert_eq!(corpus.len(), 1);
        let next_clicks = driver.clicked.iter().filter(|l| l.selector == NEXT).count();
        assert_eq!(next_clicks, 1);
    }

    #[tokio::test]
    async fn test_images_are_only_saved_for_stored_records() {
        let photo = |name: &str| format!("https://m.media-amazon.com/images/I/{name}._SY88.jpg");
        let (again, cracked, squashed, late) =
            (photo("again"), photo("cracked"), photo("squashed"), photo("late"));
        let mut driver = initial_pages(signed_in(FakeDriver::new()), SEARCH_BOX_HTML)
            .page(
                SEARCH_BOTTLE,
                &listing(
                    "",
                    &[
                        review("Leaky", R1, Some(&again)),
                        review("Cracked", R5, Some(&cracked)),
                    ],
                    None,
                ),
            )
            .page(
                SEARCH_BOX,
                &listing(
                    "",
                    &[
                        review("Squashed", R3, Some(&squashed)),
                        review("Leaky", R1, Some(&late)),
                    ],
                    None,
                ),
            )
            .on_search("bottle", SEARCH_BOTTLE)
            .on_search("box", SEARCH_BOX);
        let settings = settings(Some(2));
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let corpus = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, PRODUCT_URL)
            .await
            .unwrap();

        let referenced: usize = corpus.records.iter().map(|r| r.images.len()).sum();
        let on_disk = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(referenced, 2);
        assert_eq!(on_disk, referenced);
        assert_eq!(by_body(&corpus, R5).images, vec!["anonymous_review5_0.jpg"]);
        assert_eq!(
            fetch.requested_names(),
            vec!["anonymous_review0_0.jpg", "anonymous_review5_0.jpg"]
        );
    }

    #[tokio::test]
    async fn test_lapsed_session_is_renewed_before_requeries() {
        // third visit to the listing: sign-in click, initial harvest, first re-query
        let mut driver = initial_pages(signed_in(FakeDriver::new()), SEARCH_BOX_HTML)
            .redirect_visit(REVIEWS_1, 3, SIGN_IN)
            .page(SEARCH_BOTTLE, &listing("", &[review("Cracked", R5, None)], None))
            .page(SEARCH_BOX, &listing("", &[review("Squashed", R3, None)], None))
            .on_search("bottle", SEARCH_BOTTLE)
            .on_search("box", SEARCH_BOX);
        let settings = settings(Some(2));
        let (profile, vocab) = (SiteProfile::default(), DomainVocabulary::default());
        let creds = Credentials::new("a@b.test", "pw");
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let corpus = ReviewCrawler::new(&settings, &profile, &vocab, &creds, &fetch, dir.path())
            .run(&mut driver, PRODUCT_URL)
            .await
            .unwrap();

        let sign_ins = driver
            .navigations
            .iter()
            .filter(|url| url.starts_with(SIGN_IN))
            .count();
        assert_eq!(sign_ins, 2);
        let terms: Vec<_> = driver.submitted.iter().map(|(_, term)| term.as_str()).collect();
        assert_eq!(terms, vec!["bottle", "box"]);
        assert_eq!(by_body(&corpus, R5).search_term.as_deref(), Some("bottle"));
        assert_eq!(by_body(&corpus, R3).search_term.as_deref(), Some("box"));
        assert!(!corpus
            .warnings
            .iter()
            .any(|w| matches!(w, CrawlWarning::TermAborted { .. })));
    }
}
