//! Next-page detection and advancing through a review listing.

use std::fmt;

use scraper::Html;
use tracing::debug;

use super::browser::{parse_selector, Driver, ElementLocator};
use super::config::CrawlTimings;
use super::error::DriverError;
use super::site::SiteProfile;

/// Why pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No next-page control on the page.
    NoControl,
    /// The next-page control is marked disabled.
    Disabled,
    /// The page produced no records.
    EmptyPage,
    /// A configured page cap was reached.
    PageLimit,
    /// Advancing left the browser on the same URL.
    Stalled,
    /// The page held only reviews seen before.
    NoNewReviews,
    /// Advancing led back to a page already harvested.
    Revisited,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoControl => "no next-page control",
            Self::Disabled => "next-page control disabled",
            Self::EmptyPage => "empty page",
            Self::PageLimit => "page limit reached",
            Self::Stalled => "next-page click did not leave the page",
            Self::NoNewReviews => "page held no new reviews",
            Self::Revisited => "pagination looped back to a harvested page",
        };
        f.write_str(s)
    }
}

/// Outcome of trying to move to the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    Advanced,
    Stop(StopReason),
}

/// Detects and follows the listing's "next page" control.
pub struct Paginator<'a> {
    profile: &'a SiteProfile,
    timings: &'a CrawlTimings,
}

impl<'a> Paginator<'a> {
    pub fn new(profile: &'a SiteProfile, timings: &'a CrawlTimings) -> Self {
        Self { profile, timings }
    }

    /// Inspect the next-page control in a page snapshot.
    pub fn inspect(&self, html: &str) -> Option<StopReason> {
        let document = Html::parse_document(html);
        let Some(item) = parse_selector(&self.profile.next_page_item) else {
            return Some(StopReason::NoControl);
        };
        let Some(control) = document.select(&item).next() else {
            return Some(StopReason::NoControl);
        };
        if control
            .value()
            .classes()
            .any(|c| c == self.profile.disabled_class)
        {
            return Some(StopReason::Disabled);
        }
        let has_link = parse_selector(&self.profile.next_page_link)
            .is_some_and(|link| document.select(&link).next().is_some());
        if has_link {
            None
        } else {
            Some(StopReason::NoControl)
        }
    }

    pub fn has_next(&self, html: &str) -> bool {
        self.inspect(html).is_none()
    }

    /// Script-click the next-page link, then wait for the page to settle.
    pub async fn advance(&self, driver: &mut dyn Driver) -> Result<bool, DriverError> {
        let clicked = driver
            .click(&ElementLocator::first(&self.profile.next_page_link))
            .await?;
        if clicked {
            tokio::time::sleep(self.timings.settle()).await;
        }
        Ok(clicked)
    }

    /// Move to the next page if there is one.
    ///
    /// A click that leaves the browser on the same URL counts as a stop, so a
    /// dead next-page link cannot keep a harvest loop on one page.
    pub async fn next_page(&self, driver: &mut dyn Driver) -> Result<PageTurn, DriverError> {
        let html = driver.page_source().await?;
        if let Some(reason) = self.inspect(&html) {
            debug!("Pagination stops: {}", reason);
            return Ok(PageTurn::Stop(reason));
        }
        let before = driver.current_url().await?;
        if !self.advance(driver).await? {
            return Ok(PageTurn::Stop(StopReason::NoControl));
        }
        if driver.current_url().await? == before {
            debug!("Pagination stops: {}", StopReason::Stalled);
            return Ok(PageTurn::Stop(StopReason::Stalled));
        }
        Ok(PageTurn::Advanced)
    }
}
