//! Product page probe: display name and main image.

use std::path::Path;

use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use super::browser::{parse_selector, text_of, wait_for, Driver};
use super::config::CrawlTimings;
use super::error::DriverError;
use super::site::{ReviewTarget, SiteProfile};
use crate::models::ProductInfo;
use crate::services::ImageFetch;
use crate::utils::product_image_name;

/// Reads product details from the product page. Never fails the crawl.
pub struct ProductProbe<'a> {
    profile: &'a SiteProfile,
    timings: &'a CrawlTimings,
    images: &'a dyn ImageFetch,
    image_dir: &'a Path,
}

impl<'a> ProductProbe<'a> {
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

    pub async fn probe(&self, driver: &mut dyn Driver, target: &ReviewTarget) -> ProductInfo {
        match self.read(driver, target).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Could not read product page {}: {}", target.product_url, e);
                ProductInfo::unknown(&target.product_id)
            }
        }
    }

    async fn read(
        &self,
        driver: &mut dyn Driver,
        target: &ReviewTarget,
    ) -> Result<ProductInfo, DriverError> {
        driver.navigate(&target.product_url).await?;
        tokio::time::sleep(self.timings.settle()).await;
        wait_for(
            driver,
            &self.profile.product_title,
            self.timings.element_wait(),
            self.timings.poll_interval(),
        )
        .await?;

        let html = driver.page_source().await?;
        let name = text_of(&html, &self.profile.product_title)
            .unwrap_or_else(|| ProductInfo::UNKNOWN_NAME.to_string());
        info!("Product: {}", name);

        let mut product = ProductInfo {
            product_id: target.product_id.clone(),
            name,
            image: None,
        };

        let Some(src) = main_image_src(&html, &self.profile.product_images) else {
            debug!("No main product image found");
            return Ok(product);
        };
        let src = match Url::parse(&target.product_url).and_then(|base| base.join(&src)) {
            Ok(url) => url.to_string(),
            Err(_) => src,
        };
        let name = product_image_name();
        if self.images.fetch(&src, self.image_dir, name).await.is_some() {
            product.image = Some(name.to_string());
        }
        Ok(product)
    }
}

fn main_image_src(html: &str, candidates: &[String]) -> Option<String> {
    let document = Html::parse_document(html);
    candidates.iter().find_map(|css| {
        let selector = parse_selector(css)?;
        let img = document.select(&selector).next()?;
        img.value()
            .attr("src")
            .or_else(|| img.value().attr("data-old-hires"))
            .filter(|s| !s.is_empty() && !s.starts_with("data:"))
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::browser::fake::FakeDriver;
    use crate::services::download::stub::StubFetch;

    fn target() -> ReviewTarget {
        SiteProfile::default()
            .target("https://www.amazon.com/dp/B07XJ8C8F5")
            .unwrap()
    }

    #[tokio::test]
    async fn test_probe_reads_title_and_image() {
        let mut driver = FakeDriver::new().page(
            "https://www.amazon.com/dp/B07XJ8C8F5",
            r#"<span id="productTitle">  Fresh Scent Laundry Detergent, 64 Loads </span>
               <div id="imgTagWrapperId"><img id="landingImage" src="https://m.media-amazon.com/images/I/main._AC_SL1500_.jpg"></div>"#,
        );
        let (profile, timings) = (SiteProfile::default(), CrawlTimings::instant());
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let info = ProductProbe::new(&profile, &timings, &fetch, dir.path())
            .probe(&mut driver, &target())
            .await;

        assert_eq!(info.product_id, "B07XJ8C8F5");
        assert_eq!(info.name, "Fresh Scent Laundry Detergent, 64 Loads");
        assert_eq!(info.image.as_deref(), Some("product.jpg"));
        assert_eq!(fetch.requested_names(), vec!["product.jpg"]);
    }

    #[tokio::test]
    async fn test_probe_defaults_on_failure() {
        let mut driver = FakeDriver::new().failing("https://www.amazon.com/dp/B07XJ8C8F5");
        let (profile, timings) = (SiteProfile::default(), CrawlTimings::instant());
        let fetch = StubFetch::default();
        let dir = tempfile::tempdir().unwrap();

        let info = ProductProbe::new(&profile, &timings, &fetch, dir.path())
            .probe(&mut driver, &target())
            .await;

        assert_eq!(info, ProductInfo::unknown("B07XJ8C8F5"));
    }
}
