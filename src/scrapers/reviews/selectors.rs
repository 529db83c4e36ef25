//! Field selectors inside a review container.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

pub(super) static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("a[data-hook='review-title']"));
pub(super) static TITLE_SPAN: LazyLock<Selector> =
    LazyLock::new(|| selector("span[data-hook='review-title']"));
pub(super) static BODY: LazyLock<Selector> =
    LazyLock::new(|| selector("span[data-hook='review-body']"));
pub(super) static STAR_ICON: LazyLock<Selector> =
    LazyLock::new(|| selector("i[class*='a-icon-star']"));
pub(super) static REVIEWER: LazyLock<Selector> =
    LazyLock::new(|| selector("span.a-profile-name"));
pub(super) static DATE: LazyLock<Selector> =
    LazyLock::new(|| selector("span[data-hook='review-date']"));
pub(super) static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
pub(super) static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
pub(super) static STYLED: LazyLock<Selector> =
    LazyLock::new(|| selector("[style*='background-image']"));

/// `a-star-4-5` style class token; the capture is `4-5`.
pub(super) static STAR_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"a-star-(\d+(?:-\d)?)").expect("static regex is valid"));

pub(super) static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).expect("static regex is valid")
});

pub(super) const VERIFIED_MARKER: &str = "Verified Purchase";
pub(super) const DEFAULT_REVIEWER: &str = "anonymous";
