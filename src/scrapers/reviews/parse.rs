//! Synchronous parsing of a review listing snapshot.

use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html};
use url::Url;

use super::images::collect_image_urls;
use super::selectors::{
    ANCHOR, BODY, DATE, REVIEWER, STAR_CLASS, STAR_ICON, TITLE_LINK, TITLE_SPAN, VERIFIED_MARKER,
};
use crate::scrapers::browser::{parse_selector, ElementLocator};
use crate::scrapers::site::SiteProfile;

/// Fields read from one review container. `None` marks a field that was not
/// found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReview {
    pub title: Option<String>,
    pub body: Option<String>,
    pub rating: Option<f32>,
    pub reviewer: Option<String>,
    pub date: Option<String>,
    pub verified: bool,
    /// One entry per discovered image, in position order.
    pub images: Vec<Option<String>>,
    /// "See all" / "view all" controls that open an image overlay.
    pub galleries: Vec<ElementLocator>,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub reviews: Vec<ParsedReview>,
    /// Containers came from the looser fallback locator.
    pub used_fallback: bool,
}

/// Parse every review container on the page.
pub fn parse_page(html: &str, profile: &SiteProfile, page_url: Option<&Url>) -> ParsedPage {
    let document = Html::parse_document(html);
    let (containers, used_fallback) = review_containers(&document, profile);
    if containers.is_empty() {
        return ParsedPage::default();
    }

    let anchor_index: HashMap<_, usize> = document
        .select(&ANCHOR)
        .enumerate()
        .map(|(i, a)| (a.id(), i))
        .collect();

    let reviews = containers
        .into_iter()
        .map(|container| ParsedReview {
            title: first_text(container, &TITLE_LINK).or_else(|| first_text(container, &TITLE_SPAN)),
            body: first_text(container, &BODY),
            rating: rating(container),
            reviewer: first_text(container, &REVIEWER),
            date: first_text(container, &DATE),
            verified: container.text().any(|t| t.contains(VERIFIED_MARKER)),
            images: collect_image_urls(container, &profile.image_host_marker, page_url),
            galleries: gallery_links(container, |a| anchor_index.get(&a.id()).copied()),
        })
        .collect();

    ParsedPage {
        reviews,
        used_fallback,
    }
}

/// Primary containers, or the outermost fallback matches when there are none.
fn review_containers<'a>(document: &'a Html, profile: &SiteProfile) -> (Vec<ElementRef<'a>>, bool) {
    if let Some(primary) = parse_selector(&profile.primary_review) {
        let found: Vec<_> = document.select(&primary).collect();
        if !found.is_empty() {
            return (found, false);
        }
    }

    let Some(secondary) = parse_selector(&profile.secondary_review) else {
        return (Vec::new(), true);
    };
    let matches: Vec<_> = document.select(&secondary).collect();
    let ids: HashSet<_> = matches.iter().map(|m| m.id()).collect();
    let outermost = matches
        .into_iter()
        .filter(|m| !m.ancestors().any(|a| ids.contains(&a.id())))
        .collect();
    (outermost, true)
}

fn first_text(container: ElementRef<'_>, selector: &scraper::Selector) -> Option<String> {
    container.select(selector).next().and_then(visible_text)
}

/// Collapsed text of an element, leaving out star icons and their alt text.
fn visible_text(element: ElementRef<'_>) -> Option<String> {
    let root = element.id();
    let parts: Vec<&str> = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|a| a.id() != root)
                .filter_map(ElementRef::wrap)
                .any(|el| {
                    el.value().name() == "i"
                        || el.value().classes().any(|c| c == "a-icon-alt")
                });
            (!hidden).then_some(&**text)
        })
        .collect();
    let text = parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Rating from a star-class token: `a-star-4-5` reads as 4.5.
/// Tokens outside 0 to 5 stars are ignored.
fn rating(container: ElementRef<'_>) -> Option<f32> {
    container.select(&STAR_ICON).find_map(|icon| {
        let class = icon.value().attr("class")?;
        let token = STAR_CLASS.captures(class)?.get(1)?.as_str();
        token
            .replace('-', ".")
            .parse()
            .ok()
            .filter(|stars: &f32| (0.0..=5.0).contains(stars))
    })
}

/// Overlay links, addressed by their position among all anchors of the page.
fn gallery_links(
    container: ElementRef<'_>,
    index_of: impl Fn(ElementRef<'_>) -> Option<usize>,
) -> Vec<ElementLocator> {
    container
        .select(&ANCHOR)
        .filter(|a| {
            let text = a.text().collect::<String>().to_lowercase();
            text.contains("see all") || text.contains("view all")
        })
        .filter_map(|a| index_of(a))
        .map(|i| ElementLocator::nth("a", i))
        .collect()
}
