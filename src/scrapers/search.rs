//! Locating the review-scoped search box.
//!
//! Listing pages carry both the site-wide product search and a search box
//! that filters reviews. Only the latter is usable for keyword re-queries.

use scraper::{ElementRef, Html};

use super::browser::{parse_selector, ElementLocator};

/// First candidate match that is not the site's global search control.
pub fn locate_review_search(html: &str, candidates: &[String]) -> Option<ElementLocator> {
    let document = Html::parse_document(html);
    candidates.iter().find_map(|css| {
        let selector = parse_selector(css)?;
        document
            .select(&selector)
            .enumerate()
            .find(|(_, el)| !is_global_search(*el))
            .map(|(index, _)| ElementLocator::nth(css.clone(), index))
    })
}

/// The header product search, or anything nested inside it.
fn is_global_search(element: ElementRef<'_>) -> bool {
    let el = element.value();
    if el.id().is_some_and(|id| id.contains("twotabsearch")) {
        return true;
    }
    if el.attr("name") == Some("field-keywords") {
        return true;
    }
    let global_class =
        |e: &scraper::node::Element| e.classes().any(|c| c.contains("nav-search") || c.contains("main-search"));
    if global_class(el) {
        return true;
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| global_class(a.value()) || a.value().id().is_some_and(|id| id.starts_with("nav-search")))
}
