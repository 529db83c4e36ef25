//! Image discovery inside a review container.
//!
//! Review photos show up under several markups depending on page layout and
//! lazy-loading state. Each strategy below is a pure function over the
//! container; [`collect_image_urls`] runs them in order and keeps the first
//! non-empty result. Every candidate keeps its position even when no usable
//! URL resolves for it, so callers can number files by position.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::selectors::{BACKGROUND_URL, IMG, STYLED};
use crate::scrapers::browser::parse_selector;

/// A discovery strategy: container and image host marker in, one entry per
/// candidate image out (`None` when the candidate has no usable URL).
pub type Strategy = fn(ElementRef<'_>, &str) -> Vec<Option<String>>;

/// All strategies, in the order they are tried.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("review-image markers", review_image_markers),
    ("tile section", tile_section),
    ("absolute src", absolute_src),
    ("image/photo containers", image_photo_containers),
    ("host src", host_src),
    ("media containers", media_containers),
    ("lazy data-src", lazy_data_src),
    ("srcset", responsive_srcset),
    ("background image", background_images),
    ("any img", any_img),
];

/// Image URLs for one review container, absolutized against `page_url`.
pub fn collect_image_urls(
    container: ElementRef<'_>,
    host_marker: &str,
    page_url: Option<&Url>,
) -> Vec<Option<String>> {
    for (name, strategy) in STRATEGIES {
        let found = strategy(container, host_marker);
        if !found.is_empty() {
            debug!("Image strategy '{}' found {} candidate(s)", name, found.len());
            return found
                .into_iter()
                .map(|src| src.and_then(|s| absolutize(&s, page_url)))
                .collect();
        }
    }
    Vec::new()
}

/// Images inside the first open overlay matching `containers`.
pub fn modal_image_urls(
    html: &str,
    containers: &[String],
    page_url: Option<&Url>,
) -> Vec<Option<String>> {
    let document = Html::parse_document(html);
    let Some(modal) = containers
        .iter()
        .filter_map(|css| parse_selector(css))
        .find_map(|sel: Selector| document.select(&sel).next())
    else {
        return Vec::new();
    };
    modal
        .select(&IMG)
        .map(|img| {
            usable(attr(img, "src"))
                .or_else(|| usable(attr(img, "data-src")))
                .and_then(|s| absolutize(s, page_url))
        })
        .collect()
}

fn review_image_markers(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(
        container.select(&IMG).filter(|img| {
            attr(*img, "class").is_some_and(|c| c.contains("review-image"))
                || attr(*img, "data-hook").is_some_and(|h| h.contains("review-image"))
        }),
        host_marker,
    )
}

fn tile_section(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(
        imgs_under_div(container, &["review-image-tile-section"]),
        host_marker,
    )
}

fn absolute_src(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(
        container
            .select(&IMG)
            .filter(|img| attr(*img, "src").is_some_and(|s| s.starts_with("http"))),
        host_marker,
    )
}

fn image_photo_containers(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(imgs_under_div(container, &["image", "photo"]), host_marker)
}

fn host_src(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(
        container
            .select(&IMG)
            .filter(|img| attr(*img, "src").is_some_and(|s| s.contains(host_marker))),
        host_marker,
    )
}

fn media_containers(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(
        imgs_under_div(container, &["review", "image", "photo", "media"]),
        host_marker,
    )
}

fn lazy_data_src(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(
        container
            .select(&IMG)
            .filter(|img| attr(*img, "data-src").is_some_and(|s| s.starts_with("http"))),
        host_marker,
    )
}

fn responsive_srcset(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(
        container
            .select(&IMG)
            .filter(|img| attr(*img, "srcset").is_some_and(|s| s.contains(host_marker))),
        host_marker,
    )
}

fn background_images(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    container
        .select(&STYLED)
        .filter_map(|el| {
            let style = attr(el, "style")?;
            let url = BACKGROUND_URL.captures(style)?.get(1)?.as_str();
            url.contains(host_marker).then(|| Some(url.to_string()))
        })
        .collect()
}

fn any_img(container: ElementRef<'_>, host_marker: &str) -> Vec<Option<String>> {
    resolve_all(container.select(&IMG), host_marker)
}

fn resolve_all<'a>(
    imgs: impl Iterator<Item = ElementRef<'a>>,
    host_marker: &str,
) -> Vec<Option<String>> {
    imgs.map(|img| resolve_img(img, host_marker)).collect()
}

/// `src`, then `data-src`, then the first `srcset` entry on the image host.
fn resolve_img(img: ElementRef<'_>, host_marker: &str) -> Option<String> {
    if let Some(src) = usable(attr(img, "src")).or_else(|| usable(attr(img, "data-src"))) {
        return Some(src.to_string());
    }
    let srcset = attr(img, "srcset")?;
    if !srcset.contains(host_marker) {
        return None;
    }
    srcset
        .split(|c: char| c.is_whitespace() || c == ',')
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Images with a `div` ancestor (inside the container) whose class contains
/// one of `needles`.
fn imgs_under_div<'a>(
    container: ElementRef<'a>,
    needles: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let root = container.id();
    container.select(&IMG).filter(move |img| {
        img.ancestors()
            .take_while(|node| node.id() != root)
            .filter_map(ElementRef::wrap)
            .any(|el| {
                el.value().name() == "div"
                    && attr(el, "class").is_some_and(|c| needles.iter().any(|n| c.contains(n)))
            })
    })
}

fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// Non-empty, non-inline source.
fn usable(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("data:"))
}

fn absolutize(src: &str, page_url: Option<&Url>) -> Option<String> {
    if src.starts_with("data:") {
        return None;
    }
    match Url::parse(src) {
        Ok(url) => Some(url.to_string()),
        Err(_) => page_url?.join(src).ok().map(|u| u.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "amazon.com";

    fn with_container<T>(html: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("div.c").unwrap();
        let container = doc.select(&sel).next().unwrap();
        f(container)
    }

    fn urls(found: Vec<Option<String>>) -> Vec<String> {
        found.into_iter().flatten().collect()
    }

    #[test]
    fn test_review_image_markers() {
        let html = r#"<div class="c">
            <img src="https://x/avatar.jpg">
            <img class="review-image-thumbnail" src="https://m.media-amazon.com/a.jpg">
            <img data-hook="review-image-tile" src="https://m.media-amazon.com/b.jpg">
        </div>"#;
        let found = with_container(html, |c| review_image_markers(c, HOST));
        assert_eq!(
            urls(found),
            vec!["https://m.media-amazon.com/a.jpg", "https://m.media-amazon.com/b.jpg"]
        );
    }

    #[test]
    fn test_tile_section() {
        let html = r#"<div class="c"><img src="/skip.png">
            <div class="review-image-tile-section"><span><img src="/t.jpg"></span></div></div>"#;
        let found = with_container(html, |c| tile_section(c, HOST));
        assert_eq!(urls(found), vec!["/t.jpg"]);
    }

    #[test]
    fn test_absolute_src_ignores_relative() {
        let html = r#"<div class="c"><img src="/rel.jpg"><img src="http://cdn.test/abs.jpg"></div>"#;
        let found = with_container(html, |c| absolute_src(c, HOST));
        assert_eq!(urls(found), vec!["http://cdn.test/abs.jpg"]);
    }

    #[test]
    fn test_image_photo_containers() {
        let html = r#"<div class="c"><div class="user-photo-strip"><img src="/p.jpg"></div>
            <p><img src="/loose.jpg"></p></div>"#;
        let found = with_container(html, |c| image_photo_containers(c, HOST));
        assert_eq!(urls(found), vec!["/p.jpg"]);
    }

    #[test]
    fn test_container_class_is_not_an_ancestor_match() {
        // the container's own class does not count
        let html = r#"<div class="c image"><img src="/p.jpg"></div>"#;
        let found = with_container(html, |c| image_photo_containers(c, HOST));
        assert!(found.is_empty());
    }

    #[test]
    fn test_host_src() {
        let html = r#"<div class="c"><img src="/x.jpg"><img src="//images-na.ssl-images-amazon.com/i.jpg"></div>"#;
        let found = with_container(html, |c| host_src(c, HOST));
        assert_eq!(urls(found), vec!["//images-na.ssl-images-amazon.com/i.jpg"]);
    }

    #[test]
    fn test_media_containers() {
        let html = r#"<div class="c"><div class="a-media-row"><img src="/m.jpg"></div></div>"#;
        let found = with_container(html, |c| media_containers(c, HOST));
        assert_eq!(urls(found), vec!["/m.jpg"]);
    }

    #[test]
    fn test_lazy_data_src_prefers_data_src_over_placeholder() {
        let html = r#"<div class="c"><img src="data:image/gif;base64,R0lGOD" data-src="https://m.media-amazon.com/lazy.jpg"></div>"#;
        let found = with_container(html, |c| lazy_data_src(c, HOST));
        assert_eq!(urls(found), vec!["https://m.media-amazon.com/lazy.jpg"]);
    }

    #[test]
    fn test_srcset_takes_first_entry() {
        let html = r#"<div class="c"><img srcset="https://m.media-amazon.com/s1.jpg 1x, https://m.media-amazon.com/s2.jpg 2x"></div>"#;
        let found = with_container(html, |c| responsive_srcset(c, HOST));
        assert_eq!(urls(found), vec!["https://m.media-amazon.com/s1.jpg"]);
    }

    #[test]
    fn test_background_images_on_host_only() {
        let html = r#"<div class="c">
            <span style="background-image: url('https://m.media-amazon.com/bg.jpg')"></span>
            <span style="background-image: url(https://elsewhere.test/bg.jpg)"></span>
        </div>"#;
        let found = with_container(html, |c| background_images(c, HOST));
        assert_eq!(found, vec![Some("https://m.media-amazon.com/bg.jpg".to_string())]);
    }

    #[test]
    fn test_any_img_keeps_positions_of_unusable_images() {
        let html = r#"<div class="c"><img><img src="/a.jpg"></div>"#;
        let found = with_container(html, |c| any_img(c, HOST));
        assert_eq!(found, vec![None, Some("/a.jpg".to_string())]);
    }

    #[test]
    fn test_chain_stops_at_first_non_empty_strategy() {
        let html = r#"<div class="c">
            <img src="https://cdn.test/avatar.jpg">
            <div class="review-image-tile-section"><img src="/tile.jpg"></div>
        </div>"#;
        let page = Url::parse("https://www.amazon.com/product-reviews/B000000001/").unwrap();
        let found = with_container(html, |c| collect_image_urls(c, HOST, Some(&page)));
        assert_eq!(found, vec![Some("https://www.amazon.com/tile.jpg".to_string())]);
    }

    #[test]
    fn test_chain_falls_through_to_background() {
        let html = r#"<div class="c"><span style="background-image:url(&quot;https://m.media-amazon.com/only.jpg&quot;)"></span></div>"#;
        let found = with_container(html, |c| collect_image_urls(c, HOST, None));
        assert_eq!(found, vec![Some("https://m.media-amazon.com/only.jpg".to_string())]);
    }

    #[test]
    fn test_modal_images() {
        let html = r#"<body><div class="a-popover-inner">
            <img src="https://m.media-amazon.com/full1.jpg"><img data-src="/full2.jpg">
        </div></body>"#;
        let page = Url::parse("https://www.amazon.com/x").unwrap();
        let found = modal_image_urls(
            html,
            &["div.missing".to_string(), "div.a-popover-inner".to_string()],
            Some(&page),
        );
        assert_eq!(
            urls(found),
            vec!["https://m.media-amazon.com/full1.jpg", "https://www.amazon.com/full2.jpg"]
        );
    }

    #[test]
    fn test_absolutize_rejects_inline_and_unjoinable() {
        assert_eq!(absolutize("data:image/png;base64,AAAA", None), None);
        assert_eq!(absolutize("/a.jpg", None), None);
        assert_eq!(
            absolutize("https://m.media-amazon.com/a.jpg", None).as_deref(),
            Some("https://m.media-amazon.com/a.jpg")
        );
    }
}
