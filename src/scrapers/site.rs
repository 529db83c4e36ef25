//! Site profile: URL templates, selectors and text markers of the retail site.
//!
//! Field-level review selectors live in `reviews::selectors`; this profile
//! holds what differs between storefronts and may need overriding from
//! configuration when the markup shifts.

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::TargetError;

const SIGN_IN_TEMPLATE: &str = "{origin}/ap/signin?openid.pape.max_auth_age=3600\
&openid.return_to={return_to}\
&openid.identity=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0%2Fidentifier_select\
&openid.assoc_handle=usflex&openid.mode=checkid_setup&language=en_US\
&openid.claimed_id=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0%2Fidentifier_select\
&openid.ns=http%3A%2F%2Fspecs.openid.net%2Fauth%2F2.0";

const REVIEWS_TEMPLATE: &str =
    "{origin}/product-reviews/{product_id}/?reviewerType=all_reviews&filterByStar=all_stars&pageNumber=1";

const PRODUCT_TEMPLATE: &str = "{origin}/dp/{product_id}";

/// Review-scoped search inputs, most specific first.
const SEARCH_INPUTS: &[&str] = &[
    "input[placeholder='Search reviews']",
    "input[placeholder='Search customer reviews']",
    "input[aria-label='Search reviews']",
    "input[aria-label='Search customer reviews']",
    "input#search-reviews",
    "input[name='search-reviews']",
    "div[class*='reviews'] input[type='text']",
    "div[class*='review'] input[type='text']",
    "section[class*='reviews'] input[type='text']",
    "div[data-hook='reviews-medley'] input[type='text']",
    "div[class*='filter'] input[type='text']",
    "div[class*='search'] input[type='text']",
    "input[placeholder*='review']",
    "input[placeholder*='customer']",
    "input[type='text']:not([id*='twotabsearch']):not([name*='search'])",
];

/// Selectors, templates and markers for one storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// Default origin when the product URL carries none usable.
    pub origin: String,
    pub sign_in_template: String,
    pub reviews_template: String,
    pub product_template: String,
    /// Pattern whose first capture group is the product identifier.
    pub product_id_pattern: String,

    pub email_field: String,
    pub continue_button: String,
    pub password_field: String,
    pub submit_button: String,
    pub auth_error: String,
    /// Text present on the page while a bot challenge is shown.
    pub challenge_marker: String,
    /// URL fragment of the sign-in surface.
    pub sign_in_path: String,

    pub review_list: String,
    pub primary_review: String,
    pub secondary_review: String,

    pub next_page_item: String,
    pub next_page_link: String,
    pub disabled_class: String,

    pub search_inputs: Vec<String>,

    pub product_title: String,
    pub product_images: Vec<String>,

    /// Substring identifying the site's own image host in image URLs.
    pub image_host_marker: String,
    pub modal_containers: Vec<String>,
    pub modal_close_buttons: Vec<String>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            origin: "https://www.amazon.com".to_string(),
            sign_in_template: SIGN_IN_TEMPLATE.to_string(),
            reviews_template: REVIEWS_TEMPLATE.to_string(),
            product_template: PRODUCT_TEMPLATE.to_string(),
            product_id_pattern: r"/(?:dp|product-reviews|gp/product)/([A-Z0-9]{10})".to_string(),
            email_field: "#ap_email".to_string(),
            continue_button: "#continue".to_string(),
            password_field: "#ap_password".to_string(),
            submit_button: "#signInSubmit".to_string(),
            auth_error: "#auth-error-message-box".to_string(),
            challenge_marker: "Type the characters you see".to_string(),
            sign_in_path: "/ap/signin".to_string(),
            review_list: "#cm_cr-review_list".to_string(),
            primary_review: "[data-hook='review']".to_string(),
            secondary_review: "#cm_cr-review_list div[class*='review']".to_string(),
            next_page_item: "ul.a-pagination li.a-last".to_string(),
            next_page_link: "ul.a-pagination li.a-last a".to_string(),
            disabled_class: "a-disabled".to_string(),
            search_inputs: SEARCH_INPUTS.iter().map(|s| s.to_string()).collect(),
            product_title: "#productTitle".to_string(),
            product_images: vec![
                "#landingImage".to_string(),
                "#imgTagWrapperId img".to_string(),
            ],
            image_host_marker: "amazon.com".to_string(),
            modal_containers: vec![
                "div.a-popover-inner".to_string(),
                "div.modal".to_string(),
                "div.overlay".to_string(),
            ],
            modal_close_buttons: vec![
                "button.a-button-close".to_string(),
                "button.close".to_string(),
                "button[aria-label*='Close']".to_string(),
            ],
        }
    }
}

/// Review listing derived from a product URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    pub product_id: String,
    pub origin: String,
    /// Canonical unfiltered first page of reviews.
    pub reviews_url: String,
    pub product_url: String,
}

impl SiteProfile {
    /// Sign-in URL that returns to `return_url` once authenticated.
    pub fn sign_in_url(&self, origin: &str, return_url: &str) -> String {
        self.sign_in_template
            .replace("{origin}", origin)
            .replace("{return_to}", &urlencoding::encode(return_url))
    }

    /// Resolve a product URL into its review listing.
    pub fn target(&self, product_url: &str) -> Result<ReviewTarget, TargetError> {
        let parsed = Url::parse(product_url).map_err(|source| TargetError::InvalidUrl {
            url: product_url.to_string(),
            source,
        })?;

        let pattern = regex::Regex::new(&self.product_id_pattern)
            .map_err(|_| TargetError::MissingProductId(product_url.to_string()))?;
        let product_id = pattern
            .captures(parsed.path())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| TargetError::MissingProductId(product_url.to_string()))?;

        let origin = parsed.origin();
        let origin = if origin.is_tuple() {
            origin.ascii_serialization()
        } else {
            self.origin.clone()
        };

        let fill = |template: &str| {
            template
                .replace("{origin}", &origin)
                .replace("{product_id}", &product_id)
        };

        Ok(ReviewTarget {
            reviews_url: fill(&self.reviews_template),
            product_url: fill(&self.product_template),
            product_id,
            origin,
        })
    }
}
