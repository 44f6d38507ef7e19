// ABOUTME: Site-agnostic cascade over Open Graph, Twitter Card, standard meta tags and <title>.
// ABOUTME: Ends with a scan for the first significant product image when no meta image exists.

use scraper::Html;

use crate::extractors::cascade::{Probe, Step};
use crate::extractors::fields::{all_elements, element_attr};
use crate::metadata::{Candidate, Field};
use crate::urls::{dynamic_image_url, first_srcset_candidate, is_data_url, make_absolute};

/// Steps applied to every page, before structured data and site adapters.
pub const GENERIC_CASCADE: &[Step] = &[
    // Open Graph
    Step::new(Field::Title, Probe::Meta("og:title")),
    Step::new(Field::Description, Probe::Meta("og:description")),
    Step::new(Field::ImageUrl, Probe::Meta("og:image")),
    Step::new(Field::SiteName, Probe::Meta("og:site_name")),
    Step::new(Field::Price, Probe::Meta("og:price:amount")),
    Step::new(Field::Currency, Probe::Meta("og:price:currency")),
    // Twitter Card
    Step::new(Field::Title, Probe::Meta("twitter:title")),
    Step::new(Field::Description, Probe::Meta("twitter:description")),
    Step::new(Field::ImageUrl, Probe::Meta("twitter:image")),
    // Standard meta
    Step::new(Field::Title, Probe::MetaName("title")),
    Step::new(Field::Description, Probe::MetaName("description")),
    Step::new(Field::Title, Probe::Text("title")),
    Step::new(Field::ImageUrl, Probe::Custom(significant_image)),
];

/// Selectors that commonly wrap the main product image, most specific first.
const IMAGE_SELECTORS: &[&str] = &[
    "#landingImage",
    "#imgBlkFront",
    ".product-image img",
    ".gallery-image img",
    "[data-main-image]",
    ".product img",
    "article img",
    ".main-image img",
    "picture source",
];

const IMAGE_ATTRS: &[&str] = &["src", "data-src", "srcset", "data-a-dynamic-image"];

/// First usable image reference among the product image selectors, made absolute.
///
/// Every element matched by a selector is considered, in document order.
pub fn significant_image(doc: &Html, page_url: &str) -> Option<Candidate> {
    IMAGE_SELECTORS
        .iter()
        .flat_map(|css| all_elements(doc, css))
        .find_map(|el| {
            IMAGE_ATTRS.iter().find_map(|&attr| {
                let raw = element_attr(&el, attr)?;
                let src = match attr {
                    "srcset" => first_srcset_candidate(&raw).to_string(),
                    "data-a-dynamic-image" => dynamic_image_url(&raw)?.to_string(),
                    _ => raw,
                };
                if src.is_empty() || is_data_url(&src) {
                    None
                } else {
                    Some(make_absolute(&src, page_url))
                }
            })
        })
        .map(Candidate::Text)
}
