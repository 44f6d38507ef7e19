// ABOUTME: MercadoLibre storefront adapter: andes money-amount prices, zoomable gallery images.
// ABOUTME: Defaults site name to "MercadoLibre" and currency to MXN.

use scraper::Html;

use crate::extractors::cascade::{Probe, Step};
use crate::extractors::fields::{element_attr, first_element, first_text_in_any};
use crate::extractors::sites::SiteAdapter;
use crate::metadata::{Candidate, Field};
use crate::price::parse_positive_price;
use crate::urls::is_data_url;

pub struct MercadoLibreAdapter;

const STEPS: &[Step] = &[
    Step::new(Field::Title, Probe::Text(".ui-pdp-title")),
    Step::new(Field::Title, Probe::Text("h1.ui-pdp-title")),
    Step::new(Field::Title, Probe::Text(".item-title__primary")),
    Step::new(Field::Title, Probe::Text("h1[class*='title']")),
    Step::new(Field::Price, Probe::Custom(split_price)),
    Step::new(Field::Price, Probe::Attr("[itemprop='price']", "content")),
    Step::new(Field::Price, Probe::Text("[itemprop='price']")),
    Step::new(
        Field::Price,
        Probe::Attr(".ui-pdp-price__main-container .andes-money-amount", "content"),
    ),
    Step::new(
        Field::Price,
        Probe::Text(".ui-pdp-price__main-container .andes-money-amount"),
    ),
    Step::new(Field::Price, Probe::Attr("meta[itemprop='price']", "content")),
    Step::new(Field::ImageUrl, Probe::Custom(gallery_image)),
    Step::new(Field::SiteName, Probe::Const("MercadoLibre")),
    Step::new(Field::Currency, Probe::Const("MXN")),
];

const PRICE_CONTAINERS: &[&str] = &[
    ".ui-pdp-price__second-line .andes-money-amount",
    ".andes-money-amount--cents-superscript",
    ".andes-money-amount",
    ".price-tag",
];

const FRACTION_SELECTORS: &[&str] = &[
    ".andes-money-amount__fraction",
    ".price-tag-fraction",
    "span[class*='fraction']",
];

const CENTS_SELECTORS: &[&str] = &[
    ".andes-money-amount__cents",
    ".price-tag-cents",
    "span[class*='cents']",
    "sup",
];

const IMAGE_SELECTORS: &[&str] = &[
    ".ui-pdp-image",
    ".ui-pdp-gallery__figure img",
    "figure.ui-pdp-gallery__figure img",
    "img[data-zoom]",
    ".gallery-image img",
];

impl SiteAdapter for MercadoLibreAdapter {
    fn name(&self) -> &'static str {
        "MercadoLibre"
    }

    fn host_markers(&self) -> &'static [&'static str] {
        &["mercadolibre.com", "mercadolibre.com.mx"]
    }

    fn steps(&self) -> &'static [Step] {
        STEPS
    }
}

/// Join MercadoLibre's integer part and superscript cents into one price.
///
/// Cents longer than two characters are ignored; a single digit is padded.
pub fn join_fraction_cents(fraction: &str, cents: &str) -> Option<f64> {
    let fraction = fraction.trim();
    if fraction.is_empty() {
        return None;
    }

    let cents = cents.trim();
    let joined = match cents.chars().count() {
        1 => format!("{}.{}0", fraction, cents),
        2 => format!("{}.{}", fraction, cents),
        _ => fraction.to_string(),
    };
    parse_positive_price(&joined).ok()
}

fn split_price(doc: &Html, _page_url: &str) -> Option<Candidate> {
    PRICE_CONTAINERS
        .iter()
        .filter_map(|css| first_element(doc, css))
        .find_map(|container| {
            let fraction = first_text_in_any(&container, FRACTION_SELECTORS)?;
            let cents = first_text_in_any(&container, CENTS_SELECTORS).unwrap_or_default();
            join_fraction_cents(&fraction, &cents)
        })
        .map(Candidate::Amount)
}

fn gallery_image(doc: &Html, _page_url: &str) -> Option<Candidate> {
    IMAGE_SELECTORS
        .iter()
        .filter_map(|css| first_element(doc, css))
        .find_map(|el| {
            element_attr(&el, "data-zoom")
                .or_else(|| element_attr(&el, "src").filter(|src| !is_data_url(src)))
        })
        .map(Candidate::Text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ProductMetadata;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://articulo.mercadolibre.com.mx/MLM-1234567890-pilas-aa";

    fn extract(html: &str) -> ProductMetadata {
        let doc = Html::parse_document(html);
        let mut meta = ProductMetadata::default();
        MercadoLibreAdapter.apply(&doc, URL, &mut meta);
        meta
    }

    #[test]
    fn fraction_and_cents_are_joined() {
        assert_eq!(join_fraction_cents("269", "9"), Some(269.9));
        assert_eq!(join_fraction_cents("1,299", "00"), Some(1299.0));
        assert_eq!(join_fraction_cents("450", ""), Some(450.0));
        assert_eq!(join_fraction_cents("450", "999"), Some(450.0));
        assert_eq!(join_fraction_cents("", "50"), None);
    }

    #[test]
    fn full_product_page() {
        let meta = extract(
            r#"<html><body>
                <h1 class="ui-pdp-title">Pilas AA Recargables 8 Piezas</h1>
                <div class="ui-pdp-price__second-line">
                    <span class="andes-money-amount">
                        <span class="andes-money-amount__currency-symbol">$</span>
                        <span class="andes-money-amount__fraction">269</span>
                        <span class="andes-money-amount__cents">9</span>
                    </span>
                </div>
                <figure class="ui-pdp-gallery__figure">
                    <img class="ui-pdp-image" src="https://http2.mlstatic.com/D_small.jpg"
                         data-zoom="https://http2.mlstatic.com/D_zoom.jpg">
                </figure>
            </body></html>"#,
        );
        assert_eq!(
            meta,
            ProductMetadata {
                title: "Pilas AA Recargables 8 Piezas".to_string(),
                description: String::new(),
                image_url: "https://http2.mlstatic.com/D_zoom.jpg".to_string(),
                price: Some(269.9),
                currency: "MXN".to_string(),
                site_name: "MercadoLibre".to_string(),
            }
        );
    }

    #[test]
    fn legacy_price_tag_markup() {
        let meta = extract(
            r#"<span class="price-tag"><span class="price-tag-fraction">1,850</span><span class="price-tag-cents">50</span></span>"#,
        );
        assert_eq!(meta.price, Some(1850.5));
    }

    #[test]
    fn itemprop_content_fallback() {
        let meta = extract(r#"<span itemprop="price" content="749.00">$ 749</span>"#);
        assert_eq!(meta.price, Some(749.0));
    }

    #[test]
    fn itemprop_text_fallback() {
        let meta = extract(r#"<span itemprop="price">$ 1.299,90</span>"#);
        assert_eq!(meta.price, Some(1299.9));
    }

    #[test]
    fn image_src_used_without_zoom() {
        let meta = extract(
            r#"<div class="gallery-image"><img src="https://http2.mlstatic.com/D_plain.jpg"></div>"#,
        );
        assert_eq!(meta.image_url, "https://http2.mlstatic.com/D_plain.jpg");
    }
}
