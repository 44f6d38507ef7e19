// ABOUTME: Amazon storefront adapter: product title, split whole/fraction prices and hi-res images.
// ABOUTME: Defaults site name to "Amazon" and currency to MXN when nothing else supplied them.

use scraper::Html;

use crate::extractors::cascade::{Probe, Step};
use crate::extractors::fields::{element_attr, first_element, first_text_in};
use crate::extractors::sites::SiteAdapter;
use crate::metadata::{Candidate, Field};
use crate::urls::{dynamic_image_url, is_data_url};

pub struct AmazonAdapter;

const STEPS: &[Step] = &[
    Step::new(Field::Title, Probe::Text("#productTitle")),
    Step::new(Field::Title, Probe::Text("#title span")),
    Step::new(Field::Title, Probe::Text("span#productTitle")),
    Step::new(Field::Title, Probe::Text("h1#title span")),
    Step::new(Field::Title, Probe::Text("h1.a-size-large")),
    // Screen-reader copies carry the complete price string.
    Step::new(Field::Price, Probe::Text(".a-price .a-offscreen")),
    Step::new(Field::Price, Probe::Text("#corePrice_feature_div .a-offscreen")),
    Step::new(Field::Price, Probe::Text("#corePriceDisplay_desktop_feature_div .a-offscreen")),
    Step::new(Field::Price, Probe::Text(".apexPriceToPay .a-offscreen")),
    Step::new(Field::Price, Probe::Text("#apex_offerDisplay_desktop .a-offscreen")),
    Step::new(Field::Price, Probe::Text(".reinventPricePriceToPayMargin .a-offscreen")),
    Step::new(Field::Price, Probe::Text("span.a-price span.a-offscreen")),
    Step::new(Field::Price, Probe::Text("#tp_price_block_total_price_ww .a-offscreen")),
    Step::new(Field::Price, Probe::Text(".priceToPay .a-offscreen")),
    Step::new(Field::Price, Probe::Text("#priceblock_ourprice")),
    Step::new(Field::Price, Probe::Text("#priceblock_dealprice")),
    Step::new(Field::Price, Probe::Text("#priceblock_saleprice")),
    Step::new(Field::Price, Probe::Text("#price_inside_buybox")),
    Step::new(Field::Price, Probe::Custom(split_price)),
    Step::new(Field::ImageUrl, Probe::Custom(product_image)),
    Step::new(Field::SiteName, Probe::Const("Amazon")),
    Step::new(Field::Currency, Probe::Const("MXN")),
];

const PRICE_CONTAINERS: &[&str] = &[
    ".a-price",
    "#corePrice_feature_div .a-price",
    "#corePriceDisplay_desktop_feature_div .a-price",
    ".apexPriceToPay",
    ".priceToPay",
    "#tp_price_block_total_price_ww",
];

const IMAGE_SELECTORS: &[&str] = &[
    "#landingImage",
    "#imgBlkFront",
    "#main-image",
    "#ebooksImgBlkFront",
    ".a-dynamic-image",
    "#imgTagWrapperId img",
    "#imageBlock img",
];

impl SiteAdapter for AmazonAdapter {
    fn name(&self) -> &'static str {
        "Amazon"
    }

    fn host_markers(&self) -> &'static [&'static str] {
        &["amazon.com", "amazon.com.mx"]
    }

    fn steps(&self) -> &'static [Step] {
        STEPS
    }
}

/// Join the visually split integer and decimal parts of an Amazon price.
///
/// Only digits survive from either part, so thousands separators and the
/// nested `a-price-decimal` mark drop out. A one-digit fraction is padded and
/// a missing fraction becomes `.00`.
pub fn join_whole_fraction(whole: &str, fraction: &str) -> Option<f64> {
    let whole: String = whole.chars().filter(char::is_ascii_digit).collect();
    if whole.is_empty() {
        return None;
    }

    let fraction: String = fraction.chars().filter(char::is_ascii_digit).collect();
    let joined = match fraction.len() {
        0 => format!("{}.00", whole),
        1 => format!("{}.{}0", whole, fraction),
        _ => format!("{}.{}", whole, fraction),
    };
    joined.parse::<f64>().ok().filter(|value| *value > 0.0)
}

fn split_price(doc: &Html, _page_url: &str) -> Option<Candidate> {
    PRICE_CONTAINERS
        .iter()
        .filter_map(|css| first_element(doc, css))
        .find_map(|container| {
            let whole = first_text_in(&container, ".a-price-whole")?;
            let fraction = first_text_in(&container, ".a-price-fraction").unwrap_or_default();
            join_whole_fraction(&whole, &fraction)
        })
        .map(Candidate::Amount)
}

fn product_image(doc: &Html, _page_url: &str) -> Option<Candidate> {
    IMAGE_SELECTORS
        .iter()
        .filter_map(|css| first_element(doc, css))
        .find_map(|el| {
            element_attr(&el, "data-a-dynamic-image")
                .and_then(|json| dynamic_image_url(&json).map(str::to_string))
                .or_else(|| element_attr(&el, "data-old-hires"))
                .or_else(|| element_attr(&el, "src").filter(|src| !is_data_url(src)))
        })
        .map(Candidate::Text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ProductMetadata;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://www.amazon.com.mx/dp/B0BWK6PXZX";

    fn extract(html: &str) -> ProductMetadata {
        let doc = Html::parse_document(html);
        let mut meta = ProductMetadata::default();
        AmazonAdapter.apply(&doc, URL, &mut meta);
        meta
    }

    #[test]
    fn whole_and_fraction_are_joined() {
        assert_eq!(join_whole_fraction("1,234", "5"), Some(1234.5));
        assert_eq!(join_whole_fraction("99.", ""), Some(99.0));
        assert_eq!(join_whole_fraction("2.499,", "00"), Some(2499.0));
        assert_eq!(join_whole_fraction("", "99"), None);
        assert_eq!(join_whole_fraction("0", ""), None);
        assert_eq!(join_whole_fraction("abc", "12"), None);
        assert_eq!(join_whole_fraction("1,234 .", "50"), Some(1234.5));
    }

    #[test]
    fn full_product_page() {
        let meta = extract(
            r#"<html><body>
                <span id="productTitle">  Kit de Limpieza para Auto  </span>
                <span class="a-price"><span class="a-offscreen">$309.48</span></span>
                <img id="landingImage" src="data:image/gif;base64,R0lGOD"
                     data-old-hires="https://m.media-amazon.com/images/I/hires.jpg">
            </body></html>"#,
        );
        assert_eq!(
            meta,
            ProductMetadata {
                title: "Kit de Limpieza para Auto".to_string(),
                description: String::new(),
                image_url: "https://m.media-amazon.com/images/I/hires.jpg".to_string(),
                price: Some(309.48),
                currency: "MXN".to_string(),
                site_name: "Amazon".to_string(),
            }
        );
    }

    #[test]
    fn split_price_used_without_offscreen_copy() {
        let meta = extract(
            r#"<div id="corePrice_feature_div">
                <span class="a-price"><span class="a-price-whole">1,234.</span><span class="a-price-fraction">5</span></span>
            </div>"#,
        );
        assert_eq!(meta.price, Some(1234.5));
    }

    #[test]
    fn split_price_reads_nested_decimal_mark() {
        let meta = extract(
            r#"<span class="a-price priceToPay"><span class="a-price-whole">1,234<span class="a-price-decimal">.</span></span><span class="a-price-fraction">50</span></span>"#,
        );
        assert_eq!(meta.price, Some(1234.5));
    }

    #[test]
    fn empty_offscreen_falls_through_to_legacy_blocks() {
        let meta = extract(
            r#"<span class="a-price"><span class="a-offscreen"> </span></span>
               <span id="priceblock_dealprice">$1,099.00</span>"#,
        );
        assert_eq!(meta.price, Some(1099.0));
    }

    #[test]
    fn dynamic_image_preferred() {
        let meta = extract(
            r#"<img id="imgBlkFront" src="https://m.media-amazon.com/images/I/small.jpg"
                data-a-dynamic-image='{"https://m.media-amazon.com/images/I/large.jpg":[1500,1500]}'>"#,
        );
        assert_eq!(meta.image_url, "https://m.media-amazon.com/images/I/large.jpg");
    }

    #[test]
    fn existing_fields_are_not_overwritten() {
        let doc = Html::parse_document(
            r#"<span id="productTitle">Amazon Title</span>
               <span class="a-price"><span class="a-offscreen">$10.00</span></span>"#,
        );
        let mut meta = ProductMetadata {
            title: "JSON-LD Title".to_string(),
            price: Some(99.0),
            currency: "USD".to_string(),
            ..Default::default()
        };
        AmazonAdapter.apply(&doc, URL, &mut meta);
        assert_eq!(meta.title, "JSON-LD Title");
        assert_eq!(meta.price, Some(99.0));
        assert_eq!(meta.currency, "USD");
        assert_eq!(meta.site_name, "Amazon");
    }
}
