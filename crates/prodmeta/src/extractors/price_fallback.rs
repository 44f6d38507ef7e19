// ABOUTME: Last-resort price lookup over microdata and common e-commerce platform price classes.
// ABOUTME: Runs only when structured data and site adapters found no price.

use scraper::Html;

use crate::extractors::fields::{all_elements, element_attr, element_text};
use crate::metadata::{Candidate, Field, ProductMetadata};
use crate::price::parse_positive_price;

/// Price selectors in priority order.
const PRICE_SELECTORS: &[&str] = &[
    // microdata
    r#"[itemprop="price"]"#,
    "[data-price]",
    "[data-product-price]",
    ".price",
    ".product-price",
    ".current-price",
    ".sale-price",
    ".final-price",
    ".regular-price",
    ".offer-price",
    ".price-current",
    ".price-value",
    ".product__price",
    "#product-price",
    "#price",
    r#"span[class*="price"]"#,
    r#"div[class*="price"]"#,
    r#"p[class*="price"]"#,
    // WooCommerce
    ".woocommerce-Price-amount",
    // BigCommerce
    ".price--main",
    // Magento
    ".price-box .price",
    r#"[class*="money"]"#,
    r#"[class*="amount"]"#,
];

/// Fill the price from the first matching element that yields a positive value.
///
/// Each element is tried as its `content` attribute, then `data-price`, then
/// its text. Returns true if the price was written.
pub fn apply_generic_price(doc: &Html, meta: &mut ProductMetadata) -> bool {
    if meta.has(Field::Price) {
        return false;
    }

    let found = PRICE_SELECTORS
        .iter()
        .flat_map(|css| all_elements(doc, css))
        .find_map(|el| {
            element_attr(&el, "content")
                .and_then(|raw| parse_positive_price(&raw).ok())
                .or_else(|| element_attr(&el, "data-price").and_then(|raw| parse_positive_price(&raw).ok()))
                .or_else(|| parse_positive_price(&element_text(&el)).ok())
        });

    match found {
        Some(amount) => meta.fill(Field::Price, Candidate::Amount(amount)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Option<f64> {
        let doc = Html::parse_document(html);
        let mut meta = ProductMetadata::default();
        apply_generic_price(&doc, &mut meta);
        meta.price
    }

    #[test]
    fn microdata_content_preferred_over_text() {
        assert_eq!(
            extract(r#"<span itemprop="price" content="59.90">Ahora $49</span>"#),
            Some(59.9)
        );
    }

    #[test]
    fn data_price_attribute() {
        assert_eq!(extract(r#"<div data-price="1234.00">Ver precio</div>"#), Some(1234.0));
    }

    #[test]
    fn woocommerce_markup() {
        assert_eq!(
            extract(
                r#"<p><span class="woocommerce-Price-amount amount"><bdi><span class="woocommerce-Price-currencySymbol">$</span>1,299.00</bdi></span></p>"#
            ),
            Some(1299.0)
        );
    }

    #[test]
    fn zero_and_empty_candidates_are_skipped() {
        assert_eq!(
            extract(
                r#"<span class="price">$0.00</span><span class="price"></span><span class="sale-price">$15</span>"#
            ),
            Some(15.0)
        );
    }

    #[test]
    fn nothing_found() {
        assert_eq!(extract("<p>Contact us for pricing</p>"), None);
    }

    #[test]
    fn existing_price_is_kept() {
        let doc = Html::parse_document(r#"<span class="price">$10</span>"#);
        let mut meta = ProductMetadata {
            price: Some(3.5),
            ..Default::default()
        };
        assert!(!apply_generic_price(&doc, &mut meta));
        assert_eq!(meta.price, Some(3.5));
    }
}
