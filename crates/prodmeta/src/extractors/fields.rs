// ABOUTME: DOM lookup helpers shared by every strategy: meta content, first-element text and attributes.
// ABOUTME: All helpers trim values and treat empty strings as no match.

//! DOM lookup helpers.
//!
//! Key behaviors:
//! - Only the first element matched by a selector is consulted, except where
//!   a helper says otherwise.
//! - Text is whitespace-normalized (collapsed to single spaces, trimmed).
//! - Empty strings are treated as no match.

use scraper::{ElementRef, Html};

use crate::extractors::compiled::get_or_compile;

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text content of an element.
pub fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Trimmed, non-empty attribute value of an element.
pub fn element_attr(el: &ElementRef<'_>, attr: &str) -> Option<String> {
    el.value()
        .attr(attr)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First element in the document matching `css`.
pub fn first_element<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = get_or_compile(css)?;
    doc.select(&sel).next()
}

/// All elements in the document matching `css`, in document order.
pub fn all_elements<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match get_or_compile(css) {
        Some(sel) => doc.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Extracts the `content` attribute of the first meta tag carrying a non-empty one.
///
/// Checks `meta[property=key]` first and then `meta[name=key]`, because sites
/// publish Open Graph and Twitter Card tags under either attribute.
pub fn meta_content(doc: &Html, key: &str) -> Option<String> {
    meta_by_attr(doc, "property", key).or_else(|| meta_by_attr(doc, "name", key))
}

/// Extracts the `content` attribute of the first `meta[name=name]` with a non-empty one.
pub fn meta_name_content(doc: &Html, name: &str) -> Option<String> {
    meta_by_attr(doc, "name", name)
}

fn meta_by_attr(doc: &Html, attr: &str, key: &str) -> Option<String> {
    let css = format!(r#"meta[{}="{}"]"#, attr, key);
    all_elements(doc, &css)
        .iter()
        .find_map(|el| element_attr(el, "content"))
}

/// Text of the first element matching `css`, if non-empty.
pub fn first_text(doc: &Html, css: &str) -> Option<String> {
    first_element(doc, css)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
}

/// Attribute of the first element matching `css`, if non-empty.
pub fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    first_element(doc, css).and_then(|el| element_attr(&el, attr))
}

/// Text of the first descendant of `scope` matching `css`, if non-empty.
pub fn first_text_in(scope: &ElementRef<'_>, css: &str) -> Option<String> {
    let sel = get_or_compile(css)?;
    scope
        .select(&sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
}

/// Text of the first descendant matched by any of `selectors`, tried in order.
pub fn first_text_in_any(scope: &ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| first_text_in(scope, css))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>  Sample
                Product  </title>
            <meta property="og:title" content="">
            <meta property="og:title" content="  OG Title  ">
            <meta name="twitter:title" content="Twitter Title">
            <meta name="description" content="A description">
        </head>
        <body>
            <div class="price-box"><span class="whole">1,234</span><span class="frac">5</span></div>
            <img id="hero" src=" /hero.jpg " data-src="">
            <p class="empty">   </p>
        </body>
        </html>
    "#;

    fn parse_html() -> Html {
        Html::parse_document(SAMPLE_HTML)
    }

    #[test]
    fn meta_content_skips_empty_and_trims() {
        let doc = parse_html();
        assert_eq!(meta_content(&doc, "og:title"), Some("OG Title".to_string()));
    }

    #[test]
    fn meta_content_falls_back_to_name_attribute() {
        let doc = parse_html();
        assert_eq!(
            meta_content(&doc, "twitter:title"),
            Some("Twitter Title".to_string())
        );
    }

    #[test]
    fn meta_name_content_only_reads_name() {
        let doc = parse_html();
        assert_eq!(
            meta_name_content(&doc, "description"),
            Some("A description".to_string())
        );
        assert_eq!(meta_name_content(&doc, "og:title"), None);
    }

    #[test]
    fn first_text_normalizes_whitespace() {
        let doc = parse_html();
        assert_eq!(first_text(&doc, "title"), Some("Sample Product".to_string()));
        assert_eq!(first_text(&doc, ".empty"), None);
        assert_eq!(first_text(&doc, ".missing"), None);
    }

    #[test]
    fn first_attr_trims_and_skips_empty() {
        let doc = parse_html();
        assert_eq!(first_attr(&doc, "#hero", "src"), Some("/hero.jpg".to_string()));
        assert_eq!(first_attr(&doc, "#hero", "data-src"), None);
    }

    #[test]
    fn scoped_text_lookup() {
        let doc = parse_html();
        let scope = first_element(&doc, ".price-box").unwrap();
        assert_eq!(first_text_in(&scope, ".whole"), Some("1,234".to_string()));
        assert_eq!(
            first_text_in_any(&scope, &[".nope", ".frac"]),
            Some("5".to_string())
        );
        assert_eq!(first_text_in_any(&scope, &[".nope"]), None);
    }

    #[test]
    fn invalid_selector_is_no_match() {
        let doc = parse_html();
        assert_eq!(first_text(&doc, "[[["), None);
        assert!(all_elements(&doc, "[[[").is_empty());
    }
}
