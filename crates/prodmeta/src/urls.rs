// ABOUTME: URL helpers: relative image reference resolution, srcset reduction, and host lookup.
// ABOUTME: Also holds the network-free Amazon URL checks (is_amazon_url, extract_asin).

use once_cell::sync::Lazy;
use regex::Regex;

static SCHEME_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://[^/]+)").expect("static scheme/host regex is valid"));

static QUOTED_HTTPS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(https://[^"]+)""#).expect("static quoted url regex is valid"));

/// Path markers that precede an ASIN in Amazon product URLs.
const ASIN_MARKERS: &[&str] = &["/dp/", "/gp/product/", "/gp/aw/d/"];

/// ASINs are ten characters long.
const ASIN_MAX_LEN: usize = 10;

/// Resolve a possibly relative image reference against the page URL.
///
/// Absolute references pass through, protocol-relative ones get `https:`, and
/// root-relative ones get the `scheme://host` prefix of `base_url`. Anything
/// else is returned unchanged.
pub fn make_absolute(reference: &str, base_url: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    if reference.starts_with("//") {
        return format!("https:{}", reference);
    }
    if reference.starts_with('/') {
        if let Some(caps) = SCHEME_HOST_RE.captures(base_url) {
            return format!("{}{}", &caps[1], reference);
        }
    }
    reference.to_string()
}

/// Reduce a `srcset` value to its first candidate URL.
pub fn first_srcset_candidate(srcset: &str) -> &str {
    srcset
        .split(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
        .unwrap_or("")
}

/// First quoted `https://` URL inside an Amazon `data-a-dynamic-image` value.
///
/// The attribute holds a JSON object keyed by image URL; only the first key is wanted.
pub fn dynamic_image_url(json: &str) -> Option<&str> {
    QUOTED_HTTPS_RE
        .captures(json)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Returns true for inline `data:` URLs, which are never used as the product image.
pub fn is_data_url(s: &str) -> bool {
    s.trim_start()
        .get(..5)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Lower-cased host of `url`, or `None` when it cannot be parsed.
pub fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// Returns true when the URL points at an Amazon storefront.
///
/// Works on URL syntax only, so callers can use it when extraction failed.
pub fn is_amazon_url(url: &str) -> bool {
    match host_of(url) {
        Some(host) => host.contains("amazon.") || host.contains("amzn."),
        None => url.to_lowercase().contains("amazon"),
    }
}

/// Extract the Amazon ASIN from the URL path, or an empty string.
///
/// Looks for `/dp/`, `/gp/product/` and `/gp/aw/d/` and takes at most ten
/// characters after the marker, stopping early at `/`, `?` or `&`.
pub fn extract_asin(url: &str) -> String {
    for marker in ASIN_MARKERS {
        if let Some(idx) = url.find(marker) {
            let asin: String = url[idx + marker.len()..]
                .chars()
                .take_while(|&c| c != '/' && c != '?' && c != '&')
                .take(ASIN_MAX_LEN)
                .collect();
            if !asin.is_empty() {
                return asin;
            }
        }
    }
    String::new()
}
