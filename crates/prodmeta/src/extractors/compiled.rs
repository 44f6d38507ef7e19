// ABOUTME: Process-wide cache of compiled scraper selectors keyed by their CSS text.
// ABOUTME: Every selector list in the extractors is static, so each is parsed once and reused.

//! Selector caching for repeated DOM queries.
//!
//! The extraction strategies run the same few hundred selectors against every
//! page. Parsing a selector costs more than matching it against a typical
//! product page, so compiled selectors are cached for the process lifetime.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

/// Invalid selectors are cached as `None` so they are not re-parsed either.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `None` for selectors scraper cannot parse.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    if compiled.is_none() {
        log::debug!("ignoring unparseable selector {:?}", css);
    }

    let mut cache = SELECTOR_CACHE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    cache
        .entry(css.to_string())
        .or_insert_with(|| compiled)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_selector_is_cached() {
        assert!(get_or_compile(".a-price .a-offscreen").is_some());
        assert!(get_or_compile(".a-price .a-offscreen").is_some());
    }

    #[test]
    fn invalid_selector_returns_none() {
        assert!(get_or_compile("[[[invalid").is_none());
        assert!(get_or_compile("[[[invalid").is_none());
    }

    #[test]
    fn attribute_substring_selectors_compile() {
        assert!(get_or_compile("span[class*='price']").is_some());
        assert!(get_or_compile(r#"meta[property="og:price:amount"]"#).is_some());
    }
}
