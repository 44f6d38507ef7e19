// ABOUTME: Site adapter trait and the registry that dispatches a page to adapters by host.
// ABOUTME: Built-in adapters cover Amazon and MercadoLibre storefronts.

//! Site-specific extraction.
//!
//! An adapter knows a storefront's markup and fills only the fields generic
//! strategies left empty. Dispatch is a case-insensitive substring match of
//! the adapter's host markers against the page host; every matching adapter
//! runs, in registration order.

use scraper::Html;

use crate::extractors::cascade::{run_cascade, Step};
use crate::metadata::ProductMetadata;

pub mod amazon;
pub mod mercadolibre;

pub use amazon::AmazonAdapter;
pub use mercadolibre::MercadoLibreAdapter;

/// Extraction rules for one storefront.
pub trait SiteAdapter: Send + Sync {
    /// Human-readable adapter name, used in logs.
    fn name(&self) -> &'static str;

    /// Host substrings that select this adapter.
    fn host_markers(&self) -> &'static [&'static str];

    /// Ordered cascade applied to matching pages.
    fn steps(&self) -> &'static [Step];

    /// Returns true if this adapter handles `host`.
    fn matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.host_markers().iter().any(|marker| host.contains(marker))
    }

    /// Fill empty fields of `meta` from the page. Returns the number of fields written.
    fn apply(&self, doc: &Html, page_url: &str, meta: &mut ProductMetadata) -> usize {
        run_cascade(doc, page_url, self.steps(), meta)
    }
}

/// Ordered collection of site adapters.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the Amazon and MercadoLibre adapters.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(AmazonAdapter);
        registry.register(MercadoLibreAdapter);
        registry
    }

    /// Appends an adapter; adapters run in registration order.
    pub fn register(&mut self, adapter: impl SiteAdapter + 'static) {
        self.adapters.push(Box::new(adapter));
    }

    /// Adapters that handle `host`, in registration order.
    pub fn matching<'a>(&'a self, host: &'a str) -> impl Iterator<Item = &'a dyn SiteAdapter> + 'a {
        self.adapters
            .iter()
            .map(|adapter| &**adapter)
            .filter(move |adapter| adapter.matches(host))
    }

    /// Returns the number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|adapter| adapter.name()))
            .finish()
    }
}
