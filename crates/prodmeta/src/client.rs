// ABOUTME: The extraction Client: validates the URL, fetches the page and runs every strategy in order.
// ABOUTME: Provides async extract() for live pages and extract_html() for caller-supplied markup.

use scraper::Html;

use crate::error::ExtractError;
use crate::extractors::cascade::run_cascade;
use crate::extractors::generic::GENERIC_CASCADE;
use crate::extractors::jsonld::apply_json_ld;
use crate::extractors::price_fallback::apply_generic_price;
use crate::extractors::sites::AdapterRegistry;
use crate::metadata::{Field, ProductMetadata};
use crate::options::{ClientBuilder, Options};
use crate::policy::{normalize_domain, DomainPolicy};
use crate::resource::{fetch, FetchOptions};
use crate::title::clean_title;
use crate::urls::{host_of, make_absolute};

/// Currency assumed from the storefront's top-level domain.
///
/// Only `.mx` and `.com` are recognised.
pub fn default_currency(host: &str) -> Option<&'static str> {
    let host = host.to_ascii_lowercase();
    if host.ends_with(".mx") {
        Some("MXN")
    } else if host.ends_with(".com") {
        Some("USD")
    } else {
        None
    }
}

/// Product metadata extraction client.
///
/// Immutable once built and safe to share between tasks; each call owns its
/// own accumulator.
#[derive(Debug)]
pub struct Client {
    http_client: reqwest::Client,
    fetch_opts: FetchOptions,
    domain_policy: DomainPolicy,
    adapters: AdapterRegistry,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from options.
    pub fn new(opts: Options) -> Result<Self, ExtractError> {
        let http_client = match opts.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::limited(opts.max_redirects))
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    ExtractError::fetch("", "Build", Some(anyhow::Error::new(e)))
                })?,
        };

        Ok(Self {
            http_client,
            fetch_opts: FetchOptions {
                user_agent: opts.user_agent,
                accept_language: opts.accept_language,
                headers: opts.headers,
            },
            domain_policy: opts.domain_policy,
            adapters: opts.adapters.unwrap_or_else(AdapterRegistry::builtin),
        })
    }

    /// Fetch `url` and extract its product metadata.
    ///
    /// Only URL validation, the domain policy, the fetch and document parsing
    /// can fail. Once a document is parsed, any field may still come back empty.
    pub async fn extract(&self, url: &str) -> Result<ProductMetadata, ExtractError> {
        let host = validate_url(url, "Extract")?;
        if !self.domain_policy.is_allowed(&host) {
            let domain = normalize_domain(&host);
            log::warn!("refusing {}: domain {} not allowed", url, domain);
            return Err(ExtractError::blocked(url, "Extract", &domain));
        }

        let fetched = fetch(&self.http_client, url, &self.fetch_opts)
            .await
            .map_err(|err| {
                log::warn!("fetch failed: {}", err);
                err
            })?;
        if fetched.final_url != url {
            log::debug!("{} redirected to {}", url, fetched.final_url);
        }

        let html = fetched.text();
        self.extract_document(&html, &fetched.final_url)
            .map_err(|err| ExtractError { url: url.to_string(), ..err })
    }

    /// Extract product metadata from HTML the caller already has.
    ///
    /// `url` is the page address; it selects site adapters and resolves
    /// relative image references. No network access happens.
    pub fn extract_html(&self, html: &str, url: &str) -> Result<ProductMetadata, ExtractError> {
        validate_url(url, "ExtractHtml")?;
        self.extract_document(html, url)
    }

    fn extract_document(&self, html: &str, page_url: &str) -> Result<ProductMetadata, ExtractError> {
        if html.trim().is_empty() {
            return Err(ExtractError::parse(
                page_url,
                "Parse",
                Some(anyhow::anyhow!("empty document")),
            ));
        }

        let doc = Html::parse_document(html);
        let host = host_of(page_url).unwrap_or_default();
        let mut meta = ProductMetadata::default();

        run_cascade(&doc, page_url, GENERIC_CASCADE, &mut meta);
        apply_json_ld(&doc, &mut meta);

        for adapter in self.adapters.matching(&host) {
            let filled = adapter.apply(&doc, page_url, &mut meta);
            log::debug!("{} adapter filled {} field(s) for {}", adapter.name(), filled, host);
        }

        if apply_generic_price(&doc, &mut meta) {
            log::debug!("price taken from generic selectors for {}", page_url);
        }

        if let Some(currency) = default_currency(&host) {
            meta.fill(Field::Currency, currency);
        }

        if !meta.image_url.is_empty() {
            meta.image_url = make_absolute(&meta.image_url, page_url);
        }
        meta.title = clean_title(&meta.title, &meta.site_name);

        log::info!(
            "extracted {}: title={:?} price={:?} currency={:?}",
            page_url,
            meta.title,
            meta.price,
            meta.currency
        );
        Ok(meta)
    }
}

/// Check that `url` is an absolute http(s) URL with a host and return the host.
fn validate_url(url: &str, op: &str) -> Result<String, ExtractError> {
    if url.trim().is_empty() {
        return Err(ExtractError::invalid_url(url, op, None));
    }
    let parsed = url::Url::parse(url).map_err(|e| {
        ExtractError::invalid_url(url, op, Some(anyhow::anyhow!("malformed URL: {}", e)))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ExtractError::invalid_url(
            url,
            op,
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }
    parsed
        .host_str()
        .map(str::to_lowercase)
        .ok_or_else(|| ExtractError::invalid_url(url, op, Some(anyhow::anyhow!("missing host"))))
}
