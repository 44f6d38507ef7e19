// ABOUTME: Configuration options for the extraction client: Options and the fluent ClientBuilder.
// ABOUTME: Covers timeout, redirect cap, browser identity, extra headers and the domain policy.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Client;
use crate::error::ExtractError;
use crate::extractors::sites::AdapterRegistry;
use crate::policy::DomainPolicy;
use crate::resource::{DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT};

/// Overall request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Redirect hops followed before the request fails.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Configuration options for the extraction client.
#[derive(Debug)]
pub struct Options {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    pub accept_language: String,
    pub headers: HashMap<String, String>,
    /// Used as-is when set; `timeout` and `max_redirects` then do not apply.
    pub http_client: Option<reqwest::Client>,
    pub domain_policy: DomainPolicy,
    pub adapters: Option<AdapterRegistry>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            headers: HashMap::new(),
            http_client: None,
            domain_policy: DomainPolicy::default(),
            adapters: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set how many redirects are followed.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.opts.max_redirects = max;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the Accept-Language header.
    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.opts.accept_language = accept_language.into();
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Restrict which domains may be extracted.
    pub fn domain_policy(mut self, policy: DomainPolicy) -> Self {
        self.opts.domain_policy = policy;
        self
    }

    /// Replace the built-in site adapters.
    pub fn adapters(mut self, registry: AdapterRegistry) -> Self {
        self.opts.adapters = Some(registry);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Result<Client, ExtractError> {
        Client::new(self.opts)
    }
}
