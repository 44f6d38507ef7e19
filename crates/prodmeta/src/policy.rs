// ABOUTME: Allow/block lists that decide which storefront domains may be fetched.
// ABOUTME: Lists are stored as JSON arrays or newline-separated text and compared without "www.".

use serde::{Deserialize, Serialize};

/// Domain allow and block lists.
///
/// The block list always wins. An empty allow list permits every domain that
/// is not blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPolicy {
    #[serde(default)]
    pub allowed: Vec<String>,
    #[serde(default)]
    pub blocked: Vec<String>,
}

impl DomainPolicy {
    pub fn new<A, B>(allowed: A, blocked: B) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        Self {
            allowed: allowed.into_iter().map(|d| normalize_domain(d.as_ref())).collect(),
            blocked: blocked.into_iter().map(|d| normalize_domain(d.as_ref())).collect(),
        }
    }

    /// Returns true when no list restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty() && self.blocked.is_empty()
    }

    /// Decide whether `host` may be fetched.
    pub fn is_allowed(&self, host: &str) -> bool {
        let domain = normalize_domain(host);
        if self.blocked.iter().any(|d| *d == domain) {
            return false;
        }
        self.allowed.is_empty() || self.allowed.iter().any(|d| *d == domain)
    }

    /// Parse a stored domain list.
    ///
    /// Accepts a JSON array of strings; anything else is read as one domain per
    /// line. Blank lines are dropped.
    pub fn parse_list(text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if let Ok(list) = serde_json::from_str::<Vec<String>>(text) {
            return list;
        }
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Lower-case a host and drop a leading `www.`.
pub fn normalize_domain(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}
