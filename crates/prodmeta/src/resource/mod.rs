// ABOUTME: Retrieves product pages with desktop-browser headers, size limits and status checks.
// ABOUTME: Decodes response bytes to text from the Content-Type charset or by detection.

use std::collections::HashMap;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};

use crate::error::ExtractError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Desktop Chrome on Windows; storefronts serve full product markup to it.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "es-MX,es;q=0.9,en-US;q=0.8,en;q=0.7";

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

const STATIC_BROWSER_HEADERS: &[(&str, &str)] = &[
    ("Accept", ACCEPT),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Cache-Control", "no-cache"),
    ("Pragma", "no-cache"),
    (
        "Sec-Ch-Ua",
        r#""Not A(Brand";v="99", "Google Chrome";v="121", "Chromium";v="121""#,
    ),
    ("Sec-Ch-Ua-Mobile", "?0"),
    ("Sec-Ch-Ua-Platform", r#""Windows""#),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Sec-Fetch-User", "?1"),
    ("Upgrade-Insecure-Requests", "1"),
];

/// Options for fetching a resource.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub accept_language: String,
    /// Added after the browser headers, so they override them.
    pub headers: HashMap<String, String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            headers: HashMap::new(),
        }
    }
}

/// Result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body to text, using the charset from the Content-Type header when present.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Request headers for a desktop browser page load, followed by the caller's extras.
fn browser_headers(opts: &FetchOptions) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&opts.user_agent)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&opts.accept_language)?);
    for (key, value) in STATIC_BROWSER_HEADERS {
        headers.insert(HeaderName::from_bytes(key.as_bytes())?, HeaderValue::from_static(*value));
    }
    for (key, value) in &opts.headers {
        headers.insert(
            HeaderName::from_bytes(key.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    Ok(headers)
}

/// Decode body bytes to a String using charset from content-type header or detection.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|charset| encoding_rs::Encoding::for_label(charset.as_bytes()))
    {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .to_lowercase()
        .split(';')
        .find_map(|part| {
            part.trim()
                .strip_prefix("charset=")
                .map(|charset| charset.trim_matches('"').trim_matches('\'').to_string())
        })
}

/// Fetch a product page.
///
/// Fails on transport errors, timeouts, redirect overflow, corrupt
/// content-encoding, bodies over [`MAX_CONTENT_LENGTH`] and any status other
/// than 200.
pub async fn fetch(
    client: &reqwest::Client,
    url: &str,
    opts: &FetchOptions,
) -> Result<FetchResult, ExtractError> {
    let headers = browser_headers(opts).map_err(|e| ExtractError::fetch(url, "Fetch", Some(e)))?;

    let response = client
        .get(url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| ExtractError::from_reqwest(url, "Fetch", e))?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(ExtractError::status(url, "Fetch", status));
    }

    let content_length = response.content_length().or_else(|| {
        response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    });
    if let Some(len) = content_length {
        if len > MAX_CONTENT_LENGTH as u64 {
            return Err(ExtractError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large: {} bytes", len)),
            ));
        }
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response
        .bytes()
        .await
        .map_err(|e| ExtractError::from_reqwest(url, "Fetch", e))?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ExtractError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large: {} bytes", body.len())),
        ));
    }

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body,
    })
}
